//! Plane fitting through the three corners of a triangle.
//!
//! For corners `j, k, l` with elevations the plane `z = a·x + b·y + c` is
//! recovered from the cross product of the edge vectors `k - j` and `l - j`:
//!
//! ```text
//! f = 1 / ((x_k - x_j)(y_l - y_j) - (y_k - y_j)(x_l - x_j))
//! a = -f · ((y_k - y_j)(z_l - z_j) - (z_k - z_j)(y_l - y_j))
//! b = -f · ((z_k - z_j)(x_l - x_j) - (x_k - x_j)(z_l - z_j))
//! c = z_k - a·x_k - b·y_k
//! ```
//!
//! The denominator is twice the signed area of the triangle's footprint, so it
//! vanishes exactly when the corners are collinear.

use num_traits::Float;
use thiserror::Error;

/// Errors that can occur while fitting a plane.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PlaneFitError {
    /// The triangle footprint has zero area, so `a` and `b` are undetermined.
    #[error("degenerate triangle footprint (denominator {denominator})")]
    Degenerate {
        /// The vanishing cross-product term, as `f64`.
        denominator: f64,
    },
}

/// Plane `z = a·x + b·y + c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane<T> {
    /// ∂z/∂x.
    pub a: T,
    /// ∂z/∂y.
    pub b: T,
    /// Intercept.
    pub c: T,
}

impl<T: Float> Plane<T> {
    /// Fits the plane through three `[x, y, z]` corners given in `j, k, l` order.
    ///
    /// # Errors
    ///
    /// Returns [`PlaneFitError::Degenerate`] if the footprint has zero area or the
    /// coefficients are not finite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trigrid::geometry::plane::Plane;
    ///
    /// let plane = Plane::fit([[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 2.0]]).unwrap();
    /// assert_eq!((plane.a, plane.b, plane.c), (1.0, 2.0, 0.0));
    /// assert_eq!(plane.evaluate(0.25, 0.25), 0.75);
    /// ```
    pub fn fit(corners: [[T; 3]; 3]) -> Result<Self, PlaneFitError> {
        let [[xj, yj, zj], [xk, yk, zk], [xl, yl, zl]] = corners;
        let (xkj, ykj, zkj) = (xk - xj, yk - yj, zk - zj);
        let (xlj, ylj, zlj) = (xl - xj, yl - yj, zl - zj);

        let denominator = xkj * ylj - ykj * xlj;
        let degenerate = || PlaneFitError::Degenerate {
            denominator: denominator.to_f64().unwrap_or(f64::NAN),
        };
        if denominator == T::zero() || !denominator.is_finite() {
            return Err(degenerate());
        }

        let f = denominator.recip();
        let a = -f * (ykj * zlj - zkj * ylj);
        let b = -f * (zkj * xlj - xkj * zlj);
        let c = -a * xk - b * yk + zk;
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return Err(degenerate());
        }
        Ok(Self { a, b, c })
    }

    /// Evaluates the plane at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, x: T, y: T) -> T {
        self.a * x + self.b * y + self.c
    }
}
