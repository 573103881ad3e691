//! Propagated-uncertainty model for gridded triangle surfaces.
//!
//! Each triangle corner `i` carries a horizontal uncertainty proxy `h_i` and a
//! vertical proxy `v_i`. At a grid cell `(xp, yp)` with terrain slope `θ` the
//! corner contributes the variance term
//!
//! ```text
//! uv_i = v_i² · (1 + ((dist_i + s_H·h_i) / δ_min)^α) + (tan θ · h_i)²
//! ```
//!
//! where `dist_i` is the distance from the cell to the corner. The three terms
//! are blended with inverse-distance weights,
//!
//! ```text
//! σ = sqrt( Σ uv_i / dist_i  /  Σ 1 / dist_i )
//! ```
//!
//! unless the cell coincides with a corner, in which case `σ = sqrt(uv_i)` for
//! the first coincident corner in `j, k, l` order.

/// Uncertainty proxies and position of one triangle corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexUncertainty {
    /// Corner position `[x, y]`.
    pub position: [f64; 2],
    /// Horizontal uncertainty proxy (non-negative).
    pub h: f64,
    /// Vertical uncertainty proxy (non-negative).
    pub v: f64,
}

/// Inverse-distance-weighted propagation of per-corner uncertainty.
///
/// # Examples
///
/// ```rust
/// use trigrid::core::algorithms::uncertainty::{UncertaintyModel, VertexUncertainty};
///
/// let model = UncertaintyModel::new(1.0);
/// let corner = |x, y| VertexUncertainty { position: [x, y], h: 0.0, v: 1.0 };
/// let corners = [corner(0.0, 0.0), corner(1.0, 0.0), corner(0.0, 1.0)];
///
/// // At a corner only that corner contributes: 1² · (1 + 0²) = 1
/// assert_eq!(model.sigma([0.0, 0.0], 0.0, &corners), 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UncertaintyModel {
    alpha: f64,
    delta_min: f64,
    horizontal_scale: f64,
}

impl UncertaintyModel {
    /// Shape exponent `α` applied to the normalised distance term.
    pub const DEFAULT_ALPHA: f64 = 2.0;
    /// Scale `s_H` applied to the horizontal proxy in the distance term.
    pub const DEFAULT_HORIZONTAL_SCALE: f64 = 1.0;
    /// Distances below this are treated as coincident with a corner.
    pub const COINCIDENCE_TOLERANCE: f64 = 2.22e-16;

    /// Creates the model for a grid whose x spacing is `delta_min`.
    #[must_use]
    pub const fn new(delta_min: f64) -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            delta_min,
            horizontal_scale: Self::DEFAULT_HORIZONTAL_SCALE,
        }
    }

    /// Overrides the shape exponent `α`.
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Overrides the horizontal scale `s_H`.
    #[must_use]
    pub const fn with_horizontal_scale(mut self, horizontal_scale: f64) -> Self {
        self.horizontal_scale = horizontal_scale;
        self
    }

    /// The normalising distance `δ_min`.
    #[must_use]
    pub const fn delta_min(&self) -> f64 {
        self.delta_min
    }

    /// Variance term `uv_i` of one corner at distance `dist` for slope tangent `tan_slope`.
    #[inline]
    #[must_use]
    pub fn vertex_variance(&self, dist: f64, corner: &VertexUncertainty, tan_slope: f64) -> f64 {
        let reach = (dist + self.horizontal_scale * corner.h) / self.delta_min;
        let vertical = corner.v * corner.v * (1.0 + reach.powf(self.alpha));
        let horizontal = tan_slope * corner.h;
        horizontal.mul_add(horizontal, vertical)
    }

    /// Propagated standard deviation at `query` given the cell's slope in radians.
    #[must_use]
    pub fn sigma(&self, query: [f64; 2], slope: f64, corners: &[VertexUncertainty; 3]) -> f64 {
        let tan_slope = slope.tan();
        let dists = corners.map(|c| crate::geometry::util::distance(query, c.position));

        if let Some(i) = dists
            .iter()
            .position(|d| d.abs() < Self::COINCIDENCE_TOLERANCE)
        {
            return self.vertex_variance(dists[i], &corners[i], tan_slope).sqrt();
        }

        let mut weighted = 0.0;
        let mut weights = 0.0;
        for (corner, dist) in corners.iter().zip(dists) {
            weighted += self.vertex_variance(dist, corner, tan_slope) / dist;
            weights += dist.recip();
        }
        (weighted / weights).sqrt()
    }
}
