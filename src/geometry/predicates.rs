//! Point-in-polygon predicates used by the scan converter.
//!
//! The test is the non-zero winding rule: a point is inside a closed polygon
//! when the polygon winds around it a non-zero number of times. Points that lie
//! exactly on a polygon edge are reported separately as
//! [`PointLocation::BOUNDARY`] so callers can choose an inclusive or exclusive
//! boundary; the rasterizer treats them as inside.

use num_traits::Float;

/// Position of a query point relative to a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    /// The point is outside the polygon.
    OUTSIDE,
    /// The point lies exactly on an edge or vertex.
    BOUNDARY,
    /// The winding number around the point is non-zero.
    INSIDE,
}

impl PointLocation {
    /// Returns `true` for [`INSIDE`](Self::INSIDE) and [`BOUNDARY`](Self::BOUNDARY).
    #[inline]
    #[must_use]
    pub const fn is_covered(self) -> bool {
        !matches!(self, Self::OUTSIDE)
    }
}

impl std::fmt::Display for PointLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Signed area test: `> 0` if `p` is left of the directed line `a → b`,
/// `< 0` if right, `0` if collinear.
#[inline]
fn is_left<T: Float>(a: [T; 2], b: [T; 2], p: [T; 2]) -> T {
    (b[0] - a[0]) * (p[1] - a[1]) - (p[0] - a[0]) * (b[1] - a[1])
}

#[inline]
fn on_segment<T: Float>(a: [T; 2], b: [T; 2], p: [T; 2]) -> bool {
    is_left(a, b, p) == T::zero()
        && p[0] >= a[0].min(b[0])
        && p[0] <= a[0].max(b[0])
        && p[1] >= a[1].min(b[1])
        && p[1] <= a[1].max(b[1])
}

/// Locates `p` against a closed vertex loop using the non-zero winding rule.
///
/// `polygon` must be closed: its last vertex repeats the first, so a triangle
/// is passed as four vertices `[v0, v1, v2, v0]`. Loops with fewer than two
/// vertices enclose nothing and always yield [`PointLocation::OUTSIDE`].
///
/// # Examples
///
/// ```rust
/// use trigrid::geometry::predicates::{non_zero_winding, PointLocation};
///
/// let triangle = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
/// assert_eq!(non_zero_winding([0.25, 0.25], &triangle), PointLocation::INSIDE);
/// assert_eq!(non_zero_winding([0.5, 0.0], &triangle), PointLocation::BOUNDARY);
/// assert_eq!(non_zero_winding([1.0, 1.0], &triangle), PointLocation::OUTSIDE);
/// ```
#[must_use]
pub fn non_zero_winding<T: Float>(p: [T; 2], polygon: &[[T; 2]]) -> PointLocation {
    if polygon.len() < 2 {
        return PointLocation::OUTSIDE;
    }

    let mut winding: i64 = 0;
    for pair in polygon.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if on_segment(a, b, p) {
            return PointLocation::BOUNDARY;
        }
        if a[1] <= p[1] {
            // Upward crossing with p strictly left of the edge
            if b[1] > p[1] && is_left(a, b, p) > T::zero() {
                winding += 1;
            }
        } else if b[1] <= p[1] && is_left(a, b, p) < T::zero() {
            // Downward crossing with p strictly right of the edge
            winding -= 1;
        }
    }

    if winding == 0 {
        PointLocation::OUTSIDE
    } else {
        PointLocation::INSIDE
    }
}

/// Closes a triangle into the four-vertex loop expected by [`non_zero_winding`].
#[inline]
#[must_use]
pub const fn triangle_loop<T: Copy>(corners: [[T; 2]; 3]) -> [[T; 2]; 4] {
    [corners[0], corners[1], corners[2], corners[0]]
}

#[cfg(test)]
mod tests {
    use super::*;

    const CCW: [[f64; 2]; 4] = [[0.0, 0.0], [4.0, 0.0], [0.0, 4.0], [0.0, 0.0]];
    const CW: [[f64; 2]; 4] = [[0.0, 0.0], [0.0, 4.0], [4.0, 0.0], [0.0, 0.0]];

    #[test]
    fn winding_direction_does_not_matter() {
        for poly in [CCW, CW] {
            assert_eq!(non_zero_winding([1.0, 1.0], &poly), PointLocation::INSIDE);
            assert_eq!(non_zero_winding([3.0, 3.0], &poly), PointLocation::OUTSIDE);
            assert_eq!(non_zero_winding([-1.0, 1.0], &poly), PointLocation::OUTSIDE);
        }
    }

    #[test]
    fn vertices_and_edges_are_boundary() {
        for p in [[0.0, 0.0], [4.0, 0.0], [2.0, 0.0], [0.0, 2.0], [2.0, 2.0]] {
            assert_eq!(non_zero_winding(p, &CCW), PointLocation::BOUNDARY, "{p:?}");
            assert!(non_zero_winding(p, &CW).is_covered());
        }
    }

    #[test]
    fn ray_through_vertex_is_not_double_counted() {
        // Horizontal through the apex at y = 4 and the base vertex level y = 0
        let tri = triangle_loop([[0.0, 0.0], [2.0, 4.0], [4.0, 0.0]]);
        assert_eq!(non_zero_winding([-1.0, 4.0], &tri), PointLocation::OUTSIDE);
        assert_eq!(non_zero_winding([5.0, 0.0], &tri), PointLocation::OUTSIDE);
        assert_eq!(non_zero_winding([2.0, 1.0], &tri), PointLocation::INSIDE);
    }

    #[test]
    fn degenerate_loops_are_outside() {
        assert_eq!(
            non_zero_winding([0.0, 0.0], &[[0.0_f64, 0.0]]),
            PointLocation::OUTSIDE
        );
        let empty: [[f64; 2]; 0] = [];
        assert_eq!(non_zero_winding([0.0, 0.0], &empty), PointLocation::OUTSIDE);
    }

    #[test]
    fn collinear_triangle_only_covers_its_segment() {
        let tri = triangle_loop([[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        assert_eq!(non_zero_winding([0.5, 0.5], &tri), PointLocation::BOUNDARY);
        assert_eq!(non_zero_winding([0.5, 0.6], &tri), PointLocation::OUTSIDE);
    }

    #[test]
    fn display_matches_variant_names() {
        assert_eq!(PointLocation::INSIDE.to_string(), "INSIDE");
        assert_eq!(PointLocation::BOUNDARY.to_string(), "BOUNDARY");
        assert_eq!(PointLocation::OUTSIDE.to_string(), "OUTSIDE");
    }
}
