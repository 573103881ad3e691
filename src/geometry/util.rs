//! Small 2-D geometric helpers: distances, triangle bounds, circumcentres and
//! segment clipping against a rectangular region.

use crate::core::grid::Region;
use num_traits::Float;

/// Euclidean distance between two points.
///
/// Uses `hypot` so that very large or very small separations neither overflow
/// nor underflow.
///
/// # Examples
///
/// ```
/// use trigrid::geometry::util::distance;
///
/// assert_eq!(distance([0.0, 0.0], [3.0, 4.0]), 5.0);
/// ```
#[inline]
#[must_use]
pub fn distance<T: Float>(a: [T; 2], b: [T; 2]) -> T {
    (b[0] - a[0]).hypot(b[1] - a[1])
}

/// Axis-aligned bounds `([x_min, y_min], [x_max, y_max])` of a triangle.
#[inline]
#[must_use]
pub fn triangle_bounds<T: Float>(corners: &[[T; 2]; 3]) -> ([T; 2], [T; 2]) {
    let [p0, p1, p2] = *corners;
    (
        [p0[0].min(p1[0]).min(p2[0]), p0[1].min(p1[1]).min(p2[1])],
        [p0[0].max(p1[0]).max(p2[0]), p0[1].max(p1[1]).max(p2[1])],
    )
}

/// Circumcentre of the triangle `a, b, c`, or `None` when the corners are collinear.
///
/// # Examples
///
/// ```
/// use trigrid::geometry::util::circumcenter;
///
/// let c = circumcenter([0.0, 0.0], [2.0, 0.0], [0.0, 2.0]).unwrap();
/// assert_eq!(c, [1.0, 1.0]);
/// assert!(circumcenter([0.0, 0.0], [1.0, 1.0], [2.0, 2.0]).is_none());
/// ```
#[must_use]
pub fn circumcenter(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Option<[f64; 2]> {
    let (bx, by) = (b[0] - a[0], b[1] - a[1]);
    let (cx, cy) = (c[0] - a[0], c[1] - a[1]);
    let d = 2.0 * (bx * cy - by * cx);
    if d == 0.0 {
        return None;
    }
    let b2 = bx.mul_add(bx, by * by);
    let c2 = cx.mul_add(cx, cy * cy);
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    let center = [a[0] + ux, a[1] + uy];
    (center[0].is_finite() && center[1].is_finite()).then_some(center)
}

/// Clips the parametric line `start + t·(end - start)` for `t ∈ [0, t_max]` to `region`.
///
/// Pass `t_max = 1.0` for a segment and `f64::INFINITY` for a ray starting at
/// `start` and heading towards `end`. Returns the clipped endpoints, or `None`
/// if nothing of the line lies inside the region. This is the Liang–Barsky
/// algorithm.
///
/// # Examples
///
/// ```
/// use trigrid::core::grid::Region;
/// use trigrid::geometry::util::clip_to_region;
///
/// let region = Region::new(0.0, 1.0, 0.0, 1.0).unwrap();
/// let clipped = clip_to_region([-1.0, 0.5], [3.0, 0.5], 1.0, &region).unwrap();
/// assert_eq!(clipped, ([0.0, 0.5], [1.0, 0.5]));
/// ```
#[must_use]
pub fn clip_to_region(
    start: [f64; 2],
    end: [f64; 2],
    t_max: f64,
    region: &Region,
) -> Option<([f64; 2], [f64; 2])> {
    let dx = end[0] - start[0];
    let dy = end[1] - start[1];
    let mut t0 = 0.0_f64;
    let mut t1 = t_max;

    let checks = [
        (-dx, start[0] - region.west),
        (dx, region.east - start[0]),
        (-dy, start[1] - region.south),
        (dy, region.north - start[1]),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    if !t1.is_finite() {
        return None;
    }

    let point = |t: f64| [start[0] + t * dx, start[1] + t * dy];
    Some((point(t0), point(t1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit() -> Region {
        Region::new(0.0, 1.0, 0.0, 1.0).unwrap()
    }

    #[test]
    fn distance_is_symmetric() {
        let a = [1.5, -2.0];
        let b = [-0.5, 3.0];
        assert_relative_eq!(distance(a, b), distance(b, a));
        assert_relative_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn bounds_cover_all_corners() {
        let (lo, hi) = triangle_bounds(&[[3.0, -1.0], [0.5, 4.0], [2.0, 2.0]]);
        assert_eq!(lo, [0.5, -1.0]);
        assert_eq!(hi, [3.0, 4.0]);
    }

    #[test]
    fn circumcenter_is_equidistant() {
        let (a, b, c) = ([0.3, 0.1], [2.7, 0.4], [1.1, 3.2]);
        let o = circumcenter(a, b, c).unwrap();
        let r = distance(o, a);
        assert_relative_eq!(distance(o, b), r, epsilon = 1e-12);
        assert_relative_eq!(distance(o, c), r, epsilon = 1e-12);
    }

    #[test]
    fn segment_inside_region_is_unchanged() {
        let (s, e) = clip_to_region([0.2, 0.3], [0.8, 0.6], 1.0, &unit()).unwrap();
        assert_eq!(s, [0.2, 0.3]);
        assert_relative_eq!(e[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(e[1], 0.6, epsilon = 1e-12);
    }

    #[test]
    fn segment_outside_region_is_dropped() {
        assert!(clip_to_region([2.0, 2.0], [3.0, 5.0], 1.0, &unit()).is_none());
        // Parallel to an edge and outside it
        assert!(clip_to_region([-1.0, 2.0], [3.0, 2.0], 1.0, &unit()).is_none());
    }

    #[test]
    fn ray_is_cut_at_region_boundary() {
        let (s, e) = clip_to_region([0.5, 0.5], [0.6, 0.5], f64::INFINITY, &unit()).unwrap();
        assert_eq!(s, [0.5, 0.5]);
        assert_relative_eq!(e[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(e[1], 0.5);
    }

    #[test]
    fn ray_pointing_away_from_region_is_dropped() {
        assert!(clip_to_region([2.0, 0.5], [3.0, 0.5], f64::INFINITY, &unit()).is_none());
    }

    #[test]
    fn ray_entering_region_from_outside_is_clipped_on_both_ends() {
        let (s, e) = clip_to_region([-1.0, 0.5], [-0.5, 0.5], f64::INFINITY, &unit()).unwrap();
        assert_relative_eq!(s[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(e[0], 1.0, epsilon = 1e-12);
    }
}
