//! Triangulation engines.
//!
//! The rasterizer and the edge extractor only need a list of index triples;
//! how they are produced is behind the [`TriangulationEngine`] trait. The
//! default [`DelaunatorEngine`] wraps the `delaunator` crate and derives the
//! Voronoi diagram as the dual of its Delaunay triangulation.
//!
//! Buffers returned by an engine are owned `Vec`s and are released by `Drop`.

use crate::core::grid::Region;
use crate::core::point_store::PointStore;
use crate::core::triangle::{Triangle, TriangleError, triangles_from_flat};
use crate::geometry::util::{circumcenter, clip_to_region};
use delaunator::{EMPTY, next_halfedge, prev_halfedge};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a triangulation engine.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// At least three points are needed for a triangle.
    #[error("need at least 3 points to triangulate, got {found}")]
    TooFewPoints {
        /// Number of points supplied.
        found: usize,
    },
    /// A point has a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the first such point.
        index: usize,
    },
    /// The points are all collinear (or coincident), so no triangle exists.
    #[error("triangulation of {points} points produced no triangles")]
    NoTriangles {
        /// Number of points supplied.
        points: usize,
    },
    /// The engine returned an index triple that does not name a valid triangle.
    #[error("engine produced an invalid triangle: {0}")]
    InvalidTriangle(#[from] TriangleError),
}

/// One Voronoi edge as a pair of explicit coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoronoiEdge {
    /// First endpoint `[x, y]`.
    pub start: [f64; 2],
    /// Second endpoint `[x, y]`.
    pub end: [f64; 2],
}

/// Source of triangulations and Voronoi diagrams for a point set.
pub trait TriangulationEngine {
    /// Short engine name for diagnostics.
    fn name(&self) -> &'static str;

    /// Triangulates the `(x, y)` coordinates of `points`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if no triangulation exists for the points.
    fn triangulate(&self, points: &PointStore) -> Result<Vec<Triangle>, EngineError>;

    /// Computes the Voronoi edges of `points`, clipped to `region`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the underlying triangulation fails.
    fn voronoi(&self, points: &PointStore, region: &Region) -> Result<Vec<VoronoiEdge>, EngineError>;
}

/// Delaunay triangulation by sweep-hull, via the `delaunator` crate.
///
/// # Examples
///
/// ```rust
/// use trigrid::core::engine::{DelaunatorEngine, TriangulationEngine};
/// use trigrid::core::point_store::{PointLayout, PointStore};
///
/// let mut points = PointStore::new(PointLayout::XY);
/// for p in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]] {
///     points.push(&p).unwrap();
/// }
/// let triangles = DelaunatorEngine.triangulate(&points).unwrap();
/// assert_eq!(triangles.len(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DelaunatorEngine;

impl DelaunatorEngine {
    fn run(points: &PointStore) -> Result<(Vec<delaunator::Point>, delaunator::Triangulation), EngineError> {
        if points.len() < 3 {
            return Err(EngineError::TooFewPoints { found: points.len() });
        }
        if let Some(index) = points
            .xs()
            .iter()
            .zip(points.ys())
            .position(|(x, y)| !(x.is_finite() && y.is_finite()))
        {
            return Err(EngineError::NonFiniteCoordinate { index });
        }
        let coords: Vec<delaunator::Point> = points
            .xs()
            .iter()
            .zip(points.ys())
            .map(|(&x, &y)| delaunator::Point { x, y })
            .collect();
        let triangulation = delaunator::triangulate(&coords);
        if triangulation.triangles.is_empty() {
            return Err(EngineError::NoTriangles { points: points.len() });
        }
        Ok((coords, triangulation))
    }
}

impl TriangulationEngine for DelaunatorEngine {
    fn name(&self) -> &'static str {
        "delaunator"
    }

    fn triangulate(&self, points: &PointStore) -> Result<Vec<Triangle>, EngineError> {
        let (_, triangulation) = Self::run(points)?;
        let triangles = triangles_from_flat(&triangulation.triangles, points.len())?;
        tracing::info!(count = triangles.len(), "Delaunay triangles found");
        Ok(triangles)
    }

    fn voronoi(&self, points: &PointStore, region: &Region) -> Result<Vec<VoronoiEdge>, EngineError> {
        let (coords, triangulation) = Self::run(points)?;
        let corner = |e: usize| {
            let p = &coords[triangulation.triangles[e]];
            [p.x, p.y]
        };
        let center = |t: usize| circumcenter(corner(3 * t), corner(3 * t + 1), corner(3 * t + 2));

        let mut edges = Vec::new();
        for (e, &opposite) in triangulation.halfedges.iter().enumerate() {
            let Some(start) = center(e / 3) else {
                continue;
            };

            let clipped = if opposite == EMPTY {
                // Hull edge: a ray from the circumcentre away from the third corner
                let (p, q, r) = (corner(e), corner(next_halfedge(e)), corner(prev_halfedge(e)));
                let mut normal = [p[1] - q[1], q[0] - p[0]];
                if normal[0] * (r[0] - p[0]) + normal[1] * (r[1] - p[1]) > 0.0 {
                    normal = [-normal[0], -normal[1]];
                }
                let toward = [start[0] + normal[0], start[1] + normal[1]];
                clip_to_region(start, toward, f64::INFINITY, region)
            } else if e < opposite {
                let Some(end) = center(opposite / 3) else {
                    continue;
                };
                clip_to_region(start, end, 1.0, region)
            } else {
                continue;
            };

            if let Some((start, end)) = clipped {
                edges.push(VoronoiEdge { start, end });
            }
        }

        tracing::info!(count = edges.len(), "Voronoi edges found");
        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::point_store::PointLayout;

    fn points(coords: &[[f64; 2]]) -> PointStore {
        let mut store = PointStore::new(PointLayout::XY);
        for c in coords {
            store.push(c).unwrap();
        }
        store
    }

    fn square_with_center() -> PointStore {
        points(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [1.0, 1.0]])
    }

    #[test]
    fn triangulates_square_with_center_into_fan() {
        let triangles = DelaunatorEngine.triangulate(&square_with_center()).unwrap();
        assert_eq!(triangles.len(), 4);
        for t in &triangles {
            assert!(t.vertices().contains(&4), "{t:?} misses the centre");
        }
    }

    #[test]
    fn too_few_points_is_an_error() {
        let err = DelaunatorEngine
            .triangulate(&points(&[[0.0, 0.0], [1.0, 0.0]]))
            .unwrap_err();
        assert_eq!(err, EngineError::TooFewPoints { found: 2 });
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let store = points(&[[0.0, 0.0], [1.0, 0.0], [f64::NAN, 0.5], [1.0, f64::INFINITY]]);
        assert_eq!(
            DelaunatorEngine.triangulate(&store).unwrap_err(),
            EngineError::NonFiniteCoordinate { index: 2 }
        );
        let region = Region::new(-1.0, 2.0, -1.0, 2.0).unwrap();
        assert!(matches!(
            DelaunatorEngine.voronoi(&store, &region),
            Err(EngineError::NonFiniteCoordinate { index: 2 })
        ));
    }

    #[test]
    fn collinear_points_have_no_triangles() {
        let err = DelaunatorEngine
            .triangulate(&points(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]))
            .unwrap_err();
        assert_eq!(err, EngineError::NoTriangles { points: 4 });
    }

    #[test]
    fn voronoi_of_square_with_center() {
        let region = Region::new(-1.0, 3.0, -1.0, 3.0).unwrap();
        let edges = DelaunatorEngine.voronoi(&square_with_center(), &region).unwrap();

        // Four interior edges around the centre cell and four hull rays
        assert_eq!(edges.len(), 8);
        for edge in &edges {
            for [x, y] in [edge.start, edge.end] {
                assert!(region.contains(x, y), "({x}, {y}) escapes the region");
            }
        }
        // Every hull ray ends on the region boundary
        let on_boundary = edges
            .iter()
            .filter(|e| {
                let [x, y] = e.end;
                [x + 1.0, x - 3.0, y + 1.0, y - 3.0].iter().any(|d| d.abs() < 1e-12)
            })
            .count();
        assert_eq!(on_boundary, 4);
    }

    #[test]
    fn voronoi_edges_outside_region_are_dropped() {
        let region = Region::new(10.0, 11.0, 10.0, 11.0).unwrap();
        let edges = DelaunatorEngine.voronoi(&square_with_center(), &region).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn engine_reports_its_name() {
        assert_eq!(DelaunatorEngine.name(), "delaunator");
    }
}
