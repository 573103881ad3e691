//! Scan conversion of triangles into an output grid.
//!
//! For every triangle the rasterizer
//!
//! 1. fits the plane `z = a·x + b·y + c` through its corners,
//! 2. maps the triangle's bounding box to a window of grid indices,
//! 3. rejects the triangle if the window misses the grid entirely, otherwise
//!    clamps the window to the grid,
//! 4. tests every node in the window against the closed corner loop with the
//!    non-zero winding rule (nodes on an edge count as covered), and
//! 5. writes the selected [`RasterQuantity`] into every covered node.
//!
//! Triangles are independent; a node shared by two triangles' boundaries is
//! written by each in turn and keeps the last value.
//!
//! With the `parallel` feature, [`TriangleRasterizer::rasterize_parallel`]
//! splits the grid into bands of rows and scans each band on its own thread.
//! Each band replays the triangles in list order, so the result is identical to
//! [`TriangleRasterizer::rasterize`].

use std::ops::RangeInclusive;

use crate::core::algorithms::uncertainty::{UncertaintyModel, VertexUncertainty};
use crate::core::grid::{Grid, GridError, GridHeader};
use crate::core::point_store::{PointIndex, PointStore};
use crate::core::triangle::Triangle;
use crate::geometry::plane::Plane;
use crate::geometry::predicates::{non_zero_winding, triangle_loop};
use crate::geometry::util::triangle_bounds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Errors detected before any node is written.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RasterError {
    /// Value and derivative output need an elevation for every point.
    #[error("{quantity} output requires elevations on every input point")]
    MissingElevation {
        /// The quantity that was requested.
        quantity: RasterQuantity,
    },
    /// Uncertainty output needs `h` and `v` for every point.
    #[error("uncertainty output requires (h, v) fields on every input point")]
    MissingUncertainty,
    /// Uncertainty output needs a slope grid.
    #[error("uncertainty output requires a slope grid")]
    MissingSlopeGrid,
    /// The slope grid is not aligned with the output grid.
    #[error("slope grid is not aligned with the output grid: {0}")]
    SlopeGrid(#[from] GridError),
}

/// The value written into covered grid nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RasterQuantity {
    /// Plane value `a·x + b·y + c`.
    #[default]
    Value,
    /// Partial derivative `∂z/∂x = a`.
    DerivativeX,
    /// Partial derivative `∂z/∂y = b`.
    DerivativeY,
    /// Propagated standard deviation from the [`UncertaintyModel`].
    Uncertainty,
}

impl std::fmt::Display for RasterQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value => write!(f, "value"),
            Self::DerivativeX => write!(f, "x-derivative"),
            Self::DerivativeY => write!(f, "y-derivative"),
            Self::Uncertainty => write!(f, "uncertainty"),
        }
    }
}

/// Inclusive window of grid indices a triangle may cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellWindow {
    /// First column.
    pub col_min: usize,
    /// Last column.
    pub col_max: usize,
    /// First (northernmost) row.
    pub row_min: usize,
    /// Last (southernmost) row.
    pub row_max: usize,
}

impl CellWindow {
    /// Returns `true` if node `(row, col)` lies in the window.
    #[must_use]
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row_min && row <= self.row_max && col >= self.col_min && col <= self.col_max
    }
}

/// Maps a triangle's bounding box to grid indices, clamped to the grid.
///
/// Returns `None` when the box lies entirely left, right, above or below the
/// grid. A box that only partially overlaps the grid is clamped silently.
///
/// # Examples
///
/// ```rust
/// use trigrid::core::algorithms::rasterize::cell_window;
/// use trigrid::core::grid::{GridHeader, Region, Registration};
///
/// let region = Region::new(0.0, 4.0, 0.0, 4.0).unwrap();
/// let header = GridHeader::new(region, 1.0, 1.0, Registration::Gridline).unwrap();
///
/// let window = cell_window(&header, &[[-2.0, 1.0], [2.0, 1.0], [0.0, 3.0]]).unwrap();
/// assert_eq!((window.col_min, window.col_max), (0, 2));
/// assert_eq!((window.row_min, window.row_max), (1, 3));
///
/// assert!(cell_window(&header, &[[9.0, 1.0], [10.0, 1.0], [9.0, 2.0]]).is_none());
/// ```
#[must_use]
pub fn cell_window(header: &GridHeader, corners: &[[f64; 2]; 3]) -> Option<CellWindow> {
    let (lo, hi) = triangle_bounds(corners);
    let col_min = header.x_to_col(lo[0]);
    let col_max = header.x_to_col(hi[0]);
    // Rows count down from north, so the top of the box gives the first row
    let row_min = header.y_to_row(hi[1]);
    let row_max = header.y_to_row(lo[1]);

    let n_columns = i64::try_from(header.n_columns()).ok()?;
    let n_rows = i64::try_from(header.n_rows()).ok()?;
    if col_max < 0 || col_min >= n_columns || row_max < 0 || row_min >= n_rows {
        return None;
    }

    let clamp = |v: i64, n: i64| usize::try_from(v.clamp(0, n - 1)).unwrap_or(0);
    Some(CellWindow {
        col_min: clamp(col_min, n_columns),
        col_max: clamp(col_max, n_columns),
        row_min: clamp(row_min, n_rows),
        row_max: clamp(row_max, n_rows),
    })
}

/// Counters describing one rasterization pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Triangles offered to the rasterizer.
    pub triangles: usize,
    /// Triangles whose window overlapped the grid and was scanned.
    pub scanned: usize,
    /// Triangles whose bounding box missed the grid.
    pub outside: usize,
    /// Triangles skipped because no plane could be fitted.
    pub degenerate: usize,
    /// Node writes performed (a node written twice counts twice).
    pub cells_written: usize,
}

/// Reads a node value off a triangle plane.
type PlaneSample = fn(&Plane<f64>, [f64; 2]) -> f64;

/// How covered nodes are computed, resolved once from the quantity.
#[derive(Clone, Copy, Debug)]
enum Mode<'a> {
    Plane(PlaneSample),
    Uncertainty(&'a Grid),
}

/// Per-triangle data a covered node is computed from.
#[derive(Clone, Copy, Debug)]
enum Payload<'a> {
    Plane(Plane<f64>, PlaneSample),
    Uncertainty([VertexUncertainty; 3], &'a Grid),
}

/// Per-triangle data needed to scan its window.
#[derive(Clone, Copy, Debug)]
struct Footprint<'a> {
    corners: [[f64; 2]; 4],
    window: CellWindow,
    payload: Payload<'a>,
}

/// Writes triangle planes, derivatives or uncertainties into a grid.
#[derive(Clone, Copy, Debug)]
pub struct TriangleRasterizer<'a> {
    points: &'a PointStore,
    quantity: RasterQuantity,
    mode: Mode<'a>,
}

impl<'a> TriangleRasterizer<'a> {
    /// Creates a rasterizer over `points` writing `quantity`.
    ///
    /// `slopes` supplies the terrain slope (radians) per node and is required
    /// for [`RasterQuantity::Uncertainty`].
    ///
    /// # Errors
    ///
    /// Returns an error if the point store lacks the fields the quantity needs
    /// or the slope grid is missing for uncertainty output.
    pub fn new(
        points: &'a PointStore,
        quantity: RasterQuantity,
        slopes: Option<&'a Grid>,
    ) -> Result<Self, RasterError> {
        let mode = match quantity {
            RasterQuantity::Value => Mode::Plane(|plane, [x, y]| plane.evaluate(x, y)),
            RasterQuantity::DerivativeX => Mode::Plane(|plane, _| plane.a),
            RasterQuantity::DerivativeY => Mode::Plane(|plane, _| plane.b),
            RasterQuantity::Uncertainty => {
                if points.hs().is_none() || points.vs().is_none() {
                    return Err(RasterError::MissingUncertainty);
                }
                Mode::Uncertainty(slopes.ok_or(RasterError::MissingSlopeGrid)?)
            }
        };
        if matches!(mode, Mode::Plane(_)) && points.zs().is_none() {
            return Err(RasterError::MissingElevation { quantity });
        }
        Ok(Self {
            points,
            quantity,
            mode,
        })
    }

    /// The quantity this rasterizer writes.
    #[must_use]
    pub const fn quantity(&self) -> RasterQuantity {
        self.quantity
    }

    /// Scans every triangle into `grid` in list order.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::SlopeGrid`] if the slope grid does not match `grid`.
    pub fn rasterize(&self, triangles: &[Triangle], grid: &mut Grid) -> Result<RasterStats, RasterError> {
        let header = *grid.header();
        let model = self.prepare(&header)?;
        let mut stats = RasterStats {
            triangles: triangles.len(),
            ..RasterStats::default()
        };

        for triangle in triangles {
            let Some(footprint) = self.footprint(triangle, &header, &mut stats) else {
                continue;
            };
            let rows = footprint.window.row_min..=footprint.window.row_max;
            stats.cells_written += Self::scan(&footprint, &header, &model, rows, grid.data_mut(), 0);
        }

        self.report(&stats);
        Ok(stats)
    }

    /// Parallel variant of [`rasterize`](Self::rasterize) over bands of rows.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::SlopeGrid`] if the slope grid does not match `grid`.
    #[cfg(feature = "parallel")]
    pub fn rasterize_parallel(
        &self,
        triangles: &[Triangle],
        grid: &mut Grid,
    ) -> Result<RasterStats, RasterError> {
        let header = *grid.header();
        let model = self.prepare(&header)?;
        let mut stats = RasterStats {
            triangles: triangles.len(),
            ..RasterStats::default()
        };
        let footprints: Vec<Footprint<'_>> = triangles
            .iter()
            .filter_map(|t| self.footprint(t, &header, &mut stats))
            .collect();

        let n_columns = header.n_columns();
        let rows_per_band = header.n_rows().div_ceil(rayon::current_num_threads().max(1)).max(1);
        stats.cells_written = grid
            .data_mut()
            .par_chunks_mut(rows_per_band * n_columns)
            .enumerate()
            .map(|(band_index, band)| {
                let first_row = band_index * rows_per_band;
                let last_row = first_row + band.len() / n_columns - 1;
                footprints
                    .iter()
                    .map(|fp| {
                        let start = fp.window.row_min.max(first_row);
                        let end = fp.window.row_max.min(last_row);
                        if start > end {
                            0
                        } else {
                            Self::scan(fp, &header, &model, start..=end, band, first_row)
                        }
                    })
                    .sum::<usize>()
            })
            .sum();

        self.report(&stats);
        Ok(stats)
    }

    fn prepare(&self, header: &GridHeader) -> Result<UncertaintyModel, RasterError> {
        if let Mode::Uncertainty(slopes) = self.mode {
            header.ensure_aligned(slopes.header())?;
        }
        Ok(UncertaintyModel::new(header.dx()))
    }

    fn footprint(
        &self,
        triangle: &Triangle,
        header: &GridHeader,
        stats: &mut RasterStats,
    ) -> Option<Footprint<'a>> {
        let vertices = triangle.vertices();
        let xy = vertices.map(|i| self.points.xy(i));

        let payload = match self.mode {
            Mode::Plane(sample) => {
                let corners = [0, 1, 2].map(|n| {
                    let [x, y] = xy[n];
                    [x, y, self.elevation(vertices[n])]
                });
                match Plane::fit(corners) {
                    Ok(plane) => Payload::Plane(plane, sample),
                    Err(err) => {
                        tracing::warn!(?vertices, %err, "skipping triangle without a plane");
                        stats.degenerate += 1;
                        return None;
                    }
                }
            }
            Mode::Uncertainty(slopes) => Payload::Uncertainty(
                [0, 1, 2].map(|n| self.vertex_uncertainty(vertices[n], xy[n])),
                slopes,
            ),
        };

        let Some(window) = cell_window(header, &xy) else {
            stats.outside += 1;
            return None;
        };
        stats.scanned += 1;

        Some(Footprint {
            corners: triangle_loop(xy),
            window,
            payload,
        })
    }

    /// Scans `rows` of a footprint into `band`, whose first row is `band_first_row`.
    fn scan(
        footprint: &Footprint<'_>,
        header: &GridHeader,
        model: &UncertaintyModel,
        rows: RangeInclusive<usize>,
        band: &mut [f32],
        band_first_row: usize,
    ) -> usize {
        let offset = header.index(band_first_row, 0);
        let window = footprint.window;
        let mut written = 0;

        for row in rows {
            let y = header.row_to_y(row);
            for col in window.col_min..=window.col_max {
                let x = header.col_to_x(col);
                if !non_zero_winding([x, y], &footprint.corners).is_covered() {
                    continue;
                }
                let node = header.index(row, col);
                band[node - offset] = Self::evaluate(footprint, model, [x, y], node);
                written += 1;
            }
        }
        written
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "grid nodes are stored as f32"
    )]
    fn evaluate(footprint: &Footprint<'_>, model: &UncertaintyModel, at: [f64; 2], node: usize) -> f32 {
        match footprint.payload {
            Payload::Plane(plane, sample) => sample(&plane, at) as f32,
            Payload::Uncertainty(corners, slopes) => {
                let slope = f64::from(slopes.data()[node]);
                model.sigma(at, slope, &corners) as f32
            }
        }
    }

    fn elevation(&self, i: PointIndex) -> f64 {
        self.points.z(i).unwrap_or(f64::NAN)
    }

    fn vertex_uncertainty(&self, i: PointIndex, position: [f64; 2]) -> VertexUncertainty {
        let point = self.points.get(i);
        VertexUncertainty {
            position,
            h: point.and_then(|p| p.h).unwrap_or(0.0),
            v: point.and_then(|p| p.v).unwrap_or(0.0),
        }
    }

    fn report(&self, stats: &RasterStats) {
        tracing::debug!(
            quantity = %self.quantity,
            triangles = stats.triangles,
            scanned = stats.scanned,
            outside = stats.outside,
            degenerate = stats.degenerate,
            cells_written = stats.cells_written,
            "rasterized triangles"
        );
        if stats.degenerate > 0 {
            tracing::warn!(
                degenerate = stats.degenerate,
                "some triangles were skipped because their footprint has no area"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{Region, Registration};
    use crate::core::point_store::PointLayout;
    use approx::assert_relative_eq;

    fn header(west: f64, east: f64, south: f64, north: f64, inc: f64, reg: Registration) -> GridHeader {
        GridHeader::new(Region::new(west, east, south, north).unwrap(), inc, inc, reg).unwrap()
    }

    fn store(layout: PointLayout, rows: &[&[f64]]) -> PointStore {
        let mut s = PointStore::new(layout);
        for r in rows {
            s.push(r).unwrap();
        }
        s
    }

    fn unit_triangle() -> PointStore {
        store(
            PointLayout::XYZ,
            &[&[0.0, 0.0, 0.0], &[1.0, 0.0, 1.0], &[0.0, 1.0, 2.0]],
        )
    }

    // =============================================================================
    // WINDOWS
    // =============================================================================

    #[test]
    fn window_is_clamped_to_grid() {
        let h = header(0.0, 4.0, 0.0, 4.0, 1.0, Registration::Gridline);
        let w = cell_window(&h, &[[-10.0, -10.0], [10.0, -10.0], [0.0, 10.0]]).unwrap();
        assert_eq!(
            w,
            CellWindow {
                col_min: 0,
                col_max: 4,
                row_min: 0,
                row_max: 4
            }
        );
    }

    #[test]
    fn window_rejects_triangles_beyond_each_side() {
        let h = header(0.0, 4.0, 0.0, 4.0, 1.0, Registration::Gridline);
        let left = [[-9.0, 1.0], [-8.0, 1.0], [-9.0, 2.0]];
        let right = [[9.0, 1.0], [10.0, 1.0], [9.0, 2.0]];
        let above = [[1.0, 9.0], [2.0, 9.0], [1.0, 10.0]];
        let below = [[1.0, -9.0], [2.0, -9.0], [1.0, -8.0]];
        for corners in [left, right, above, below] {
            assert!(cell_window(&h, &corners).is_none(), "{corners:?}");
        }
    }

    // =============================================================================
    // QUANTITIES
    // =============================================================================

    #[test]
    fn value_mode_writes_plane_inside_and_keeps_fill_outside() {
        let points = unit_triangle();
        let triangles = [Triangle::new(0, 1, 2).unwrap()];
        let mut grid = Grid::filled(header(0.0, 1.0, 0.0, 1.0, 0.5, Registration::Pixel), f32::NAN);

        let r = TriangleRasterizer::new(&points, RasterQuantity::Value, None).unwrap();
        let stats = r.rasterize(&triangles, &mut grid).unwrap();

        assert_relative_eq!(grid.value_at(0.25, 0.25).unwrap(), 0.75);
        assert_relative_eq!(grid.value_at(0.75, 0.25).unwrap(), 1.25);
        assert_relative_eq!(grid.value_at(0.25, 0.75).unwrap(), 1.75);
        assert!(grid.value_at(0.75, 0.75).unwrap().is_nan());
        assert_eq!(stats.cells_written, 3);
        assert_eq!(stats.scanned, 1);
    }

    #[test]
    fn derivative_modes_write_plane_gradient() {
        let points = unit_triangle();
        let triangles = [Triangle::new(0, 1, 2).unwrap()];
        let h = header(0.0, 1.0, 0.0, 1.0, 0.5, Registration::Pixel);

        for (quantity, expected) in [(RasterQuantity::DerivativeX, 1.0), (RasterQuantity::DerivativeY, 2.0)] {
            let mut grid = Grid::filled(h, -99.0);
            TriangleRasterizer::new(&points, quantity, None)
                .unwrap()
                .rasterize(&triangles, &mut grid)
                .unwrap();
            assert_relative_eq!(grid.value_at(0.25, 0.25).unwrap(), expected);
            assert_relative_eq!(grid.value_at(0.75, 0.75).unwrap(), -99.0);
        }
    }

    #[test]
    fn uncertainty_mode_uses_model_and_slope_grid() {
        let points = store(
            PointLayout::XYZHV,
            &[
                &[0.0, 0.0, 0.0, 0.1, 0.2],
                &[2.0, 0.0, 0.0, 0.2, 0.1],
                &[0.0, 2.0, 0.0, 0.3, 0.3],
            ],
        );
        let h = header(0.0, 2.0, 0.0, 2.0, 1.0, Registration::Gridline);
        let slopes = Grid::filled(h, 0.2);
        let mut grid = Grid::filled(h, f32::NAN);

        let r = TriangleRasterizer::new(&points, RasterQuantity::Uncertainty, Some(&slopes)).unwrap();
        r.rasterize(&[Triangle::new(0, 1, 2).unwrap()], &mut grid).unwrap();

        let model = UncertaintyModel::new(1.0);
        let corners = [
            VertexUncertainty { position: [0.0, 0.0], h: 0.1, v: 0.2 },
            VertexUncertainty { position: [2.0, 0.0], h: 0.2, v: 0.1 },
            VertexUncertainty { position: [0.0, 2.0], h: 0.3, v: 0.3 },
        ];
        let slope = f64::from(0.2_f32);
        // Node at a corner takes that corner's own term
        assert_relative_eq!(
            f64::from(grid.value_at(0.0, 0.0).unwrap()),
            model.sigma([0.0, 0.0], slope, &corners),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            f64::from(grid.value_at(1.0, 1.0).unwrap()),
            model.sigma([1.0, 1.0], slope, &corners),
            epsilon = 1e-6
        );
        assert!(grid.value_at(2.0, 2.0).unwrap().is_nan());
    }

    // =============================================================================
    // COVERAGE AND ERRORS
    // =============================================================================

    #[test]
    fn triangle_outside_grid_contributes_nothing() {
        let points = store(
            PointLayout::XYZ,
            &[&[10.0, 10.0, 1.0], &[11.0, 10.0, 1.0], &[10.0, 11.0, 1.0]],
        );
        let mut grid = Grid::filled(header(0.0, 1.0, 0.0, 1.0, 0.5, Registration::Gridline), 0.0);
        let stats = TriangleRasterizer::new(&points, RasterQuantity::Value, None)
            .unwrap()
            .rasterize(&[Triangle::new(0, 1, 2).unwrap()], &mut grid)
            .unwrap();
        assert_eq!(stats.outside, 1);
        assert_eq!(stats.cells_written, 0);
        assert!(grid.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn degenerate_triangle_is_skipped() {
        let points = store(
            PointLayout::XYZ,
            &[&[0.0, 0.0, 1.0], &[1.0, 1.0, 2.0], &[2.0, 2.0, 3.0]],
        );
        let mut grid = Grid::filled(header(0.0, 2.0, 0.0, 2.0, 1.0, Registration::Gridline), 0.0);
        let stats = TriangleRasterizer::new(&points, RasterQuantity::Value, None)
            .unwrap()
            .rasterize(&[Triangle::new(0, 1, 2).unwrap()], &mut grid)
            .unwrap();
        assert_eq!(stats.degenerate, 1);
        assert_eq!(stats.cells_written, 0);
    }

    #[test]
    fn shared_boundary_nodes_take_the_last_triangle() {
        // Unit square split along the diagonal; z differs per triangle along it
        let points = store(
            PointLayout::XYZ,
            &[&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0], &[1.0, 1.0, 0.0], &[0.0, 1.0, 0.0]],
        );
        let triangles = [Triangle::new(0, 1, 2).unwrap(), Triangle::new(0, 2, 3).unwrap()];
        let mut grid = Grid::filled(header(0.0, 1.0, 0.0, 1.0, 0.5, Registration::Gridline), f32::NAN);
        let stats = TriangleRasterizer::new(&points, RasterQuantity::Value, None)
            .unwrap()
            .rasterize(&triangles, &mut grid)
            .unwrap();
        // 9 nodes, the 3 on the diagonal are written twice
        assert_eq!(stats.cells_written, 12);
        assert!(grid.data().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn missing_fields_are_reported_up_front() {
        let xy = store(PointLayout::XY, &[&[0.0, 0.0]]);
        assert_eq!(
            TriangleRasterizer::new(&xy, RasterQuantity::DerivativeX, None).unwrap_err(),
            RasterError::MissingElevation {
                quantity: RasterQuantity::DerivativeX
            }
        );

        let xyz = unit_triangle();
        assert_eq!(
            TriangleRasterizer::new(&xyz, RasterQuantity::Uncertainty, None).unwrap_err(),
            RasterError::MissingUncertainty
        );

        let xyzhv = store(PointLayout::XYZHV, &[&[0.0, 0.0, 0.0, 0.0, 0.0]]);
        assert_eq!(
            TriangleRasterizer::new(&xyzhv, RasterQuantity::Uncertainty, None).unwrap_err(),
            RasterError::MissingSlopeGrid
        );
    }

    #[test]
    fn misaligned_slope_grid_is_rejected() {
        let points = store(
            PointLayout::XYZHV,
            &[
                &[0.0, 0.0, 0.0, 0.1, 0.1],
                &[1.0, 0.0, 0.0, 0.1, 0.1],
                &[0.0, 1.0, 0.0, 0.1, 0.1],
            ],
        );
        let slopes = Grid::filled(header(0.0, 1.0, 0.0, 1.0, 0.25, Registration::Gridline), 0.0);
        let mut grid = Grid::filled(header(0.0, 1.0, 0.0, 1.0, 0.5, Registration::Gridline), 0.0);
        let r = TriangleRasterizer::new(&points, RasterQuantity::Uncertainty, Some(&slopes)).unwrap();
        assert!(matches!(
            r.rasterize(&[Triangle::new(0, 1, 2).unwrap()], &mut grid),
            Err(RasterError::SlopeGrid(GridError::HeaderMismatch { .. }))
        ));
    }

    #[test]
    fn shifted_slope_grid_is_rejected() {
        let points = store(
            PointLayout::XYZHV,
            &[
                &[0.0, 0.0, 0.0, 0.1, 0.1],
                &[1.0, 0.0, 0.0, 0.1, 0.1],
                &[0.0, 1.0, 0.0, 0.1, 0.1],
            ],
        );
        // Same node counts, one cell to the east
        let slopes = Grid::filled(header(0.5, 1.5, 0.0, 1.0, 0.5, Registration::Gridline), 0.0);
        let mut grid = Grid::filled(header(0.0, 1.0, 0.0, 1.0, 0.5, Registration::Gridline), 0.0);
        let r = TriangleRasterizer::new(&points, RasterQuantity::Uncertainty, Some(&slopes)).unwrap();
        assert!(matches!(
            r.rasterize(&[Triangle::new(0, 1, 2).unwrap()], &mut grid),
            Err(RasterError::SlopeGrid(GridError::Misaligned { .. }))
        ));
    }

    #[test]
    fn plane_quantities_ignore_the_slope_grid() {
        let points = unit_triangle();
        let slopes = Grid::filled(header(5.0, 6.0, 5.0, 6.0, 0.25, Registration::Gridline), 0.0);
        let mut grid = Grid::filled(header(0.0, 1.0, 0.0, 1.0, 0.5, Registration::Pixel), f32::NAN);
        let stats = TriangleRasterizer::new(&points, RasterQuantity::Value, Some(&slopes))
            .unwrap()
            .rasterize(&[Triangle::new(0, 1, 2).unwrap()], &mut grid)
            .unwrap();
        assert_eq!(stats.cells_written, 3);
        assert!(grid.data().iter().filter(|v| !v.is_nan()).all(|v| v.is_finite()));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let points = store(
            PointLayout::XYZ,
            &[
                &[0.0, 0.0, 0.0],
                &[3.0, 0.0, 1.0],
                &[3.0, 3.0, 4.0],
                &[0.0, 3.0, 2.0],
                &[1.5, 1.5, 5.0],
            ],
        );
        let triangles = [
            Triangle::new(0, 1, 4).unwrap(),
            Triangle::new(1, 2, 4).unwrap(),
            Triangle::new(2, 3, 4).unwrap(),
            Triangle::new(3, 0, 4).unwrap(),
        ];
        let h = header(0.0, 3.0, 0.0, 3.0, 0.1, Registration::Gridline);
        let r = TriangleRasterizer::new(&points, RasterQuantity::Value, None).unwrap();

        let mut sequential = Grid::filled(h, f32::NAN);
        let mut parallel = Grid::filled(h, f32::NAN);
        let s1 = r.rasterize(&triangles, &mut sequential).unwrap();
        let s2 = r.rasterize_parallel(&triangles, &mut parallel).unwrap();

        assert_eq!(s1, s2);
        for (a, b) in sequential.data().iter().zip(parallel.data()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
