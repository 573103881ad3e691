//! End-to-end run: read points, build geometry, then write outputs.
//!
//! A run is split in two so that no output is produced unless every geometric
//! step succeeded:
//!
//! 1. [`Pipeline::run`] consumes the points and computes everything the plan
//!    asks for (triangulation, grid, edge set, Voronoi edges), returning
//!    [`RunProducts`].
//! 2. [`RunProducts::write`] writes the grid file and then the record stream.
//!
//! # Examples
//!
//! ```rust
//! use trigrid::core::config::TriangulateOptionsBuilder;
//! use trigrid::core::pipeline::Pipeline;
//! use trigrid::io::records::PointReader;
//!
//! let plan = TriangulateOptionsBuilder::default()
//!     .edges(true)
//!     .build()
//!     .unwrap()
//!     .plan()
//!     .unwrap();
//!
//! let mut reader = PointReader::new(plan.layout);
//! reader.read("points", "0 0\n1 0\n0 1\n".as_bytes()).unwrap();
//!
//! let products = Pipeline::new(plan).run(reader.finish()).unwrap();
//! let mut out = Vec::new();
//! products.write(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap().matches("> Edge").count(), 3);
//! ```

use std::io::Write;
use std::path::PathBuf;

use crate::core::algorithms::edge_extraction::extract_unique_edges;
use crate::core::algorithms::rasterize::{RasterError, RasterQuantity, RasterStats, TriangleRasterizer};
use crate::core::config::{ConfigError, GriddingPlan, RecordOutput, RunPlan};
use crate::core::edge::EdgeKey;
use crate::core::engine::{DelaunatorEngine, EngineError, TriangulationEngine, VoronoiEdge};
use crate::core::grid::Grid;
use crate::core::point_store::PointStore;
use crate::core::triangle::Triangle;
use crate::io::grid_file::{GridFileError, load_grid, save_grid};
use crate::io::output::RecordWriter;
use crate::io::records::RecordError;
use thiserror::Error;

/// Exit classification of a failed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// The options were rejected before any input was read.
    ParseError,
    /// The run failed while reading, computing or writing.
    RuntimeError,
}

impl RunStatus {
    /// Conventional process exit code.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::ParseError => 2,
            Self::RuntimeError => 1,
        }
    }
}

/// Any failure of a run.
#[derive(Debug, Error)]
pub enum TriangulateError {
    /// Conflicting or incomplete options.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Reading input records failed.
    #[error(transparent)]
    Records(#[from] RecordError),
    /// No points were read.
    #[error("no input points were read")]
    InputExhausted,
    /// The triangulation engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The rasterizer rejected its inputs.
    #[error(transparent)]
    Raster(#[from] RasterError),
    /// Reading the slope grid or writing the output grid failed.
    #[error(transparent)]
    GridFile(#[from] GridFileError),
    /// Writing output records failed.
    #[error("failed to write output records: {0}")]
    Output(#[source] std::io::Error),
}

impl TriangulateError {
    /// Classifies the error for exit reporting.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        match self {
            Self::Config(_) => RunStatus::ParseError,
            _ => RunStatus::RuntimeError,
        }
    }
}

/// Record stream computed by a run.
#[derive(Clone, Debug, PartialEq)]
pub enum Records {
    /// Unique triangle edges.
    Edges(Vec<EdgeKey>),
    /// Triangles written as polygons.
    Polygons(Vec<Triangle>),
    /// Triangles written as index rows.
    IndexTable(Vec<Triangle>),
    /// Clipped Voronoi edges.
    Voronoi(Vec<VoronoiEdge>),
}

/// Everything a run computed, ready to be written.
#[derive(Clone, Debug)]
pub struct RunProducts {
    points: PointStore,
    grid: Option<(PathBuf, Grid)>,
    raster_stats: Option<RasterStats>,
    records: Option<Records>,
    output_elevation: bool,
}

impl RunProducts {
    /// The input points.
    #[must_use]
    pub const fn points(&self) -> &PointStore {
        &self.points
    }

    /// The output grid, if gridding was requested.
    #[must_use]
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref().map(|(_, grid)| grid)
    }

    /// Rasterization counters, if gridding was requested.
    #[must_use]
    pub const fn raster_stats(&self) -> Option<RasterStats> {
        self.raster_stats
    }

    /// The record stream, if any.
    #[must_use]
    pub const fn records(&self) -> Option<&Records> {
        self.records.as_ref()
    }

    /// Writes the grid file (if any), then the records to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulateError::GridFile`] or [`TriangulateError::Output`]
    /// on I/O failure.
    pub fn write<W: Write>(&self, out: W) -> Result<(), TriangulateError> {
        if let Some((path, grid)) = &self.grid {
            save_grid(grid, path)?;
        }
        let Some(records) = &self.records else {
            return Ok(());
        };

        let mut writer = RecordWriter::new(out, self.output_elevation);
        match records {
            Records::Edges(edges) => writer.write_edges(&self.points, edges),
            Records::Polygons(triangles) => writer.write_polygons(&self.points, triangles),
            Records::IndexTable(triangles) => writer.write_index_table(triangles),
            Records::Voronoi(edges) => writer.write_voronoi(edges),
        }
        .and_then(|()| writer.flush())
        .map_err(TriangulateError::Output)
    }
}

/// Geometry pass over a validated [`RunPlan`].
#[derive(Clone, Debug)]
pub struct Pipeline<E = DelaunatorEngine> {
    plan: RunPlan,
    engine: E,
}

impl Pipeline {
    /// Creates a pipeline using the default [`DelaunatorEngine`].
    #[must_use]
    pub const fn new(plan: RunPlan) -> Self {
        Self::with_engine(plan, DelaunatorEngine)
    }
}

impl<E: TriangulationEngine> Pipeline<E> {
    /// Creates a pipeline using `engine`.
    #[must_use]
    pub const fn with_engine(plan: RunPlan, engine: E) -> Self {
        Self { plan, engine }
    }

    /// The plan this pipeline executes.
    #[must_use]
    pub const fn plan(&self) -> &RunPlan {
        &self.plan
    }

    /// Computes every product the plan asks for.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulateError::InputExhausted`] for an empty point set, or
    /// the first engine, slope-grid or rasterization error.
    pub fn run(&self, points: PointStore) -> Result<RunProducts, TriangulateError> {
        if points.is_empty() {
            return Err(TriangulateError::InputExhausted);
        }
        tracing::info!(
            points = points.len(),
            engine = self.engine.name(),
            "triangulating input points"
        );

        if self.plan.records == Some(RecordOutput::Voronoi) {
            let region = self.plan.region.ok_or(ConfigError::VoronoiNeedsRegion)?;
            let edges = self.engine.voronoi(&points, &region)?;
            return Ok(RunProducts {
                points,
                grid: None,
                raster_stats: None,
                records: Some(Records::Voronoi(edges)),
                output_elevation: false,
            });
        }

        let triangles = self.engine.triangulate(&points)?;

        let (grid, raster_stats) = match &self.plan.gridding {
            Some(gridding) => {
                let (grid, stats) = Self::grid(&points, &triangles, gridding)?;
                (Some((gridding.output.clone(), grid)), Some(stats))
            }
            None => (None, None),
        };

        let records = self.plan.records.map(|output| match output {
            RecordOutput::Edges => {
                let edges = extract_unique_edges(&triangles);
                tracing::info!(count = edges.len(), "unique triangle edges");
                Records::Edges(edges)
            }
            RecordOutput::Polygons => Records::Polygons(triangles.clone()),
            // Voronoi returned above
            RecordOutput::IndexTable | RecordOutput::Voronoi => Records::IndexTable(triangles.clone()),
        });

        Ok(RunProducts {
            points,
            grid,
            raster_stats,
            records,
            output_elevation: self.plan.output_elevation,
        })
    }

    fn grid(
        points: &PointStore,
        triangles: &[Triangle],
        gridding: &GriddingPlan,
    ) -> Result<(Grid, RasterStats), TriangulateError> {
        let slopes = match &gridding.slope_grid {
            Some(path) if gridding.quantity == RasterQuantity::Uncertainty => Some(load_grid(path)?),
            _ => None,
        };

        let mut grid = Grid::filled(gridding.header, gridding.fill);
        let rasterizer = TriangleRasterizer::new(points, gridding.quantity, slopes.as_ref())?;

        #[cfg(feature = "parallel")]
        let stats = rasterizer.rasterize_parallel(triangles, &mut grid)?;
        #[cfg(not(feature = "parallel"))]
        let stats = rasterizer.rasterize(triangles, &mut grid)?;

        tracing::info!(
            columns = gridding.header.n_columns(),
            rows = gridding.header.n_rows(),
            cells_written = stats.cells_written,
            "gridded triangles"
        );
        Ok((grid, stats))
    }
}
