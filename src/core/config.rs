//! Run configuration and its validation.
//!
//! [`TriangulateOptions`] is the raw, serialisable option set. It is turned
//! into a [`RunPlan`] by [`TriangulateOptions::plan`], which rejects
//! conflicting options before any input is read and resolves which outputs
//! the run produces.
//!
//! # Examples
//!
//! ```rust
//! use trigrid::core::config::{RecordOutput, TriangulateOptionsBuilder};
//! use trigrid::core::grid::Region;
//!
//! let options = TriangulateOptionsBuilder::default()
//!     .grid_output("surface.asc")
//!     .region(Region::new(0.0, 10.0, 0.0, 10.0).unwrap())
//!     .increment([0.5, 0.5])
//!     .edges(true)
//!     .build()
//!     .unwrap();
//!
//! let plan = options.plan().unwrap();
//! assert!(plan.gridding.is_some());
//! assert_eq!(plan.records, Some(RecordOutput::Edges));
//! ```

use std::path::PathBuf;

use crate::core::algorithms::rasterize::RasterQuantity;
use crate::core::grid::{GridError, GridHeader, Region, Registration};
use crate::core::point_store::PointLayout;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conflicting or incomplete options, detected before any input is read.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Grid spacing must be strictly positive.
    #[error("grid increments must be positive, got {dx}/{dy}")]
    NonPositiveIncrement {
        /// Requested x spacing.
        dx: f64,
        /// Requested y spacing.
        dy: f64,
    },
    /// Gridding needs both a region and an increment.
    #[error("grid output requires both a region and an increment")]
    GriddingNeedsRegionAndIncrement,
    /// Gridding and Voronoi output cannot be combined.
    #[error("grid output cannot be combined with Voronoi output")]
    GridWithVoronoi,
    /// Polygon and Voronoi output cannot be combined.
    #[error("polygon output cannot be combined with Voronoi output")]
    PolygonsWithVoronoi,
    /// Voronoi edges are clipped to a region, so one is required.
    #[error("Voronoi output requires a region")]
    VoronoiNeedsRegion,
    /// The region is empty, inverted or not finite.
    #[error("invalid region {region}")]
    InvalidRegion {
        /// The rejected region.
        region: Region,
    },
    /// Region and increment do not describe a usable grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Horizontal axis selector for derivative output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// ∂z/∂x.
    X,
    /// ∂z/∂y.
    Y,
}

impl std::str::FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            other => Err(format!("derivative direction must be x or y, got {other:?}")),
        }
    }
}

/// Raw option set for a run.
///
/// Every field defaults to "off"; see [`TriangulateOptions::plan`] for how they
/// combine.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct TriangulateOptions {
    /// Write a partial derivative instead of the plane value.
    #[builder(setter(strip_option))]
    pub derivative: Option<Axis>,
    /// Value of grid nodes no triangle covers. `None` means NaN.
    #[builder(setter(strip_option))]
    pub empty_value: Option<f64>,
    /// Output grid file; activates gridding.
    #[builder(setter(into, strip_option))]
    pub grid_output: Option<PathBuf>,
    /// Grid spacing `[dx, dy]`.
    #[builder(setter(strip_option))]
    pub increment: Option<[f64; 2]>,
    /// Grid region, also the clip rectangle for Voronoi edges.
    #[builder(setter(strip_option))]
    pub region: Option<Region>,
    /// Node registration of the output grid.
    pub registration: Registration,
    /// Emit the unique triangle edges as segments.
    pub edges: bool,
    /// Emit one record of vertex indices per triangle.
    pub index_table: bool,
    /// Emit each triangle as a closed polygon segment.
    pub polygons: bool,
    /// Emit Voronoi edges instead of triangles.
    pub voronoi: bool,
    /// Input and output records carry an elevation column.
    pub elevation: bool,
    /// Slope grid (radians); activates uncertainty output and `(h, v)` input columns.
    #[builder(setter(into, strip_option))]
    pub slope_grid: Option<PathBuf>,
}

/// Which record stream a run writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordOutput {
    /// Voronoi edges as two-point segments.
    Voronoi,
    /// Unique triangle edges as two-point segments.
    Edges,
    /// Closed triangle polygons.
    Polygons,
    /// Three vertex indices per triangle.
    IndexTable,
}

/// Resolved gridding step.
#[derive(Clone, Debug, PartialEq)]
pub struct GriddingPlan {
    /// Geometry of the output grid.
    pub header: GridHeader,
    /// Destination file.
    pub output: PathBuf,
    /// Initial value of every node.
    pub fill: f32,
    /// Quantity written into covered nodes.
    pub quantity: RasterQuantity,
    /// Slope grid to read for uncertainty output.
    pub slope_grid: Option<PathBuf>,
}

/// Validated description of what a run reads and writes.
#[derive(Clone, Debug, PartialEq)]
pub struct RunPlan {
    /// Columns each input record is interpreted with.
    pub layout: PointLayout,
    /// Gridding step, if requested.
    pub gridding: Option<GriddingPlan>,
    /// Record stream, if any.
    pub records: Option<RecordOutput>,
    /// Clip rectangle for Voronoi edges.
    pub region: Option<Region>,
    /// Output records carry the elevation column.
    pub output_elevation: bool,
}

impl TriangulateOptions {
    /// Returns `true` if a grid file is requested.
    #[must_use]
    pub const fn gridding(&self) -> bool {
        self.grid_output.is_some()
    }

    /// Validates the options and resolves the run.
    ///
    /// Non-fatal oddities (an increment without gridding, a derivative that
    /// will never be written, …) are reported as `tracing` warnings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for conflicting or incomplete options.
    pub fn plan(&self) -> Result<RunPlan, ConfigError> {
        self.validate()?;
        self.warn_unused();

        let gridding = match (&self.grid_output, self.region, self.increment) {
            (Some(output), Some(region), Some([dx, dy])) => Some(GriddingPlan {
                header: GridHeader::new(region, dx, dy, self.registration)?,
                output: output.clone(),
                fill: self.fill(),
                quantity: self.quantity(),
                slope_grid: self.slope_grid.clone(),
            }),
            _ => None,
        };

        let layout = PointLayout {
            elevation: self.elevation || gridding.is_some(),
            uncertainty: self.slope_grid.is_some(),
        };

        let plan = RunPlan {
            layout,
            records: self.record_output(),
            region: self.region,
            output_elevation: self.elevation && !self.voronoi,
            gridding,
        };
        tracing::debug!(?plan, "resolved run plan");
        Ok(plan)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some([dx, dy]) = self.increment {
            if !(dx > 0.0 && dy > 0.0) {
                return Err(ConfigError::NonPositiveIncrement { dx, dy });
            }
        }
        if self.gridding() && (self.region.is_none() || self.increment.is_none()) {
            return Err(ConfigError::GriddingNeedsRegionAndIncrement);
        }
        if self.gridding() && self.voronoi {
            return Err(ConfigError::GridWithVoronoi);
        }
        if self.polygons && self.voronoi {
            return Err(ConfigError::PolygonsWithVoronoi);
        }
        if self.voronoi && self.region.is_none() {
            return Err(ConfigError::VoronoiNeedsRegion);
        }
        if let Some(region) = self.region.filter(|r| r.validate().is_err()) {
            return Err(ConfigError::InvalidRegion { region });
        }
        Ok(())
    }

    fn warn_unused(&self) {
        if self.increment.is_some() && !self.gridding() {
            tracing::warn!("increment given without grid output; it is ignored");
        }
        if self.region.is_some() && !self.gridding() && !self.voronoi {
            tracing::warn!("region given without grid or Voronoi output; it is ignored");
        }
        if self.voronoi && self.elevation {
            tracing::warn!("Voronoi output carries x,y only; the elevation column is not written");
        }
        if self.derivative.is_some() && !self.gridding() {
            tracing::warn!("derivative output only applies to grid output; it is ignored");
        }
        if self.slope_grid.is_some() && !self.gridding() {
            tracing::warn!("uncertainty output only applies to grid output; the slope grid is ignored");
        }
        if self.derivative.is_some() && self.slope_grid.is_some() {
            tracing::warn!("derivative output takes precedence over uncertainty output");
        }
    }

    #[expect(clippy::cast_possible_truncation, reason = "grid nodes are stored as f32")]
    fn fill(&self) -> f32 {
        self.empty_value.map_or(f32::NAN, |v| v as f32)
    }

    const fn quantity(&self) -> RasterQuantity {
        match (self.derivative, self.slope_grid.is_some()) {
            (Some(Axis::X), _) => RasterQuantity::DerivativeX,
            (Some(Axis::Y), _) => RasterQuantity::DerivativeY,
            (None, true) => RasterQuantity::Uncertainty,
            (None, false) => RasterQuantity::Value,
        }
    }

    const fn record_output(&self) -> Option<RecordOutput> {
        if self.voronoi {
            Some(RecordOutput::Voronoi)
        } else if self.edges {
            Some(RecordOutput::Edges)
        } else if self.polygons {
            Some(RecordOutput::Polygons)
        } else if self.index_table || !self.gridding() {
            Some(RecordOutput::IndexTable)
        } else {
            None
        }
    }
}
