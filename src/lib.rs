//! # trigrid
//!
//! Grids and segments from triangulated point clouds.
//!
//! Given scattered 2-D points (optionally with elevations, optionally with
//! per-point uncertainty proxies) this crate
//!
//! - triangulates them (Delaunay, via a pluggable [`TriangulationEngine`](core::engine::TriangulationEngine)),
//! - fits a plane to every triangle and scan-converts it into a regular grid,
//!   writing the interpolated value, a partial derivative, or a propagated
//!   uncertainty into every node the triangle covers,
//! - extracts the unique undirected edges of the mesh, and
//! - derives the clipped Voronoi diagram of the points.
//!
//! # Basic Usage
//!
//! ```rust
//! use trigrid::prelude::*;
//!
//! let mut points = PointStore::new(PointLayout::XYZ);
//! for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 2.0]] {
//!     points.push(&p).unwrap();
//! }
//! let triangles = vec![Triangle::new(0, 1, 2).unwrap()];
//!
//! // Grid the triangle's plane over the unit square at 0.5 spacing
//! let region = Region::new(0.0, 1.0, 0.0, 1.0).unwrap();
//! let header = GridHeader::new(region, 0.5, 0.5, Registration::Pixel).unwrap();
//! let mut grid = Grid::filled(header, f32::NAN);
//!
//! TriangleRasterizer::new(&points, RasterQuantity::Value, None)
//!     .unwrap()
//!     .rasterize(&triangles, &mut grid)
//!     .unwrap();
//! assert_eq!(grid.value_at(0.25, 0.25), Some(0.75));
//!
//! // Edges shared by triangles are reported once
//! assert_eq!(extract_unique_edges(&triangles).len(), 3);
//! ```
//!
//! # Runs
//!
//! A complete run is driven by [`TriangulateOptions`](core::config::TriangulateOptions):
//! options are validated into a [`RunPlan`](core::config::RunPlan) before any
//! input is read, the [`Pipeline`](core::pipeline::Pipeline) computes every
//! product, and only then are the grid file and the record stream written.
//! The `triangulate` binary wraps this behind a command-line interface.
//!
//! # Features
//!
//! - `parallel`: rasterize bands of grid rows concurrently with `rayon`. The
//!   output is identical to the sequential pass.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// Point, triangle, edge and grid containers, the run configuration, and the
/// algorithms that turn triangles into grids and edge sets.
pub mod core {
    /// Rasterization, uncertainty propagation and edge extraction
    pub mod algorithms {
        /// Unique undirected edges of a triangle mesh
        pub mod edge_extraction;
        /// Triangle scan conversion into grids
        pub mod rasterize;
        /// Inverse-distance-weighted uncertainty propagation
        pub mod uncertainty;
        pub use edge_extraction::*;
        pub use rasterize::*;
        pub use uncertainty::*;
    }
    pub mod config;
    pub mod edge;
    pub mod engine;
    pub mod grid;
    pub mod pipeline;
    pub mod point_store;
    pub mod triangle;
    // Re-export the `core` modules.
    pub use edge::*;
    pub use grid::*;
    pub use point_store::*;
    pub use triangle::*;
}

/// Pure geometric functions: plane fitting, point-in-polygon tests, distances
/// and clipping.
pub mod geometry {
    pub mod plane;
    pub mod predicates;
    pub mod util;
    pub use plane::*;
    pub use predicates::*;
    pub use util::*;
}

/// Text records in, text records and grid files out.
pub mod io {
    /// ESRI ASCII grid reader and writer
    pub mod grid_file;
    pub mod output;
    pub mod records;
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        algorithms::{edge_extraction::*, rasterize::*, uncertainty::*},
        config::*,
        edge::*,
        engine::*,
        grid::*,
        pipeline::*,
        point_store::*,
        triangle::*,
    };

    // Re-export from geometry
    pub use crate::geometry::{plane::*, predicates::*, util::*};

    // Re-export from io
    pub use crate::io::{grid_file::*, output::*, records::*};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
