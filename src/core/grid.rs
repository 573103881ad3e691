//! Regular raster container and its coordinate mapping.
//!
//! A [`GridHeader`] describes the raster geometry: the region `w/e/s/n`, the
//! spacing `(dx, dy)`, the node counts and the [`Registration`]. Row 0 is the
//! northernmost row and columns increase eastwards; cell values are stored
//! row-major in a [`Grid`] as `f32`.
//!
//! # Registration
//!
//! | Registration | nodes sit on | `n_columns` |
//! |---|---|---|
//! | [`Registration::Gridline`] | the region boundary and every `dx` inside it | `(e-w)/dx + 1` |
//! | [`Registration::Pixel`] | the centres of `dx × dy` cells tiling the region | `(e-w)/dx` |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when describing or combining grids.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GridError {
    /// Grid spacing must be strictly positive in both axes.
    #[error("grid increments must be positive, got dx={dx}, dy={dy}")]
    InvalidIncrement {
        /// Requested x spacing.
        dx: f64,
        /// Requested y spacing.
        dy: f64,
    },
    /// The region is empty or inverted.
    #[error("invalid region {region}: need west < east and south < north")]
    InvalidRegion {
        /// The rejected region.
        region: Region,
    },
    /// The spacing does not yield at least one node per axis.
    #[error("region {region} with spacing {dx}/{dy} holds no grid nodes")]
    EmptyGrid {
        /// Region that was requested.
        region: Region,
        /// Requested x spacing.
        dx: f64,
        /// Requested y spacing.
        dy: f64,
    },
    /// Two grids that must be aligned node-for-node are not.
    #[error("grid is {found_columns}x{found_rows} but {expected_columns}x{expected_rows} was expected")]
    HeaderMismatch {
        /// Expected number of columns.
        expected_columns: usize,
        /// Expected number of rows.
        expected_rows: usize,
        /// Actual number of columns.
        found_columns: usize,
        /// Actual number of rows.
        found_rows: usize,
    },
    /// Two grids have the same node counts but different geometry.
    #[error("grid {found} is not aligned with {expected}")]
    Misaligned {
        /// Geometry that was expected.
        expected: GridHeader,
        /// Geometry that was found.
        found: GridHeader,
    },
    /// The node count does not fit in memory.
    #[error("a {n_columns}x{n_rows} grid is too large to allocate")]
    TooLarge {
        /// Requested number of columns.
        n_columns: usize,
        /// Requested number of rows.
        n_rows: usize,
    },
    /// Data length disagrees with the header.
    #[error("grid data holds {found} values but the header needs {expected}")]
    DataLength {
        /// Values required by the header.
        expected: usize,
        /// Values supplied.
        found: usize,
    },
}

/// Rectangular region `west/east/south/north`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Minimum x.
    pub west: f64,
    /// Maximum x.
    pub east: f64,
    /// Minimum y.
    pub south: f64,
    /// Maximum y.
    pub north: f64,
}

impl Region {
    /// Creates a region, checking `west < east` and `south < north`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRegion`] for empty, inverted or non-finite bounds.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Result<Self, GridError> {
        let region = Self {
            west,
            east,
            south,
            north,
        };
        region.validate()?;
        Ok(region)
    }

    /// Checks the region is finite and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRegion`] if it is not.
    pub fn validate(&self) -> Result<(), GridError> {
        let finite = [self.west, self.east, self.south, self.north]
            .iter()
            .all(|v| v.is_finite());
        if finite && self.west < self.east && self.south < self.north {
            Ok(())
        } else {
            Err(GridError::InvalidRegion { region: *self })
        }
    }

    /// Returns `true` if `(x, y)` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.west..=self.east).contains(&x) && (self.south..=self.north).contains(&y)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}/{}", self.west, self.east, self.south, self.north)
    }
}

/// Whether grid values represent nodes on the region boundary or cell centres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Registration {
    /// Node (gridline) registration.
    #[default]
    Gridline,
    /// Cell-centre (pixel) registration.
    Pixel,
}

impl Registration {
    /// Half-cell offset: `0` for gridline, `0.5` for pixel registration.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> f64 {
        match self {
            Self::Gridline => 0.0,
            Self::Pixel => 0.5,
        }
    }
}

/// Raster geometry shared by the output grid and the slope grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridHeader {
    region: Region,
    dx: f64,
    dy: f64,
    registration: Registration,
    n_columns: usize,
    n_rows: usize,
}

impl GridHeader {
    /// Derives the node layout for `region` sampled every `(dx, dy)`.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive spacing, an invalid region, a spacing
    /// that does not fit one cell into the region, or a node count too large
    /// to allocate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trigrid::core::grid::{GridHeader, Region, Registration};
    ///
    /// let region = Region::new(0.0, 1.0, 0.0, 1.0).unwrap();
    /// let nodes = GridHeader::new(region, 0.5, 0.5, Registration::Gridline).unwrap();
    /// let cells = GridHeader::new(region, 0.5, 0.5, Registration::Pixel).unwrap();
    /// assert_eq!((nodes.n_columns(), nodes.n_rows()), (3, 3));
    /// assert_eq!((cells.n_columns(), cells.n_rows()), (2, 2));
    /// assert_eq!(cells.col_to_x(0), 0.25);
    /// ```
    pub fn new(
        region: Region,
        dx: f64,
        dy: f64,
        registration: Registration,
    ) -> Result<Self, GridError> {
        if !(dx > 0.0 && dy > 0.0 && dx.is_finite() && dy.is_finite()) {
            return Err(GridError::InvalidIncrement { dx, dy });
        }
        region.validate()?;

        let n_columns = node_count(region.east - region.west, dx, registration);
        let n_rows = node_count(region.north - region.south, dy, registration);
        let (Some(n_columns), Some(n_rows)) = (n_columns, n_rows) else {
            return Err(GridError::EmptyGrid { region, dx, dy });
        };
        match n_columns.checked_mul(n_rows) {
            Some(size) if size <= MAX_NODES => Ok(Self {
                region,
                dx,
                dy,
                registration,
                n_columns,
                n_rows,
            }),
            _ => Err(GridError::TooLarge { n_columns, n_rows }),
        }
    }

    /// The grid region.
    #[must_use]
    pub const fn region(&self) -> Region {
        self.region
    }

    /// X spacing.
    #[must_use]
    pub const fn dx(&self) -> f64 {
        self.dx
    }

    /// Y spacing.
    #[must_use]
    pub const fn dy(&self) -> f64 {
        self.dy
    }

    /// Node registration.
    #[must_use]
    pub const fn registration(&self) -> Registration {
        self.registration
    }

    /// Number of columns.
    #[must_use]
    pub const fn n_columns(&self) -> usize {
        self.n_columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Total number of nodes.
    ///
    /// [`GridHeader::new`] keeps this product within the allocatable range.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.n_columns * self.n_rows
    }

    /// Column index nearest to `x`. May fall outside `0..n_columns`.
    #[inline]
    #[must_use]
    pub fn x_to_col(&self, x: f64) -> i64 {
        ((x - self.region.west) / self.dx - self.registration.offset()).round() as i64
    }

    /// Row index nearest to `y`, counting down from the north edge. May fall outside `0..n_rows`.
    #[inline]
    #[must_use]
    pub fn y_to_row(&self, y: f64) -> i64 {
        ((self.region.north - y) / self.dy - self.registration.offset()).round() as i64
    }

    /// X coordinate of column `col`.
    #[inline]
    #[must_use]
    pub fn col_to_x(&self, col: usize) -> f64 {
        (col as f64 + self.registration.offset()).mul_add(self.dx, self.region.west)
    }

    /// Y coordinate of row `row`.
    #[inline]
    #[must_use]
    pub fn row_to_y(&self, row: usize) -> f64 {
        (row as f64 + self.registration.offset()).mul_add(-self.dy, self.region.north)
    }

    /// Linear index of node `(row, col)` in row-major storage.
    #[inline]
    #[must_use]
    pub const fn index(&self, row: usize, col: usize) -> usize {
        row * self.n_columns + col
    }

    /// Checks that `other` places its nodes at the same coordinates.
    ///
    /// Bounds and spacings may differ by [`ALIGNMENT_TOLERANCE`] of a spacing.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::HeaderMismatch`] if the node counts differ and
    /// [`GridError::Misaligned`] if the registration, spacing or region differ.
    pub fn ensure_aligned(&self, other: &Self) -> Result<(), GridError> {
        if self.n_columns != other.n_columns || self.n_rows != other.n_rows {
            return Err(GridError::HeaderMismatch {
                expected_columns: self.n_columns,
                expected_rows: self.n_rows,
                found_columns: other.n_columns,
                found_rows: other.n_rows,
            });
        }

        let close = |a: f64, b: f64, inc: f64| (a - b).abs() <= ALIGNMENT_TOLERANCE * inc;
        let (a, b) = (self.region, other.region);
        let aligned = self.registration == other.registration
            && close(self.dx, other.dx, self.dx)
            && close(self.dy, other.dy, self.dy)
            && close(a.west, b.west, self.dx)
            && close(a.east, b.east, self.dx)
            && close(a.south, b.south, self.dy)
            && close(a.north, b.north, self.dy);
        if aligned {
            Ok(())
        } else {
            Err(GridError::Misaligned {
                expected: *self,
                found: *other,
            })
        }
    }
}

impl std::fmt::Display for GridHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registration = match self.registration {
            Registration::Gridline => "gridline",
            Registration::Pixel => "pixel",
        };
        write!(f, "{} at {}/{} ({registration})", self.region, self.dx, self.dy)
    }
}

/// Largest node count a [`Grid`] may hold.
const MAX_NODES: usize = isize::MAX as usize / std::mem::size_of::<f32>();

/// Largest difference between two aligned bounds or spacings, as a fraction of the spacing.
pub const ALIGNMENT_TOLERANCE: f64 = 1e-6;

/// Nodes along one axis; `None` unless at least one whole cell fits.
///
/// Counts beyond `usize` saturate and are rejected by the size check.
fn node_count(extent: f64, inc: f64, registration: Registration) -> Option<usize> {
    let cells = (extent / inc).round();
    let nodes = match registration {
        Registration::Gridline => cells + 1.0,
        Registration::Pixel => cells,
    };
    (cells >= 1.0).then_some(nodes as usize)
}

/// A raster of `f32` node values with its header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    header: GridHeader,
    data: Vec<f32>,
}

impl Grid {
    /// Allocates a grid with every node set to `fill`.
    #[must_use]
    pub fn filled(header: GridHeader, fill: f32) -> Self {
        Self {
            header,
            data: vec![fill; header.size()],
        }
    }

    /// Wraps existing row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DataLength`] if `data` does not match the header.
    pub fn from_data(header: GridHeader, data: Vec<f32>) -> Result<Self, GridError> {
        if data.len() != header.size() {
            return Err(GridError::DataLength {
                expected: header.size(),
                found: data.len(),
            });
        }
        Ok(Self { header, data })
    }

    /// The grid header.
    #[must_use]
    pub const fn header(&self) -> &GridHeader {
        &self.header
    }

    /// Row-major node values.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable row-major node values.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        (row < self.header.n_rows && col < self.header.n_columns)
            .then(|| self.data[self.header.index(row, col)])
    }

    /// Value at the node nearest to `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn value_at(&self, x: f64, y: f64) -> Option<f32> {
        let col = usize::try_from(self.header.x_to_col(x)).ok()?;
        let row = usize::try_from(self.header.y_to_row(y)).ok()?;
        self.get(row, col)
    }
}
