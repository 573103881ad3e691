//! Index-aligned storage for the input point cloud.
//!
//! Points are kept as a structure of arrays: `x` and `y` are always present,
//! `z` is present when the layout carries an elevation column, and `h`/`v`
//! (horizontal and vertical uncertainty proxies) are present when the layout
//! carries uncertainty columns. Every array is indexed by the same
//! [`PointIndex`], which is the handle triangles and edges refer to.
//!
//! # Examples
//!
//! ```rust
//! use trigrid::core::point_store::{PointLayout, PointStore};
//!
//! let mut store = PointStore::new(PointLayout::XYZ);
//! store.push(&[0.0, 0.0, 1.0]).unwrap();
//! store.push(&[1.0, 0.0, 2.0]).unwrap();
//!
//! assert_eq!(store.len(), 2);
//! assert_eq!(store.z(1), Some(2.0));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index of a point inside a [`PointStore`].
///
/// Triangulation engines hand back signed 32-bit indices, so a `u32` covers the
/// full representable range while keeping triangles and edges compact.
pub type PointIndex = u32;

/// Largest number of points a single run may hold.
///
/// Matches the index range a triangulation engine is required to address.
pub const MAX_POINTS: usize = i32::MAX as usize;

/// Errors raised while populating a [`PointStore`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PointStoreError {
    /// Adding another point would exceed the representable index range.
    #[error("cannot triangulate more than {limit} points")]
    CapacityExceeded {
        /// The configured point limit.
        limit: usize,
    },
    /// A record did not carry enough values for the active layout.
    #[error("record has {found} values but the {layout} layout needs {expected}")]
    MissingField {
        /// Number of values the layout needs.
        expected: usize,
        /// Number of values supplied.
        found: usize,
        /// Human readable layout name.
        layout: PointLayout,
    },
}

/// Which columns an input record carries, interpreted positionally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointLayout {
    /// Records carry an elevation column after `x, y`.
    pub elevation: bool,
    /// Records carry `h, v` uncertainty columns after the coordinates.
    pub uncertainty: bool,
}

impl PointLayout {
    /// `(x, y)` records.
    pub const XY: Self = Self {
        elevation: false,
        uncertainty: false,
    };
    /// `(x, y, z)` records.
    pub const XYZ: Self = Self {
        elevation: true,
        uncertainty: false,
    };
    /// `(x, y, h, v)` records.
    pub const XYHV: Self = Self {
        elevation: false,
        uncertainty: true,
    };
    /// `(x, y, z, h, v)` records.
    pub const XYZHV: Self = Self {
        elevation: true,
        uncertainty: true,
    };

    /// Number of numeric columns a record must supply.
    #[must_use]
    pub const fn columns(self) -> usize {
        2 + self.elevation as usize + 2 * self.uncertainty as usize
    }
}

impl std::fmt::Display for PointLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.elevation, self.uncertainty) {
            (false, false) => write!(f, "(x,y)"),
            (true, false) => write!(f, "(x,y,z)"),
            (false, true) => write!(f, "(x,y,h,v)"),
            (true, true) => write!(f, "(x,y,z,h,v)"),
        }
    }
}

/// Borrowed view of a single point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointView {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Elevation, if the layout has one.
    pub z: Option<f64>,
    /// Horizontal uncertainty proxy, if the layout has one.
    pub h: Option<f64>,
    /// Vertical uncertainty proxy, if the layout has one.
    pub v: Option<f64>,
}

/// Arena of input points, populated once and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointStore {
    layout: PointLayout,
    limit: usize,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    h: Vec<f64>,
    v: Vec<f64>,
}

impl PointStore {
    /// Creates an empty store for the given layout with the default [`MAX_POINTS`] limit.
    #[must_use]
    pub const fn new(layout: PointLayout) -> Self {
        Self::with_limit(layout, MAX_POINTS)
    }

    /// Creates an empty store that refuses to grow past `limit` points.
    #[must_use]
    pub const fn with_limit(layout: PointLayout, limit: usize) -> Self {
        Self {
            layout,
            limit,
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            h: Vec::new(),
            v: Vec::new(),
        }
    }

    /// The record layout this store was created for.
    #[must_use]
    pub const fn layout(&self) -> PointLayout {
        self.layout
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if no point has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Appends one record, interpreted positionally according to the layout.
    ///
    /// Values past the layout's column count are ignored. Uncertainty proxies
    /// are stored as absolute values.
    ///
    /// # Errors
    ///
    /// Returns [`PointStoreError::MissingField`] if `values` is too short and
    /// [`PointStoreError::CapacityExceeded`] if the store is full.
    pub fn push(&mut self, values: &[f64]) -> Result<PointIndex, PointStoreError> {
        let expected = self.layout.columns();
        if values.len() < expected {
            return Err(PointStoreError::MissingField {
                expected,
                found: values.len(),
                layout: self.layout,
            });
        }
        let index = self.len();
        if index >= self.limit {
            return Err(PointStoreError::CapacityExceeded { limit: self.limit });
        }

        self.x.push(values[0]);
        self.y.push(values[1]);
        let mut column = 2;
        if self.layout.elevation {
            self.z.push(values[column]);
            column += 1;
        }
        if self.layout.uncertainty {
            self.h.push(values[column].abs());
            self.v.push(values[column + 1].abs());
        }

        // index < limit <= MAX_POINTS, which fits in a PointIndex
        Ok(index as PointIndex)
    }

    /// Releases spare capacity once reading has finished.
    pub fn shrink_to_fit(&mut self) {
        self.x.shrink_to_fit();
        self.y.shrink_to_fit();
        self.z.shrink_to_fit();
        self.h.shrink_to_fit();
        self.v.shrink_to_fit();
    }

    /// All x coordinates.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.x
    }

    /// All y coordinates.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.y
    }

    /// All elevations, or `None` if the layout has no elevation column.
    #[must_use]
    pub fn zs(&self) -> Option<&[f64]> {
        self.layout.elevation.then_some(self.z.as_slice())
    }

    /// All horizontal uncertainty proxies, if present.
    #[must_use]
    pub fn hs(&self) -> Option<&[f64]> {
        self.layout.uncertainty.then_some(self.h.as_slice())
    }

    /// All vertical uncertainty proxies, if present.
    #[must_use]
    pub fn vs(&self) -> Option<&[f64]> {
        self.layout.uncertainty.then_some(self.v.as_slice())
    }

    /// The `(x, y)` coordinate pair of point `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[inline]
    #[must_use]
    pub fn xy(&self, i: PointIndex) -> [f64; 2] {
        let i = i as usize;
        [self.x[i], self.y[i]]
    }

    /// Elevation of point `i`, if the layout has one.
    #[inline]
    #[must_use]
    pub fn z(&self, i: PointIndex) -> Option<f64> {
        self.zs().map(|z| z[i as usize])
    }

    /// Borrowed view of point `i`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, i: PointIndex) -> Option<PointView> {
        let idx = i as usize;
        if idx >= self.len() {
            return None;
        }
        Some(PointView {
            x: self.x[idx],
            y: self.y[idx],
            z: self.zs().map(|z| z[idx]),
            h: self.hs().map(|h| h[idx]),
            v: self.vs().map(|v| v[idx]),
        })
    }
}
