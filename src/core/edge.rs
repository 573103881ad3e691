//! Canonical undirected edge identifiers.
//!
//! A triangle mesh does not store its edges explicitly; they are inferred from
//! the triangle list. [`EdgeKey`] gives each edge a stable, comparable identity:
//!
//! - identifies an edge purely by its two endpoint [`PointIndex`]es
//! - canonicalizes endpoint ordering so `(a, b)` and `(b, a)` map to the same edge
//! - is `Copy`/`Hash`/`Ord` for fast use in sorting, sets and maps
//!
//! ## Ordering
//!
//! Keys order lexicographically by `(begin, end)`. Because point indices are
//! the input record order, this ordering is deterministic across runs.

use crate::core::point_store::PointIndex;
use serde::{Deserialize, Serialize};

/// Canonical identifier for an undirected edge, with `begin <= end`.
///
/// # Examples
///
/// ```rust
/// use trigrid::core::edge::EdgeKey;
///
/// let edge = EdgeKey::new(7, 3);
/// assert_eq!(edge.endpoints(), (3, 7));
/// assert_eq!(edge, EdgeKey::new(3, 7));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    begin: PointIndex,
    end: PointIndex,
}

impl EdgeKey {
    /// Creates a new canonical edge key, swapping endpoints so `begin <= end`.
    #[must_use]
    pub const fn new(a: PointIndex, b: PointIndex) -> Self {
        if a <= b {
            Self { begin: a, end: b }
        } else {
            Self { begin: b, end: a }
        }
    }

    /// Returns the lower endpoint.
    #[inline]
    #[must_use]
    pub const fn begin(self) -> PointIndex {
        self.begin
    }

    /// Returns the higher endpoint.
    #[inline]
    #[must_use]
    pub const fn end(self) -> PointIndex {
        self.end
    }

    /// Returns the two endpoints as a tuple.
    #[inline]
    #[must_use]
    pub const fn endpoints(self) -> (PointIndex, PointIndex) {
        (self.begin, self.end)
    }
}

impl From<(PointIndex, PointIndex)> for EdgeKey {
    #[inline]
    fn from((a, b): (PointIndex, PointIndex)) -> Self {
        Self::new(a, b)
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}
