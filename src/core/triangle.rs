//! Triangles as index triples into a [`PointStore`](crate::core::point_store::PointStore).
//!
//! Triangulation engines return a flat buffer of `3·n` point indices. This
//! module turns that buffer into an arena of [`Triangle`]s, validating every
//! triple once so later passes can index the point store without checks.

use crate::core::point_store::PointIndex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building triangles from engine output.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriangleError {
    /// Two corners of a triangle refer to the same point.
    #[error("triangle ({j}, {k}, {l}) repeats a vertex")]
    RepeatedVertex {
        /// First corner.
        j: PointIndex,
        /// Second corner.
        k: PointIndex,
        /// Third corner.
        l: PointIndex,
    },
    /// A corner refers to a point that does not exist.
    #[error("triangle corner {index} is out of range for {n_points} points")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of points in the store.
        n_points: usize,
    },
    /// The flat index buffer length is not a multiple of three.
    #[error("flat triangle buffer has length {len}, which is not a multiple of 3")]
    IncompleteTriple {
        /// Buffer length.
        len: usize,
    },
}

/// An ordered triple of point indices `(j, k, l)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    vertices: [PointIndex; 3],
}

impl Triangle {
    /// Creates a triangle, rejecting repeated corners.
    ///
    /// # Errors
    ///
    /// Returns [`TriangleError::RepeatedVertex`] if any two indices are equal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trigrid::core::triangle::Triangle;
    ///
    /// let t = Triangle::new(0, 1, 2).unwrap();
    /// assert_eq!(t.vertices(), [0, 1, 2]);
    /// assert!(Triangle::new(0, 1, 0).is_err());
    /// ```
    pub const fn new(j: PointIndex, k: PointIndex, l: PointIndex) -> Result<Self, TriangleError> {
        if j == k || k == l || l == j {
            return Err(TriangleError::RepeatedVertex { j, k, l });
        }
        Ok(Self {
            vertices: [j, k, l],
        })
    }

    /// The three corners in engine order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [PointIndex; 3] {
        self.vertices
    }

    /// The three directed edges `(j, k)`, `(k, l)`, `(l, j)`.
    #[inline]
    #[must_use]
    pub const fn edges(&self) -> [(PointIndex, PointIndex); 3] {
        let [j, k, l] = self.vertices;
        [(j, k), (k, l), (l, j)]
    }
}

/// Builds triangles from a flat `[j0, k0, l0, j1, k1, l1, ...]` buffer.
///
/// # Errors
///
/// Returns an error if the buffer length is not a multiple of three, an index
/// is not below `n_points`, or a triple repeats a vertex.
///
/// # Examples
///
/// ```rust
/// use trigrid::core::triangle::triangles_from_flat;
///
/// let triangles = triangles_from_flat(&[0, 1, 2, 1, 2, 3], 4).unwrap();
/// assert_eq!(triangles.len(), 2);
/// assert_eq!(triangles[1].vertices(), [1, 2, 3]);
/// ```
pub fn triangles_from_flat(flat: &[usize], n_points: usize) -> Result<Vec<Triangle>, TriangleError> {
    if flat.len() % 3 != 0 {
        return Err(TriangleError::IncompleteTriple { len: flat.len() });
    }
    flat.chunks_exact(3)
        .map(|triple| {
            let mut corners = [0 as PointIndex; 3];
            for (corner, &index) in corners.iter_mut().zip(triple) {
                if index >= n_points {
                    return Err(TriangleError::IndexOutOfRange { index, n_points });
                }
                *corner = PointIndex::try_from(index)
                    .map_err(|_| TriangleError::IndexOutOfRange { index, n_points })?;
            }
            Triangle::new(corners[0], corners[1], corners[2])
        })
        .collect()
}
