//! Text record output.
//!
//! Segment-based outputs (edges, polygons, Voronoi edges) are written as a
//! header line starting with `>` followed by one record per vertex. Fields are
//! tab separated.

use std::io::{self, Write};

use crate::core::edge::EdgeKey;
use crate::core::engine::VoronoiEdge;
use crate::core::point_store::{PointIndex, PointStore};
use crate::core::triangle::Triangle;

/// Marker that opens a segment header line.
pub const SEGMENT_MARKER: char = '>';

/// Writes edges, polygons, index tables and Voronoi edges as text records.
///
/// # Examples
///
/// ```rust
/// use trigrid::core::edge::EdgeKey;
/// use trigrid::core::point_store::{PointLayout, PointStore};
/// use trigrid::io::output::RecordWriter;
///
/// let mut points = PointStore::new(PointLayout::XY);
/// points.push(&[0.0, 0.0]).unwrap();
/// points.push(&[1.5, 2.0]).unwrap();
///
/// let mut writer = RecordWriter::new(Vec::new(), false);
/// writer.write_edges(&points, &[EdgeKey::new(1, 0)]).unwrap();
/// let text = String::from_utf8(writer.into_inner()).unwrap();
/// assert_eq!(text, "> Edge 0-1\n0\t0\n1.5\t2\n");
/// ```
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    out: W,
    elevation: bool,
}

impl<W: Write> RecordWriter<W> {
    /// Wraps `out`. With `elevation` set, vertex records carry `z` after `x, y`.
    pub const fn new(out: W, elevation: bool) -> Self {
        Self { out, elevation }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes each edge as a two-vertex segment headed `Edge begin-end`.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying writer.
    pub fn write_edges(&mut self, points: &PointStore, edges: &[EdgeKey]) -> io::Result<()> {
        for edge in edges {
            self.header(format_args!("Edge {edge}"))?;
            self.vertex(points, edge.begin())?;
            self.vertex(points, edge.end())?;
        }
        tracing::info!(count = edges.len(), "wrote triangle edges");
        Ok(())
    }

    /// Writes each triangle as a three-vertex segment headed `Polygon j-k-l -Z<i>`.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying writer.
    pub fn write_polygons(&mut self, points: &PointStore, triangles: &[Triangle]) -> io::Result<()> {
        for (i, triangle) in triangles.iter().enumerate() {
            let [j, k, l] = triangle.vertices();
            self.header(format_args!("Polygon {j}-{k}-{l} -Z{i}"))?;
            for vertex in [j, k, l] {
                self.vertex(points, vertex)?;
            }
        }
        tracing::info!(count = triangles.len(), "wrote triangle polygons");
        Ok(())
    }

    /// Writes one record of three vertex indices per triangle.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying writer.
    pub fn write_index_table(&mut self, triangles: &[Triangle]) -> io::Result<()> {
        for triangle in triangles {
            let [j, k, l] = triangle.vertices();
            writeln!(self.out, "{j}\t{k}\t{l}")?;
        }
        tracing::info!(count = triangles.len(), "wrote triangle index table");
        Ok(())
    }

    /// Writes each Voronoi edge as a two-vertex segment headed `Edge <i>`.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying writer.
    pub fn write_voronoi(&mut self, edges: &[VoronoiEdge]) -> io::Result<()> {
        for (i, edge) in edges.iter().enumerate() {
            self.header(format_args!("Edge {i}"))?;
            for [x, y] in [edge.start, edge.end] {
                writeln!(self.out, "{x}\t{y}")?;
            }
        }
        tracing::info!(count = edges.len(), "wrote Voronoi edges");
        Ok(())
    }

    /// Flushes the underlying writer.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn header(&mut self, label: std::fmt::Arguments<'_>) -> io::Result<()> {
        writeln!(self.out, "{SEGMENT_MARKER} {label}")
    }

    fn vertex(&mut self, points: &PointStore, i: PointIndex) -> io::Result<()> {
        let [x, y] = points.xy(i);
        match points.z(i).filter(|_| self.elevation) {
            Some(z) => writeln!(self.out, "{x}\t{y}\t{z}"),
            None => writeln!(self.out, "{x}\t{y}"),
        }
    }
}
