//! Unique edge extraction from a triangle list.
//!
//! Every triangle contributes its three edges; each edge is canonicalized into
//! an [`EdgeKey`], the whole sequence is sorted lexicographically and adjacent
//! duplicates are collapsed. An interior edge shared by two triangles therefore
//! appears exactly once in the result.

use crate::core::edge::EdgeKey;
use crate::core::triangle::Triangle;

/// Returns the strictly increasing sequence of distinct undirected edges of the mesh.
///
/// # Examples
///
/// ```rust
/// use trigrid::core::algorithms::edge_extraction::extract_unique_edges;
/// use trigrid::core::triangle::Triangle;
///
/// let triangles = [
///     Triangle::new(0, 1, 2).unwrap(),
///     Triangle::new(1, 2, 3).unwrap(),
/// ];
/// let edges = extract_unique_edges(&triangles);
///
/// // The shared edge (1, 2) is only reported once
/// assert_eq!(edges.len(), 5);
/// ```
#[must_use]
pub fn extract_unique_edges(triangles: &[Triangle]) -> Vec<EdgeKey> {
    let mut edges: Vec<EdgeKey> = triangles
        .iter()
        .flat_map(Triangle::edges)
        .map(EdgeKey::from)
        .collect();

    edges.sort_unstable();
    edges.dedup();

    tracing::debug!(
        n_triangles = triangles.len(),
        n_edges = edges.len(),
        "extracted unique triangle edges"
    );
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(j: u32, k: u32, l: u32) -> Triangle {
        Triangle::new(j, k, l).unwrap()
    }

    #[test]
    fn single_triangle_has_three_edges() {
        let edges = extract_unique_edges(&[tri(2, 0, 1)]);
        let pairs: Vec<_> = edges.iter().map(|e| e.endpoints()).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn shared_edge_collapses() {
        let edges = extract_unique_edges(&[tri(0, 1, 2), tri(1, 2, 3)]);
        let pairs: Vec<_> = edges.iter().map(|e| e.endpoints()).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn opposite_winding_shares_edges() {
        // Same edge visited in both directions by neighbouring triangles
        let edges = extract_unique_edges(&[tri(0, 1, 2), tri(2, 1, 3)]);
        assert_eq!(edges.len(), 5);
    }

    #[test]
    fn closed_fan_counts_within_bounds() {
        // Square split into four triangles around a centre point 4
        let triangles = [tri(0, 1, 4), tri(1, 2, 4), tri(2, 3, 4), tri(3, 0, 4)];
        let edges = extract_unique_edges(&triangles);
        // 4 rim edges + 4 spokes
        assert_eq!(edges.len(), 8);
        assert!(edges.len() <= 3 * triangles.len());
        assert!(edges.len() * 2 >= 3 * triangles.len());
    }

    #[test]
    fn output_is_strictly_increasing() {
        let triangles = [tri(5, 3, 1), tri(1, 3, 0), tri(0, 3, 4), tri(4, 3, 5)];
        let edges = extract_unique_edges(&triangles);
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
        assert!(edges.iter().all(|e| e.begin() <= e.end()));
    }

    #[test]
    fn no_triangles_no_edges() {
        assert!(extract_unique_edges(&[]).is_empty());
    }
}
