//! # Unfurl
//!
//! Harmonic UV parameterization for disk-topology triangle meshes.
//!
//! Unfurl flattens a manifold triangle mesh with a single boundary loop onto
//! the unit disk: the boundary is pinned to the unit circle by arc length and
//! every interior vertex is placed by cotangent-weighted harmonic
//! interpolation, computed with one sparse factorization.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe indices
//! - **Boundary tracing**: ordered loop extraction with arc-length measure
//! - **Harmonic weights**: mean-cotangent Laplace weights from edge lengths
//! - **Direct sparse solve**: one LDLᵀ factorization, two right-hand sides
//!
//! ## Quick Start
//!
//! ```
//! use unfurl::prelude::*;
//!
//! let vertices = [
//!     [0.0, 0.0, 0.0f32],
//!     [1.0, 0.0, 0.0],
//!     [1.0, 1.0, 0.0],
//!     [0.0, 1.0, 0.0],
//! ];
//! let faces = [[0u32, 1, 2], [0, 2, 3]];
//!
//! let mapped = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();
//!
//! assert_eq!(mapped.uvs.len(), 4);
//! for (id, uv) in mapped.uvs.iter() {
//!     println!("vertex {id}: ({:.3}, {:.3})", uv.x, uv.y);
//! }
//! ```
//!
//! ## Working with the Mesh Directly
//!
//! The half-edge mesh underneath the pipeline is public and can be built and
//! traversed on its own:
//!
//! ```
//! use unfurl::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 3);
//!
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation that can fail returns [`error::Result`]. Input defects
//! are never repaired: a non-manifold edge, a closed surface, a multi-loop
//! boundary or a degenerate triangle aborts the mapping with a specific
//! [`error::MeshError`] variant.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod mesh;
pub mod param;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use unfurl::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, EdgeId, Face, FaceId, HalfEdge, HalfEdgeId,
        HalfEdgeMesh, Vertex, VertexId,
    };
    pub use crate::param::{harmonic_map, trace_boundary, MapOptions, MappedMesh, UvMap};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_end_to_end_quad() {
        let vertices = [
            [0.0, 0.0, 0.0f32],
            [2.0, 0.0, 0.0],
            [2.0, 2.0, 0.0],
            [0.0, 2.0, 0.0],
        ];
        let faces = [[0u32, 1, 2], [0, 2, 3]];

        let mapped = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();

        assert_eq!(mapped.vertices.len(), 4);
        assert_eq!(mapped.faces.len(), 2);
        assert_eq!(mapped.uvs.len(), 4);
        for (_, uv) in mapped.uvs.iter() {
            assert!((uv.coords.norm() - 1.0).abs() < 1e-5);
        }
    }
}
