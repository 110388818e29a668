//! Error types for unfurl.
//!
//! Every failure in the pipeline is terminal for the current mapping call:
//! geometric and topological defects are not transient, so nothing is retried
//! internally. The caller decides what to do with the error.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh construction or parameterization.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The input has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// The same directed edge was created twice during construction.
    ///
    /// Two triangles reference the edge with identical winding, which means
    /// the input is non-manifold (or inconsistently oriented).
    #[error("non-manifold mesh: duplicated directed edge ({v0}, {v1})")]
    NonManifoldMesh {
        /// Origin vertex index of the duplicated half-edge.
        v0: usize,
        /// Destination vertex index of the duplicated half-edge.
        v1: usize,
    },

    /// The mesh has no boundary edge (it is a closed surface).
    ///
    /// Disk parameterization requires exactly one boundary loop; closed
    /// meshes must be cut before mapping.
    #[error("mesh has no boundary (closed surface)")]
    NoBoundaryFound,

    /// The boundary walk failed.
    ///
    /// Either the half-edge fan around a boundary vertex is inconsistent
    /// (non-manifold around the vertex), or the mesh has more than one
    /// boundary loop.
    #[error("invalid boundary: {details}")]
    InvalidBoundary {
        /// Description of the failure.
        details: String,
    },

    /// A harmonic weight evaluated to a non-finite value.
    ///
    /// Happens for near-zero-area or collinear triangles adjacent to an
    /// interior edge.
    #[error("degenerate harmonic weight on edge ({v0}, {v1})")]
    DegenerateWeight {
        /// One endpoint of the offending edge (vertex id).
        v0: usize,
        /// The other endpoint of the offending edge (vertex id).
        v1: usize,
    },

    /// Sparse factorization of the harmonic system failed.
    #[error("singular linear system: {details}")]
    SingularSystem {
        /// Description of the failure.
        details: String,
    },
}
