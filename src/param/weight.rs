//! Harmonic edge weights.
//!
//! For an interior edge shared by two triangles, the discrete Laplace weight
//! is the average cotangent of the two angles opposite the edge:
//!
//! ```text
//!            /\
//!          / u \
//!      b1/      \a1
//!      /    c    \
//!    / -----------\
//!    \            /
//!     \         /
//!    a2\      /b2
//!       \ v /
//!        \/
//!
//!    weight = (cot(u) + cot(v)) / 2
//! ```
//!
//! The cosines come from the law of cosines on the side lengths; the sines
//! from `sqrt(1 - cos²)`. Degenerate triangles drive the sines toward zero
//! and the weight toward infinity (or NaN past the collinear point), so a
//! non-finite result is rejected rather than propagated into the system.

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, HalfEdgeMesh};

/// Compute the harmonic weight of an interior edge.
///
/// The edge must not be on the boundary: both adjacent triangles are
/// consulted.
///
/// # Errors
///
/// Returns [`MeshError::DegenerateWeight`] if the weight evaluates to a
/// non-finite value, which happens when one of the adjacent triangles is
/// collinear or has (near-)zero area.
pub fn harmonic_weight(mesh: &HalfEdgeMesh, e: EdgeId) -> Result<f64> {
    debug_assert!(!mesh.is_boundary_edge(e), "weights are for interior edges");

    let he = mesh.edge(e).halfedge;
    let twin = mesh.twin(he);

    // Length of the shared edge, then the other two sides of each triangle.
    let c = mesh.halfedge_length(he);
    let a1 = mesh.halfedge_length(mesh.next(he));
    let b1 = mesh.halfedge_length(mesh.prev(he));
    let a2 = mesh.halfedge_length(mesh.next(twin));
    let b2 = mesh.halfedge_length(mesh.prev(twin));

    let weight = 0.5 * (cot_opposite(a1, b1, c) + cot_opposite(a2, b2, c));

    if weight.is_finite() {
        Ok(weight)
    } else {
        let (v0, v1) = mesh.edge_endpoints(e);
        Err(MeshError::DegenerateWeight {
            v0: mesh.vertex_id(v0),
            v1: mesh.vertex_id(v1),
        })
    }
}

/// Cotangent of the angle opposite side `c` in a triangle with sides
/// `a`, `b`, `c`.
fn cot_opposite(a: f64, b: f64, c: f64) -> f64 {
    let cos = (a * a + b * b - c * c) / (2.0 * a * b);
    let sin = (1.0 - cos * cos).sqrt();
    cos / sin
}
