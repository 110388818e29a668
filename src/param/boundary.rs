//! Boundary loop extraction.
//!
//! Locates the single boundary loop of an open mesh and orders its vertices,
//! recording the cumulative arc length at each one. The cumulative lengths
//! drive the circle reparameterization: a boundary vertex at fraction `t` of
//! the total loop length is pinned at angle `2π·t`.

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeId, HalfEdgeMesh, VertexId};

/// The ordered boundary loop of an open mesh.
///
/// Entry `k` of all three sequences refers to the same step of the walk:
/// `halfedges()[k]` starts at `vertices()[k]`, and `cumulative_lengths()[k]`
/// is the arc length from the walk's start to that vertex.
#[derive(Debug, Clone)]
pub struct BoundaryLoop {
    halfedges: Vec<HalfEdgeId>,
    vertices: Vec<VertexId>,
    cumulative: Vec<f64>,
    total_length: f64,
}

impl BoundaryLoop {
    /// The boundary half-edges in loop order.
    pub fn halfedges(&self) -> &[HalfEdgeId] {
        &self.halfedges
    }

    /// The boundary vertices in loop order.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Cumulative arc length at each boundary vertex, starting at zero.
    pub fn cumulative_lengths(&self) -> &[f64] {
        &self.cumulative
    }

    /// Total arc length of the loop.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Number of boundary vertices (equals the number of boundary edges).
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the loop is empty. A traced loop never is.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Trace the boundary loop of the mesh.
///
/// Scans for the first twin-less half-edge and walks the boundary from
/// there, accumulating Euclidean edge lengths, until the walk returns to the
/// start.
///
/// # Errors
///
/// - [`MeshError::NoBoundaryFound`] if the mesh is closed.
/// - [`MeshError::InvalidBoundary`] if the rotation around a vertex exhausts
///   its fan without finding a boundary continuation (non-manifold fan), or
///   if boundary half-edges remain after the walk closes (more than one
///   boundary loop, e.g. a mesh with a hole).
pub fn trace_boundary(mesh: &HalfEdgeMesh) -> Result<BoundaryLoop> {
    let mut boundary_count = 0;
    let mut first = HalfEdgeId::absent();
    for he in mesh.halfedge_ids() {
        if mesh.is_boundary_halfedge(he) {
            if !first.is_present() {
                first = he;
            }
            boundary_count += 1;
        }
    }
    if !first.is_present() {
        return Err(MeshError::NoBoundaryFound);
    }

    let mut halfedges = Vec::new();
    let mut vertices = Vec::new();
    let mut cumulative = Vec::new();
    let mut total_length = 0.0;

    let mut current = first;
    loop {
        halfedges.push(current);
        vertices.push(mesh.origin(current));
        cumulative.push(total_length);
        total_length += mesh.halfedge_length(current);

        current = next_boundary(mesh, current)?;
        if current == first {
            break;
        }

        if halfedges.len() > boundary_count {
            // Deterministic successors make this unreachable, but a corrupt
            // mesh must not hang the walk.
            return Err(MeshError::InvalidBoundary {
                details: "boundary walk did not return to its start".to_string(),
            });
        }
    }

    if halfedges.len() != boundary_count {
        return Err(MeshError::InvalidBoundary {
            details: format!(
                "mesh has more than one boundary loop ({} boundary edges, walked {})",
                boundary_count,
                halfedges.len()
            ),
        });
    }

    Ok(BoundaryLoop {
        halfedges,
        vertices,
        cumulative,
        total_length,
    })
}

/// Find the boundary half-edge that continues the loop after `he`.
///
/// Rotates through the fan of half-edges leaving `he`'s destination (follow
/// twin, then next) until a twin-less one turns up.
fn next_boundary(mesh: &HalfEdgeMesh, he: HalfEdgeId) -> Result<HalfEdgeId> {
    let to = mesh.dest(he);

    let first = mesh.vertex(to).halfedge;
    let mut current = first;
    loop {
        if mesh.is_boundary_halfedge(current) {
            return Ok(current);
        }
        current = mesh.next(mesh.twin(current));
        if current == first {
            return Err(MeshError::InvalidBoundary {
                details: format!(
                    "no boundary continuation around vertex {}",
                    mesh.vertex_id(to)
                ),
            });
        }
    }
}
