//! Mesh construction utilities.
//!
//! This module builds a half-edge mesh from a triangle soup (vertex positions
//! plus index triples) and converts it back to flat arrays afterwards.
//!
//! Construction walks every triangle once, creating half-edges as it goes and
//! resolving vertices and undirected edges through hash maps keyed by input
//! indices. A second pass per triangle links `next` pointers. Vertices are
//! created on first reference, so unreferenced input positions do not end up
//! in the mesh and output indices are dense.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Edge, Face, HalfEdge, HalfEdgeMesh};
use super::index::{EdgeId, FaceId, HalfEdgeId, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - Vertex positions; faces index into this slice
/// * `faces` - Triangles as `[v0, v1, v2]` indices in counter-clockwise order
///
/// # Errors
///
/// Returns [`MeshError::NonManifoldMesh`] if the same directed edge occurs in
/// two triangles (identical winding on a shared edge, or more than two faces
/// on one edge). Malformed input is rejected up front with
/// [`MeshError::EmptyMesh`], [`MeshError::InvalidVertexIndex`] or
/// [`MeshError::DegenerateFace`].
///
/// # Example
/// ```
/// use unfurl::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles(
    vertices: &[Point3<f64>],
    faces: &[[u32; 3]],
) -> Result<HalfEdgeMesh> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi as usize >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex {
                    face: fi,
                    vertex: vi as usize,
                });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());

    // Resolution maps, all keyed by input indices.
    let mut added_halfedges: HashMap<(u32, u32), HalfEdgeId> = HashMap::new();
    let mut added_edges: HashMap<(u32, u32), EdgeId> = HashMap::new();
    let mut added_vertices: HashMap<u32, VertexId> = HashMap::new();

    for tri in faces {
        let face_id = FaceId::new(mesh.num_faces());
        mesh.faces.push(Face::new(HalfEdgeId::absent()));

        // Three half-edges per triangle.
        for k in 0..3 {
            let i0 = tri[k];
            let i1 = tri[(k + 1) % 3];

            if added_halfedges.contains_key(&(i0, i1)) {
                return Err(MeshError::NonManifoldMesh {
                    v0: i0 as usize,
                    v1: i1 as usize,
                });
            }
            let he = HalfEdgeId::new(mesh.num_halfedges());
            mesh.halfedges.push(HalfEdge::new());
            added_halfedges.insert((i0, i1), he);

            // Resolve or create the undirected edge.
            let key = if i0 < i1 { (i0, i1) } else { (i1, i0) };
            let edge = *added_edges.entry(key).or_insert_with(|| {
                let e = EdgeId::new(mesh.num_edges());
                mesh.edges.push(Edge::new(he));
                e
            });

            // Resolve or create the origin vertex.
            let vertex = match added_vertices.get(&i0) {
                Some(&v) => v,
                None => {
                    let v = mesh.add_vertex(vertices[i0 as usize]);
                    added_vertices.insert(i0, v);
                    v
                }
            };
            mesh.vertex_mut(vertex).halfedge = he;

            {
                let h = mesh.halfedge_mut(he);
                h.origin = vertex;
                h.edge = edge;
                h.face = face_id;
            }
            // The representative is the first corner's half-edge, so face
            // traversal starts where the input triangle does.
            if k == 0 {
                mesh.faces[face_id.index()].halfedge = he;
            }

            // Pair with the reversed directed edge if it already exists.
            if let Some(&twin) = added_halfedges.get(&(i1, i0)) {
                mesh.halfedge_mut(twin).twin = he;
                mesh.halfedge_mut(he).twin = twin;
            }
        }

        // Link each half-edge to the one starting at its destination within
        // the same triangle.
        for k in 0..3 {
            let i0 = tri[k];
            let i1 = tri[(k + 1) % 3];
            let i2 = tri[(k + 2) % 3];

            let he = added_halfedges[&(i0, i1)];
            let next = added_halfedges[&(i1, i2)];
            mesh.halfedge_mut(he).next = next;
        }
    }

    mesh.assign_vertex_ids();

    Ok(mesh)
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Vertex positions come out in dense id order; faces carry the dense ids of
/// their corners, traversed via `next` so the output connectivity matches the
/// half-edge connectivity.
pub fn to_face_vertex(mesh: &HalfEdgeMesh) -> (Vec<Point3<f64>>, Vec<[u32; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[u32; 3]> = mesh
        .face_ids()
        .map(|f| {
            let [v0, v1, v2] = mesh.face_triangle(f);
            [
                mesh.vertex_id(v0) as u32,
                mesh.vertex_id(v1) as u32,
                mesh.vertex_id(v2) as u32,
            ]
        })
        .collect();

    (vertices, faces)
}
