//! Half-edge mesh data structure.
//!
//! This module provides a half-edge representation for triangle meshes with
//! boundary. This structure enables O(1) adjacency queries and is the
//! foundation of the parameterization pipeline.
//!
//! # Structure
//!
//! - Each interior edge is split into two **half-edges** pointing in opposite
//!   directions; a boundary edge has exactly one half-edge
//! - Each half-edge knows its **twin** (absent on the boundary), **next**
//!   (next half-edge around its face), **origin vertex**, owning **face**,
//!   and underlying undirected **edge**
//! - Each vertex stores one outgoing half-edge and a dense `id` used as its
//!   row in the linear system
//! - Each face and each edge store one representative half-edge
//!
//! # Boundary Handling
//!
//! A half-edge lies on the boundary exactly when its twin is absent. There
//! are no ghost half-edges outside the faces: every half-edge belongs to a
//! triangle, and the destination of a half-edge is reached through `next`
//! rather than through the twin.

use nalgebra::{Point3, Vector3};

use super::index::{EdgeId, FaceId, HalfEdgeId, VertexId};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    pub halfedge: HalfEdgeId,

    /// Dense row index in `[0, N)`, assigned after construction.
    pub id: usize,
}

impl Vertex {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::absent(),
            id: 0,
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The vertex this half-edge originates from.
    pub origin: VertexId,

    /// The opposite half-edge. Absent if this half-edge lies on the boundary.
    pub twin: HalfEdgeId,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId,

    /// The undirected edge this half-edge belongs to.
    pub edge: EdgeId,

    /// The face this half-edge belongs to.
    pub face: FaceId,
}

impl HalfEdge {
    /// Create a new uninitialized half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::absent(),
            twin: HalfEdgeId::absent(),
            next: HalfEdgeId::absent(),
            edge: EdgeId::absent(),
            face: FaceId::absent(),
        }
    }

    /// Check if this half-edge is on the boundary (has no twin).
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.twin.is_present()
    }
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self::new()
    }
}

/// An undirected edge, represented by one of its half-edges.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// One of the (at most two) half-edges of this edge.
    pub halfedge: HalfEdgeId,
}

impl Edge {
    /// Create a new edge with the given representative half-edge.
    pub fn new(halfedge: HalfEdgeId) -> Self {
        Self { halfedge }
    }
}

/// A triangular face, represented by one of its three half-edges.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId,
}

impl Face {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId) -> Self {
        Self { halfedge }
    }
}

/// A half-edge mesh for triangle meshes with boundary.
///
/// All four entity kinds are arena-held by the mesh and referenced by stable
/// handles, so insertion order never invalidates earlier references.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) halfedges: Vec<HalfEdge>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) faces: Vec<Face>,
}

impl Default for HalfEdgeMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl HalfEdgeMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // 3 half-edges per triangle; edges are at most 3F/2 + boundary slack.
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_faces * 3),
            edges: Vec::with_capacity(num_faces * 3 / 2 + num_faces / 2),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by handle.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by handle.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by handle.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by handle.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        &mut self.halfedges[id.index()]
    }

    /// Get an edge by handle.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Get a face by handle.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Get the dense row id of a vertex.
    #[inline]
    pub fn vertex_id(&self, v: VertexId) -> usize {
        self.vertex(v).id
    }

    // ==================== Topology Queries ====================

    /// Get the twin half-edge, or the absent handle for boundary half-edges.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    ///
    /// Faces are triangles, so `prev` is `next` applied twice.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.next(self.next(he))
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    ///
    /// Reached through `next` within the same face, so this works for
    /// boundary half-edges with no twin.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId) -> VertexId {
        self.origin(self.next(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// Get the undirected edge of a half-edge.
    #[inline]
    pub fn edge_of(&self, he: HalfEdgeId) -> EdgeId {
        self.halfedge(he).edge
    }

    /// Check if a half-edge is on the boundary (has no twin).
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if an undirected edge is on the boundary.
    ///
    /// A boundary edge has exactly one half-edge, which is then also its
    /// representative.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId) -> bool {
        self.is_boundary_halfedge(self.edge(e).halfedge)
    }

    /// Check if a vertex is on the boundary.
    ///
    /// Rotates through the outgoing fan; the fan of a boundary vertex is an
    /// open chain that ends at a twin-less half-edge.
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        let start = self.vertex(v).halfedge;
        if !start.is_present() {
            return true; // isolated vertex
        }

        let mut he = start;
        loop {
            if self.is_boundary_halfedge(he) {
                return true;
            }
            he = self.next(self.twin(he));
            if he == start {
                return false;
            }
        }
    }

    /// The two endpoint vertices of an undirected edge.
    #[inline]
    pub fn edge_endpoints(&self, e: EdgeId) -> (VertexId, VertexId) {
        let he = self.edge(e).halfedge;
        (self.origin(he), self.dest(he))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex handles.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their handles.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge handles.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all edge handles.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all face handles.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over outgoing half-edges around a vertex.
    ///
    /// For boundary vertices the fan is an open chain; the circulator first
    /// rewinds to the chain start, then rotates forward until it falls off
    /// the boundary or closes the loop. Note that a boundary vertex's
    /// incoming boundary edge has no outgoing half-edge here, so that
    /// neighbor is not visited.
    pub fn vertex_halfedges(&self, v: VertexId) -> VertexHalfEdgeIter<'_> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId) -> FaceHalfEdgeIter<'_> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Get the three vertices of a face.
    pub fn face_triangle(&self, f: FaceId) -> [VertexId; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    /// Get the positions of the three vertices of a face.
    pub fn face_positions(&self, f: FaceId) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Compute the valence (degree) of a vertex.
    pub fn valence(&self, v: VertexId) -> usize {
        self.vertex_halfedges(v).count()
    }

    // ==================== Geometry ====================

    /// Compute the normal of a face.
    pub fn face_normal(&self, f: FaceId) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0)).normalize()
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Compute the centroid of a face.
    pub fn face_centroid(&self, f: FaceId) -> Point3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Compute the length of a half-edge.
    pub fn halfedge_length(&self, he: HalfEdgeId) -> f64 {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.dest(he));
        (p1 - p0).norm()
    }

    /// Compute the length of an undirected edge.
    pub fn edge_length(&self, e: EdgeId) -> f64 {
        self.halfedge_length(self.edge(e).halfedge)
    }

    /// Compute the edge vector of a half-edge (origin to destination).
    pub fn edge_vector(&self, he: HalfEdgeId) -> Vector3<f64> {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.dest(he));
        p1 - p0
    }

    // ==================== Validation ====================

    /// Check that all connectivity is consistent.
    ///
    /// Verifies twin involution, that `next` cycles with period three, that
    /// each vertex's stored half-edge originates from it, and that every
    /// edge and face has a valid representative.
    pub fn is_valid(&self) -> bool {
        for (vid, v) in self.vertices() {
            if !v.halfedge.is_present() {
                return false;
            }
            if self.origin(v.halfedge) != vid {
                return false;
            }
        }

        for (i, he) in self.halfedges.iter().enumerate() {
            let heid = HalfEdgeId::new(i);

            if he.twin.is_present() && self.twin(he.twin) != heid {
                return false;
            }

            if !he.next.is_present() || !he.edge.is_present() || !he.face.is_present() {
                return false;
            }

            // All faces are triangles.
            if self.next(self.next(he.next)) != heid {
                return false;
            }
        }

        for e in &self.edges {
            if !e.halfedge.is_present() {
                return false;
            }
        }

        for f in &self.faces {
            if !f.halfedge.is_present() {
                return false;
            }
        }

        true
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its handle.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Assign dense ids to all vertices by enumerating the arena once.
    ///
    /// Ids are a permutation of `[0, N)` in insertion order. Called by the
    /// builder as the final construction pass; insertion order carries no
    /// other meaning.
    pub(crate) fn assign_vertex_ids(&mut self) {
        for (id, v) in self.vertices.iter_mut().enumerate() {
            v.id = id;
        }
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> VertexHalfEdgeIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, v: VertexId) -> Self {
        let mut start = mesh.vertex(v).halfedge;

        // Rewind to the start of an open fan: step backwards until the
        // previous outgoing half-edge would cross the boundary, or we come
        // full circle (interior vertex).
        if start.is_present() {
            let first = start;
            loop {
                let incoming = mesh.prev(start);
                if mesh.is_boundary_halfedge(incoming) {
                    break;
                }
                let back = mesh.twin(incoming);
                if back == first {
                    break;
                }
                start = back;
            }
        }

        Self {
            mesh,
            start,
            current: start,
            done: !start.is_present(),
        }
    }
}

impl<'a> Iterator for VertexHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // Rotate forward: twin then next. Falling off the boundary ends an
        // open fan.
        if self.mesh.is_boundary_halfedge(self.current) {
            self.done = true;
        } else {
            self.current = self.mesh.next(self.mesh.twin(self.current));
            if self.current == self.start {
                self.done = true;
            }
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> FaceHalfEdgeIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, f: FaceId) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_present(),
        }
    }
}

impl<'a> Iterator for FaceHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
