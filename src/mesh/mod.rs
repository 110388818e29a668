//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation used by the
//! parameterization pipeline.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], which represents a triangle mesh
//! with boundary using four arena-held entity kinds: vertices, half-edges,
//! undirected edges and faces. Elements are identified by stable handles
//! ([`VertexId`], [`HalfEdgeId`], [`EdgeId`], [`FaceId`]).
//!
//! A boundary edge has exactly one half-edge whose twin handle is absent;
//! interior edges have two half-edges that are mutual twins.
//!
//! # Construction
//!
//! ```
//! use unfurl::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//! ```

mod builder;
mod halfedge;
mod index;

pub use builder::{build_from_triangles, to_face_vertex};
pub use halfedge::{Edge, Face, HalfEdge, HalfEdgeMesh, Vertex};
pub use index::{EdgeId, FaceId, HalfEdgeId, VertexId};
