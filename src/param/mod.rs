//! Harmonic disk parameterization.
//!
//! This module computes a UV coordinate for every vertex of a triangulated,
//! disk-like surface mesh: the boundary loop is mapped onto the unit circle
//! by arc length, and interior vertices are placed by harmonic (Tutte-style)
//! interpolation, solved as one sparse linear system per UV channel.
//!
//! # Pipeline
//!
//! 1. [`build_from_triangles`](crate::mesh::build_from_triangles) turns the
//!    triangle soup into a half-edge mesh.
//! 2. [`trace_boundary`] orders the boundary loop and measures cumulative
//!    arc length.
//! 3. [`assemble`] evaluates the cotangent weight of every interior edge and
//!    builds the sparse system with circle Dirichlet conditions.
//! 4. [`HarmonicSystem::solve`] factorizes once and solves both channels.
//! 5. The mesh is flattened back to vertex/index arrays with the UVs
//!    attached.
//!
//! # Requirements
//!
//! The input must be a manifold triangle mesh with exactly one boundary
//! loop and consistent counter-clockwise winding. Closed meshes, meshes
//! with holes and non-manifold connectivity are rejected, not repaired.
//!
//! # Example
//!
//! ```
//! use unfurl::param::{harmonic_map, MapOptions};
//!
//! let vertices = [
//!     [0.0, 0.0, 0.0f32],
//!     [1.0, 0.0, 0.0],
//!     [0.5, 1.0, 0.0],
//! ];
//! let faces = [[0u32, 1, 2]];
//!
//! let mapped = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();
//! for (id, uv) in mapped.uvs.iter() {
//!     println!("vertex {id}: u={:.3}, v={:.3}", uv.x, uv.y);
//! }
//! ```

mod boundary;
mod sparse;
mod system;
mod uv;
mod weight;

pub use boundary::{trace_boundary, BoundaryLoop};
pub use sparse::{CsrMatrix, LdlFactor};
pub use system::{assemble, HarmonicSystem};
pub use uv::UvMap;
pub use weight::harmonic_weight;

use nalgebra::{Point2, Point3};

use crate::error::Result;
use crate::mesh::{build_from_triangles, to_face_vertex};

/// Options for [`harmonic_map`].
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    /// Also emit the boundary edges of the flattened mesh as raw 2-point
    /// segments in UV space, for overlay visualization.
    pub boundary_segments: bool,
}

impl MapOptions {
    /// Request boundary segments in the output.
    pub fn with_boundary_segments(mut self) -> Self {
        self.boundary_segments = true;
        self
    }
}

/// A parameterized mesh: flat vertex/index arrays plus per-vertex UVs.
///
/// Vertex count and order may differ from the input: the topology builder
/// deduplicates vertices by index and assigns dense ids.
#[derive(Debug, Clone)]
pub struct MappedMesh {
    /// Vertex positions in dense id order.
    pub vertices: Vec<[f32; 3]>,
    /// Triangles indexing into `vertices`.
    pub faces: Vec<[u32; 3]>,
    /// One UV pair per entry of `vertices`.
    pub uvs: UvMap,
    /// Boundary edges of the flattened mesh as `[u0, v0, u1, v1]` segments
    /// in loop order, if requested.
    pub boundary_segments: Option<Vec<[f64; 4]>>,
}

/// Automatically UV-map a mesh with harmonic mapping.
///
/// The boundary is pinned to the unit circle at angles proportional to its
/// cumulative arc length; interior vertices satisfy the cotangent-weighted
/// discrete Laplace equation. The result is deterministic: identical input
/// produces bit-identical output.
///
/// # Arguments
///
/// * `vertices` - Vertex positions of the input mesh
/// * `faces` - Triangle indices in counter-clockwise order
/// * `options` - Output options
///
/// # Errors
///
/// Every defect is terminal for the call and reported from its origin:
/// non-manifold input ([`MeshError::NonManifoldMesh`]), closed surfaces
/// ([`MeshError::NoBoundaryFound`]), inconsistent or multi-loop boundaries
/// ([`MeshError::InvalidBoundary`]), degenerate triangles next to interior
/// edges ([`MeshError::DegenerateWeight`]) and factorization breakdown
/// ([`MeshError::SingularSystem`]).
///
/// [`MeshError::NonManifoldMesh`]: crate::error::MeshError::NonManifoldMesh
/// [`MeshError::NoBoundaryFound`]: crate::error::MeshError::NoBoundaryFound
/// [`MeshError::InvalidBoundary`]: crate::error::MeshError::InvalidBoundary
/// [`MeshError::DegenerateWeight`]: crate::error::MeshError::DegenerateWeight
/// [`MeshError::SingularSystem`]: crate::error::MeshError::SingularSystem
pub fn harmonic_map(
    vertices: &[[f32; 3]],
    faces: &[[u32; 3]],
    options: &MapOptions,
) -> Result<MappedMesh> {
    let positions: Vec<Point3<f64>> = vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let mesh = build_from_triangles(&positions, faces)?;
    let boundary = trace_boundary(&mesh)?;
    let system = assemble(&mesh, &boundary)?;
    let (x, y) = system.solve()?;

    let (out_positions, out_faces) = to_face_vertex(&mesh);
    let out_vertices: Vec<[f32; 3]> = out_positions
        .iter()
        .map(|p| [p.x as f32, p.y as f32, p.z as f32])
        .collect();

    let uvs = UvMap::new(
        (0..mesh.num_vertices())
            .map(|i| Point2::new(x[i], y[i]))
            .collect(),
    );

    let boundary_segments = options.boundary_segments.then(|| {
        boundary
            .halfedges()
            .iter()
            .map(|&he| {
                let a = uvs.get(mesh.vertex_id(mesh.origin(he)));
                let b = uvs.get(mesh.vertex_id(mesh.dest(he)));
                [a.x, a.y, b.x, b.y]
            })
            .collect()
    });

    Ok(MappedMesh {
        vertices: out_vertices,
        faces: out_faces,
        uvs,
        boundary_segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use std::f64::consts::TAU;

    fn grid(n: usize) -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for j in 0..=n {
            for i in 0..=n {
                vertices.push([i as f32, j as f32, 0.0]);
            }
        }
        for j in 0..n {
            for i in 0..n {
                let v00 = (j * (n + 1) + i) as u32;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1) as u32;
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }

        (vertices, faces)
    }

    fn fan(k: usize) -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
        let mut vertices = vec![[0.0, 0.0, 0.0f32]];
        for i in 0..k {
            let a = TAU * i as f64 / k as f64;
            vertices.push([a.cos() as f32, a.sin() as f32, 0.0]);
        }
        let faces = (0..k)
            .map(|i| [0u32, 1 + i as u32, 1 + ((i + 1) % k) as u32])
            .collect();
        (vertices, faces)
    }

    #[test]
    fn single_triangle() {
        // Equilateral triangle: all boundary, identity system, UVs at
        // equally spaced angles on the unit circle.
        let h = 3.0f32.sqrt() / 2.0;
        let vertices = [[0.0, 0.0, 0.0f32], [1.0, 0.0, 0.0], [0.5, h, 0.0]];
        let faces = [[0u32, 1, 2]];

        let mapped = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();

        assert_eq!(mapped.vertices.len(), 3);
        assert_eq!(mapped.faces, vec![[0, 1, 2]]);
        assert_eq!(mapped.uvs.len(), 3);

        for (_, uv) in mapped.uvs.iter() {
            assert!((uv.coords.norm() - 1.0).abs() < 1e-5);
        }

        // Angles step by 120 degrees around the loop.
        let angles: Vec<f64> = (0..3)
            .map(|i| {
                let uv = mapped.uvs.get(i);
                uv.y.atan2(uv.x).rem_euclid(TAU)
            })
            .collect();
        let step01 = (angles[1] - angles[0]).rem_euclid(TAU);
        let step12 = (angles[2] - angles[1]).rem_euclid(TAU);
        assert!((step01 - TAU / 3.0).abs() < 1e-6);
        assert!((step12 - TAU / 3.0).abs() < 1e-6);
    }

    #[test]
    fn planar_quad() {
        // Two triangles, four boundary vertices, no interior vertex.
        let vertices = [
            [0.0, 0.0, 0.0f32],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let faces = [[0u32, 1, 2], [0, 2, 3]];

        let mapped = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();

        assert_eq!(mapped.vertices.len(), 4);
        for (_, uv) in mapped.uvs.iter() {
            assert!((uv.coords.norm() - 1.0).abs() < 1e-5);
        }

        // Angular spacing is proportional to cumulative boundary length;
        // the boundary of the unit square has four unit-length sides, so
        // consecutive boundary vertices are 90 degrees apart.
        let angles: Vec<f64> = [0, 1, 2, 3]
            .iter()
            .map(|&i| {
                let uv = mapped.uvs.get(i);
                uv.y.atan2(uv.x).rem_euclid(TAU)
            })
            .collect();
        for k in 0..4 {
            let step = (angles[(k + 1) % 4] - angles[k]).rem_euclid(TAU);
            assert!((step - TAU / 4.0).abs() < 1e-6, "step {} was {}", k, step);
        }
    }

    #[test]
    fn fan_interior_vertex() {
        let (vertices, faces) = fan(6);
        let mapped = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();

        assert_eq!(mapped.uvs.len(), 7);

        // The center (id 0: first referenced) lies strictly inside the
        // circle; by symmetry it lands on the origin.
        let center = mapped.uvs.get(0);
        assert!(center.coords.norm() < 1.0);
        assert!(center.coords.norm() < 1e-8);

        // Rim vertices sit on the circle.
        for i in 1..7 {
            assert!((mapped.uvs.get(i).coords.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn non_manifold_is_rejected() {
        // Two triangles share the edge (0, 1) with identical winding.
        let vertices = [
            [0.0, 0.0, 0.0f32],
            [1.0, 0.0, 0.0],
            [0.5, 1.0, 0.0],
            [0.5, -1.0, 0.0],
        ];
        let faces = [[0u32, 1, 2], [0, 1, 3]];

        let result = harmonic_map(&vertices, &faces, &MapOptions::default());
        assert!(matches!(result, Err(MeshError::NonManifoldMesh { .. })));
    }

    #[test]
    fn closed_mesh_is_rejected() {
        let vertices = [
            [0.0, 0.0, 0.0f32],
            [1.0, 0.0, 0.0],
            [0.5, 1.0, 0.0],
            [0.5, 0.5, 1.0],
        ];
        let faces = [[0u32, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

        let result = harmonic_map(&vertices, &faces, &MapOptions::default());
        assert!(matches!(result, Err(MeshError::NoBoundaryFound)));
    }

    #[test]
    fn vertex_conservation() {
        // Input has an unreferenced vertex; output keeps only the distinct
        // referenced ones.
        let vertices = [
            [0.0, 0.0, 0.0f32],
            [99.0, 99.0, 99.0],
            [1.0, 0.0, 0.0],
            [0.5, 1.0, 0.0],
        ];
        let faces = [[0u32, 2, 3]];

        let mapped = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();
        assert_eq!(mapped.vertices.len(), 3);
        assert_eq!(mapped.uvs.len(), 3);
        assert_eq!(mapped.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn boundary_circle_and_maximum_principle() {
        let (vertices, faces) = grid(4);
        let mapped = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();

        // Rebuild the boundary classification from the output arrays.
        let positions: Vec<nalgebra::Point3<f64>> = mapped
            .vertices
            .iter()
            .map(|v| nalgebra::Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
            .collect();
        let mesh = build_from_triangles(&positions, &mapped.faces).unwrap();

        for v in mesh.vertex_ids() {
            let r = mapped.uvs.get(mesh.vertex_id(v)).coords.norm();
            if mesh.is_boundary_vertex(v) {
                assert!((r - 1.0).abs() < 1e-5, "boundary radius {}", r);
            } else {
                // Harmonic interpolation stays inside the convex hull of
                // the boundary, i.e. the unit disk.
                assert!(r <= 1.0 + 1e-9, "interior radius {}", r);
                assert!(r < 1.0, "interior vertex on the circle");
            }
        }
    }

    #[test]
    fn angle_coverage() {
        let (vertices, faces) = grid(3);
        let positions: Vec<nalgebra::Point3<f64>> = vertices
            .iter()
            .map(|v| nalgebra::Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
            .collect();
        let mesh = build_from_triangles(&positions, &faces).unwrap();
        let boundary = trace_boundary(&mesh).unwrap();

        let mapped = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();

        // In loop order the boundary angles increase strictly from 0 and
        // stay below a full turn.
        let mut prev = -1.0;
        for &v in boundary.vertices() {
            let uv = mapped.uvs.get(mesh.vertex_id(v));
            let angle = uv.y.atan2(uv.x).rem_euclid(TAU);
            assert!(angle > prev, "angle {} after {}", angle, prev);
            assert!(angle < TAU);
            prev = angle;
        }
        // The loop starts at angle zero.
        let first = mapped.uvs.get(mesh.vertex_id(boundary.vertices()[0]));
        assert!((first.x - 1.0).abs() < 1e-12 && first.y.abs() < 1e-12);
    }

    #[test]
    fn determinism() {
        let (vertices, faces) = grid(5);
        let a = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();
        let b = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();

        assert_eq!(a.vertices, b.vertices);
        assert_eq!(a.faces, b.faces);
        // Bit-identical, not merely close.
        assert_eq!(a.uvs, b.uvs);
    }

    #[test]
    fn topology_fidelity() {
        let (vertices, faces) = grid(3);
        let mapped = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();

        assert_eq!(mapped.faces.len(), faces.len());

        // Ids are assigned in first-reference order, so the output faces
        // are the input faces under that remapping.
        let mut remap = std::collections::HashMap::new();
        for face in &faces {
            for &v in face {
                let next_id = remap.len() as u32;
                remap.entry(v).or_insert(next_id);
            }
        }
        for (fin, fout) in faces.iter().zip(mapped.faces.iter()) {
            assert_eq!([remap[&fin[0]], remap[&fin[1]], remap[&fin[2]]], *fout);
        }
    }

    #[test]
    fn boundary_segments_output() {
        let (vertices, faces) = grid(2);
        let mapped =
            harmonic_map(&vertices, &faces, &MapOptions::default().with_boundary_segments())
                .unwrap();

        let segments = mapped.boundary_segments.as_ref().unwrap();
        // A 2x2 grid has 8 boundary edges.
        assert_eq!(segments.len(), 8);

        for seg in segments {
            // Both endpoints on the unit circle.
            assert!((seg[0].hypot(seg[1]) - 1.0).abs() < 1e-5);
            assert!((seg[2].hypot(seg[3]) - 1.0).abs() < 1e-5);
        }
        // Segments chain: each ends where the next begins.
        for k in 0..segments.len() {
            let next = &segments[(k + 1) % segments.len()];
            assert!((segments[k][2] - next[0]).abs() < 1e-12);
            assert!((segments[k][3] - next[1]).abs() < 1e-12);
        }

        // Not requested: not emitted.
        let plain = harmonic_map(&vertices, &faces, &MapOptions::default()).unwrap();
        assert!(plain.boundary_segments.is_none());
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        // Collinear triangle flanking an interior edge.
        let vertices = [
            [0.0, 0.0, 0.0f32],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [0.5, -1.0, 0.0],
        ];
        let faces = [[0u32, 1, 2], [1, 0, 3]];

        let result = harmonic_map(&vertices, &faces, &MapOptions::default());
        assert!(matches!(result, Err(MeshError::DegenerateWeight { .. })));
    }

    #[test]
    fn mesh_with_hole_is_rejected() {
        // Square ring with an inner square hole: two boundary loops.
        let vertices = [
            [-2.0, -2.0, 0.0f32],
            [2.0, -2.0, 0.0],
            [2.0, 2.0, 0.0],
            [-2.0, 2.0, 0.0],
            [-1.0, -1.0, 0.0],
            [1.0, -1.0, 0.0],
            [1.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0],
        ];
        let mut faces = Vec::new();
        for k in 0u32..4 {
            let o0 = k;
            let o1 = (k + 1) % 4;
            let i0 = 4 + k;
            let i1 = 4 + (k + 1) % 4;
            faces.push([o0, o1, i1]);
            faces.push([o0, i1, i0]);
        }

        let result = harmonic_map(&vertices, &faces, &MapOptions::default());
        assert!(matches!(result, Err(MeshError::InvalidBoundary { .. })));
    }
}
