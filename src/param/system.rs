//! Harmonic system assembly and solution.
//!
//! Builds the sparse N×N coefficient matrix `W` and the two right-hand-side
//! vectors of the harmonic map, one per UV channel:
//!
//! - a boundary vertex row is the identity row, with its right-hand side set
//!   to the vertex's position on the unit circle (angle proportional to its
//!   cumulative boundary arc length);
//! - an interior vertex row accumulates the harmonic weight of each incident
//!   interior edge off-diagonal and subtracts it on the diagonal, with a
//!   zero right-hand side.
//!
//! Interior rows therefore sum to zero, which is the defining property of
//! the discrete Laplace equation; the boundary rows are its Dirichlet
//! conditions.

use std::f64::consts::TAU;

use nalgebra::DVector;

use crate::error::{MeshError, Result};
use crate::mesh::HalfEdgeMesh;

use super::boundary::BoundaryLoop;
use super::sparse::{CsrMatrix, LdlFactor};
use super::weight::harmonic_weight;

/// The assembled linear system of one harmonic mapping call.
#[derive(Debug, Clone)]
pub struct HarmonicSystem {
    matrix: CsrMatrix,
    bx: DVector<f64>,
    by: DVector<f64>,
    is_boundary: Vec<bool>,
}

/// Assemble the harmonic system for a mesh and its traced boundary loop.
///
/// # Errors
///
/// - [`MeshError::DegenerateWeight`] if an interior edge weight is
///   non-finite.
/// - [`MeshError::SingularSystem`] if the boundary loop has zero or
///   non-finite total length (the circle reparameterization is undefined).
pub fn assemble(mesh: &HalfEdgeMesh, boundary: &BoundaryLoop) -> Result<HarmonicSystem> {
    let n = mesh.num_vertices();

    let total = boundary.total_length();
    if !(total.is_finite() && total > 0.0) {
        return Err(MeshError::SingularSystem {
            details: format!("boundary loop has unusable total length {total}"),
        });
    }

    let mut is_boundary = vec![false; n];
    for &v in boundary.vertices() {
        is_boundary[mesh.vertex_id(v)] = true;
    }

    // Dirichlet data: boundary vertices pinned to the unit circle at angles
    // proportional to cumulative arc length.
    let mut bx = DVector::zeros(n);
    let mut by = DVector::zeros(n);
    for (k, &v) in boundary.vertices().iter().enumerate() {
        let theta = TAU * boundary.cumulative_lengths()[k] / total;
        let id = mesh.vertex_id(v);
        bx[id] = theta.cos();
        by[id] = theta.sin();
    }

    // Laplacian rows. Boundary edges contribute nothing: their endpoints are
    // fixed by their own identity rows.
    let mut triplets: Vec<(usize, usize, f64)> = Vec::new();
    let mut diag = vec![0.0f64; n];

    for e in mesh.edge_ids() {
        if mesh.is_boundary_edge(e) {
            continue;
        }

        let (v0, v1) = mesh.edge_endpoints(e);
        let i0 = mesh.vertex_id(v0);
        let i1 = mesh.vertex_id(v1);

        let weight = harmonic_weight(mesh, e)?;

        // Off-diagonals only land in interior rows; a boundary row must stay
        // the identity row.
        if !is_boundary[i0] {
            triplets.push((i0, i1, weight));
        }
        if !is_boundary[i1] {
            triplets.push((i1, i0, weight));
        }
        diag[i0] -= weight;
        diag[i1] -= weight;
    }

    for (i, &d) in diag.iter().enumerate() {
        if is_boundary[i] {
            triplets.push((i, i, 1.0));
        } else {
            triplets.push((i, i, d));
        }
    }

    let matrix = CsrMatrix::from_triplets(n, n, triplets);

    Ok(HarmonicSystem {
        matrix,
        bx,
        by,
        is_boundary,
    })
}

impl HarmonicSystem {
    /// The coefficient matrix `W`.
    pub fn matrix(&self) -> &CsrMatrix {
        &self.matrix
    }

    /// The right-hand side of the U channel.
    pub fn bx(&self) -> &DVector<f64> {
        &self.bx
    }

    /// The right-hand side of the V channel.
    pub fn by(&self) -> &DVector<f64> {
        &self.by
    }

    /// Whether row `i` is a boundary (identity) row.
    pub fn is_boundary_row(&self, i: usize) -> bool {
        self.is_boundary[i]
    }

    /// Solve `W·x = bx` and `W·y = by` with one factorization.
    ///
    /// Boundary rows are identity rows, so their unknowns equal their
    /// right-hand sides exactly; eliminating them leaves the symmetric
    /// positive definite interior subsystem, which is factorized once
    /// (sparse LDLᵀ) and back-substituted for both channels.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::SingularSystem`] if the factorization breaks
    /// down (e.g. an interior vertex with no interior edges at all).
    pub fn solve(&self) -> Result<(DVector<f64>, DVector<f64>)> {
        let n = self.matrix.nrows();

        // Dense index -> interior index.
        let mut interior_of = vec![usize::MAX; n];
        let mut interior = Vec::new();
        for i in 0..n {
            if !self.is_boundary[i] {
                interior_of[i] = interior.len();
                interior.push(i);
            }
        }
        let m = interior.len();

        let mut x = self.bx.clone();
        let mut y = self.by.clone();
        if m == 0 {
            // All vertices on the boundary: the system is the identity.
            return Ok((x, y));
        }

        // Reduced system, negated so the interior Laplacian becomes positive
        // definite: sum_j(-W[i,j])·x_j = sum_{j on boundary} W[i,j]·bx_j.
        let mut triplets = Vec::new();
        let mut rx = DVector::zeros(m);
        let mut ry = DVector::zeros(m);

        for (ri, &i) in interior.iter().enumerate() {
            for (j, w) in self.matrix.row(i) {
                if self.is_boundary[j] {
                    rx[ri] += w * self.bx[j];
                    ry[ri] += w * self.by[j];
                } else {
                    triplets.push((ri, interior_of[j], -w));
                }
            }
        }

        let reduced = CsrMatrix::from_triplets(m, m, triplets);
        let factor = LdlFactor::new(&reduced)?;
        let sx = factor.solve(&rx);
        let sy = factor.solve(&ry);

        for (ri, &i) in interior.iter().enumerate() {
            x[i] = sx[ri];
            y[i] = sy[ri];
        }

        Ok((x, y))
    }
}
