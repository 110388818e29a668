//! Sparse matrix storage and direct factorization.
//!
//! This module provides a lightweight CSR matrix built from triplets and a
//! sparse LDLᵀ factorization for symmetric positive definite systems. The
//! factorization is computed once and reused for both right-hand sides of
//! the harmonic system.
//!
//! The factorization is the classic up-looking algorithm: a symbolic pass
//! computes the elimination tree and the exact nonzero counts of L, then the
//! numeric pass fills one column of L per step by traversing the tree in
//! topological order.

use nalgebra::DVector;

use crate::error::{MeshError, Result};

const ABSENT: usize = usize::MAX;

/// Compressed Sparse Row (CSR) matrix.
#[derive(Debug, Clone)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    /// `row_ptr[i]..row_ptr[i + 1]` indexes the entries of row `i`.
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Create a CSR matrix from triplets (row, col, value).
    ///
    /// Duplicate entries at the same (row, col) are summed.
    pub fn from_triplets(rows: usize, cols: usize, mut triplets: Vec<(usize, usize, f64)>) -> Self {
        if triplets.is_empty() {
            return Self {
                rows,
                cols,
                row_ptr: vec![0; rows + 1],
                col_idx: Vec::new(),
                values: Vec::new(),
            };
        }

        triplets.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_idx = Vec::with_capacity(triplets.len());
        let mut values = Vec::with_capacity(triplets.len());

        let mut prev_row = usize::MAX;
        let mut prev_col = usize::MAX;

        for (row, col, val) in triplets {
            if row == prev_row && col == prev_col {
                *values.last_mut().unwrap() += val;
            } else {
                col_idx.push(col);
                values.push(val);
                for r in (prev_row.wrapping_add(1))..=row {
                    row_ptr[r] = col_idx.len() - 1;
                }
                prev_row = row;
                prev_col = col;
            }
        }

        let nnz = col_idx.len();
        for r in (prev_row + 1)..=rows {
            row_ptr[r] = nnz;
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Get the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Get the number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate over the (column, value) entries of one row.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        self.col_idx[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
    }

    /// Multiply matrix by vector: y = A * x.
    pub fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        assert_eq!(x.len(), self.cols, "vector dimension mismatch");

        let mut y = DVector::zeros(self.rows);
        for i in 0..self.rows {
            let mut sum = 0.0;
            for (j, v) in self.row(i) {
                sum += v * x[j];
            }
            y[i] = sum;
        }
        y
    }
}

/// Sparse LDLᵀ factorization of a symmetric positive definite matrix.
///
/// The input matrix must be structurally and numerically symmetric; row `k`
/// of the CSR storage is read as column `k`, and entries below the diagonal
/// are ignored (they mirror the ones above it).
#[derive(Debug, Clone)]
pub struct LdlFactor {
    n: usize,
    /// Column pointers of L (strictly lower triangular, unit diagonal).
    lp: Vec<usize>,
    li: Vec<usize>,
    lx: Vec<f64>,
    /// Diagonal of D.
    d: Vec<f64>,
}

impl LdlFactor {
    /// Factorize `a` as L·D·Lᵀ.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::SingularSystem`] if a pivot comes out zero or
    /// non-finite.
    pub fn new(a: &CsrMatrix) -> Result<Self> {
        assert_eq!(a.nrows(), a.ncols(), "matrix must be square");
        let n = a.nrows();

        // Symbolic pass: elimination tree and column counts of L.
        let mut parent = vec![ABSENT; n];
        let mut flag = vec![ABSENT; n];
        let mut lnz = vec![0usize; n];

        for k in 0..n {
            flag[k] = k;
            for (j, _) in a.row(k) {
                let mut i = j;
                while i < k && flag[i] != k {
                    if parent[i] == ABSENT {
                        parent[i] = k;
                    }
                    lnz[i] += 1;
                    flag[i] = k;
                    i = parent[i];
                }
            }
        }

        let mut lp = vec![0usize; n + 1];
        for k in 0..n {
            lp[k + 1] = lp[k] + lnz[k];
        }

        // Numeric pass.
        flag.fill(ABSENT);
        let mut li = vec![0usize; lp[n]];
        let mut lx = vec![0.0f64; lp[n]];
        let mut d = vec![0.0f64; n];
        let mut y = vec![0.0f64; n];
        let mut pattern = vec![0usize; n];
        let mut filled = vec![0usize; n];

        for k in 0..n {
            // Nonzero pattern of row k of L, in topological order.
            y[k] = 0.0;
            let mut top = n;
            flag[k] = k;
            for (j, v) in a.row(k) {
                if j > k {
                    continue;
                }
                y[j] += v;
                let mut len = 0;
                let mut i = j;
                while flag[i] != k {
                    pattern[len] = i;
                    len += 1;
                    flag[i] = k;
                    i = parent[i];
                }
                while len > 0 {
                    len -= 1;
                    top -= 1;
                    pattern[top] = pattern[len];
                }
            }

            // Sparse triangular solve against the columns computed so far.
            d[k] = y[k];
            y[k] = 0.0;
            for t in top..n {
                let i = pattern[t];
                let yi = y[i];
                y[i] = 0.0;

                let p2 = lp[i] + filled[i];
                for p in lp[i]..p2 {
                    y[li[p]] -= lx[p] * yi;
                }

                let l_ki = yi / d[i];
                d[k] -= l_ki * yi;
                li[p2] = k;
                lx[p2] = l_ki;
                filled[i] += 1;
            }

            if d[k] == 0.0 || !d[k].is_finite() {
                return Err(MeshError::SingularSystem {
                    details: format!("zero pivot at row {k}"),
                });
            }
        }

        Ok(Self { n, lp, li, lx, d })
    }

    /// Solve `A·x = b` using the computed factorization.
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        assert_eq!(b.len(), self.n, "vector dimension mismatch");
        let mut x = b.clone();

        // L·z = b
        for j in 0..self.n {
            let xj = x[j];
            for p in self.lp[j]..self.lp[j + 1] {
                x[self.li[p]] -= self.lx[p] * xj;
            }
        }

        // D·w = z
        for j in 0..self.n {
            x[j] /= self.d[j];
        }

        // Lᵀ·x = w
        for j in (0..self.n).rev() {
            let mut xj = x[j];
            for p in self.lp[j]..self.lp[j + 1] {
                xj -= self.lx[p] * x[self.li[p]];
            }
            x[j] = xj;
        }

        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csr_from_triplets() {
        // [ 4  1 ]
        // [ 1  3 ]
        let triplets = vec![(0, 0, 4.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 3.0)];
        let a = CsrMatrix::from_triplets(2, 2, triplets);

        assert_eq!(a.nrows(), 2);
        assert_eq!(a.ncols(), 2);
        assert_eq!(a.nnz(), 4);
    }

    #[test]
    fn test_csr_duplicates_are_summed() {
        let triplets = vec![
            (0, 0, 2.0),
            (0, 0, 2.0),
            (0, 1, 1.0),
            (1, 0, 1.0),
            (1, 1, 3.0),
        ];
        let a = CsrMatrix::from_triplets(2, 2, triplets);

        let x = DVector::from_vec(vec![1.0, 0.0]);
        let y = a.mul_vec(&x);

        assert!((y[0] - 4.0).abs() < 1e-12);
        assert!((y[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_csr_mul_vec() {
        // [ 4  1 ]   [ 1 ]   [ 5 ]
        // [ 1  3 ] * [ 1 ] = [ 4 ]
        let triplets = vec![(0, 0, 4.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 3.0)];
        let a = CsrMatrix::from_triplets(2, 2, triplets);

        let y = a.mul_vec(&DVector::from_vec(vec![1.0, 1.0]));
        assert!((y[0] - 5.0).abs() < 1e-12);
        assert!((y[1] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_ldl_2x2() {
        // Solution of the 2x2 system above with b = (1, 2): x = 1/11, y = 7/11.
        let triplets = vec![(0, 0, 4.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 3.0)];
        let a = CsrMatrix::from_triplets(2, 2, triplets);

        let factor = LdlFactor::new(&a).unwrap();
        let x = factor.solve(&DVector::from_vec(vec![1.0, 2.0]));

        assert!((x[0] - 1.0 / 11.0).abs() < 1e-12);
        assert!((x[1] - 7.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_ldl_sparse_system() {
        // Symmetric positive definite, diagonally dominant, with a sparse
        // off-diagonal pattern.
        let triplets = vec![
            (0, 0, 10.0),
            (0, 1, 1.0),
            (0, 2, 2.0),
            (1, 0, 1.0),
            (1, 1, 10.0),
            (1, 2, 1.0),
            (2, 0, 2.0),
            (2, 1, 1.0),
            (2, 2, 10.0),
            (2, 3, 1.0),
            (3, 2, 1.0),
            (3, 3, 10.0),
        ];
        let a = CsrMatrix::from_triplets(4, 4, triplets);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);

        let factor = LdlFactor::new(&a).unwrap();
        let x = factor.solve(&b);

        let residual = a.mul_vec(&x) - b;
        assert!(residual.norm() < 1e-10);
    }

    #[test]
    fn test_ldl_factors_once_solves_twice() {
        let triplets = vec![(0, 0, 4.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 3.0)];
        let a = CsrMatrix::from_triplets(2, 2, triplets);

        let factor = LdlFactor::new(&a).unwrap();
        for b in [
            DVector::from_vec(vec![1.0, 2.0]),
            DVector::from_vec(vec![-3.0, 0.5]),
        ] {
            let x = factor.solve(&b);
            let residual = a.mul_vec(&x) - b;
            assert!(residual.norm() < 1e-12);
        }
    }

    #[test]
    fn test_ldl_singular_matrix() {
        // Rank-deficient: second row is a copy of the first.
        let triplets = vec![(0, 0, 1.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 1.0)];
        let a = CsrMatrix::from_triplets(2, 2, triplets);

        let result = LdlFactor::new(&a);
        assert!(matches!(result, Err(MeshError::SingularSystem { .. })));
    }

    #[test]
    fn test_ldl_empty_system() {
        let a = CsrMatrix::from_triplets(0, 0, Vec::new());
        let factor = LdlFactor::new(&a).unwrap();
        let x = factor.solve(&DVector::zeros(0));
        assert_eq!(x.len(), 0);
    }
}
