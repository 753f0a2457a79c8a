//! Banded storage for tridiagonal matrices
//!
//! Only the three non-zero diagonals are stored:
//!
//! ```text
//! ┌ d0 u0                ┐
//! │ l0 d1 u1             │
//! │    l1 d2 u2          │
//! │       ⋱  ⋱  ⋱        │
//! └          l(n-2) d(n-1)┘
//! ```
//!
//! `sub` and `sup` have length `n - 1`; for `n = 1` they are empty.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// N×N matrix with non-zero entries on the main diagonal and its two neighbours
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalMatrix {
    sub: DVector<f64>,
    diag: DVector<f64>,
    sup: DVector<f64>,
}

impl TridiagonalMatrix {
    /// Create a matrix from its three diagonals
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when the main diagonal is empty or the
    /// off-diagonals do not have length `n - 1`.
    pub fn new(sub: DVector<f64>, diag: DVector<f64>, sup: DVector<f64>) -> SolverResult<Self> {
        let n = diag.len();
        if n == 0 {
            return Err(SolverError::invalid("Tridiagonal matrix must be at least 1x1"));
        }
        if sub.len() != n - 1 || sup.len() != n - 1 {
            return Err(SolverError::invalid(format!(
                "Off-diagonals must have length {} (got sub {}, sup {})",
                n - 1,
                sub.len(),
                sup.len()
            )));
        }
        Ok(Self { sub, diag, sup })
    }

    /// Create a Toeplitz tridiagonal matrix with constant diagonals
    pub fn constant(n: usize, sub: f64, diag: f64, sup: f64) -> SolverResult<Self> {
        if n == 0 {
            return Err(SolverError::invalid("Tridiagonal matrix must be at least 1x1"));
        }
        Self::new(
            DVector::from_element(n - 1, sub),
            DVector::from_element(n, diag),
            DVector::from_element(n - 1, sup),
        )
    }

    /// Matrix dimension N
    pub fn dim(&self) -> usize {
        self.diag.len()
    }

    /// Sub-diagonal, `sub[i] = A[i + 1, i]`
    pub fn sub(&self) -> &DVector<f64> {
        &self.sub
    }

    /// Main diagonal, `diag[i] = A[i, i]`
    pub fn diag(&self) -> &DVector<f64> {
        &self.diag
    }

    /// Super-diagonal, `sup[i] = A[i, i + 1]`
    pub fn sup(&self) -> &DVector<f64> {
        &self.sup
    }

    /// Entry A[i, j], zero outside the band
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            self.diag[i]
        } else if i == j + 1 {
            self.sub[j]
        } else if j == i + 1 {
            self.sup[i]
        } else {
            0.0
        }
    }

    /// Off-diagonal entries of row `i` as (left, right), zero past the edges
    pub(crate) fn neighbours(&self, i: usize) -> (f64, f64) {
        let n = self.dim();
        let left = if i > 0 { self.sub[i - 1] } else { 0.0 };
        let right = if i + 1 < n { self.sup[i] } else { 0.0 };
        (left, right)
    }

    /// Matrix-vector product A·x in O(N)
    pub fn mul_vector(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let n = self.dim();
        if x.len() != n {
            return Err(SolverError::invalid(format!(
                "Vector length {} does not match matrix dimension {}",
                x.len(),
                n
            )));
        }
        Ok(DVector::from_fn(n, |i, _| {
            let (left, right) = self.neighbours(i);
            let mut value = self.diag[i] * x[i];
            if i > 0 {
                value += left * x[i - 1];
            }
            if i + 1 < n {
                value += right * x[i + 1];
            }
            value
        }))
    }

    /// Infinity norm of the residual A·x - b
    pub fn residual_norm(&self, x: &DVector<f64>, b: &DVector<f64>) -> SolverResult<f64> {
        if b.len() != self.dim() {
            return Err(SolverError::invalid(format!(
                "Right-hand side length {} does not match matrix dimension {}",
                b.len(),
                self.dim()
            )));
        }
        Ok((self.mul_vector(x)? - b).amax())
    }

    /// Induced infinity norm (maximum absolute row sum)
    pub fn norm_inf(&self) -> f64 {
        (0..self.dim())
            .map(|i| {
                let (left, right) = self.neighbours(i);
                self.diag[i].abs() + left.abs() + right.abs()
            })
            .fold(0.0, f64::max)
    }

    /// Analytic diagonal-dominance check on the coefficients
    ///
    /// Every row must satisfy `|d_i| >= |l_i| + |u_i|` and at least one row
    /// strictly. For tridiagonal matrices with non-zero off-diagonals this is
    /// irreducible diagonal dominance, which guarantees non-zero Crout pivots
    /// and Gauss-Seidel convergence.
    pub fn check_diagonal_dominance(&self) -> SolverResult<()> {
        let mut strict = false;
        for i in 0..self.dim() {
            let (left, right) = self.neighbours(i);
            let off = left.abs() + right.abs();
            let d = self.diag[i].abs();
            if !d.is_finite() || !off.is_finite() {
                return Err(SolverError::invalid(format!(
                    "Non-finite coefficient in row {}",
                    i
                )));
            }
            if d < off {
                return Err(SolverError::invalid(format!(
                    "Matrix is not diagonally dominant at row {}: |{}| < {}",
                    i, self.diag[i], off
                )));
            }
            if d > off {
                strict = true;
            }
        }
        if !strict {
            return Err(SolverError::invalid(
                "Matrix is only weakly diagonally dominant on every row",
            ));
        }
        Ok(())
    }

    /// Dense copy, for cross-checks against general-purpose solvers
    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.dim();
        DMatrix::from_fn(n, n, |i, j| self.get(i, j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use approx::assert_relative_eq;

    fn laplacian(n: usize) -> TridiagonalMatrix {
        TridiagonalMatrix::constant(n, -1.0, 2.0, -1.0).unwrap()
    }

    #[test]
    fn test_shape_validation() {
        let err = TridiagonalMatrix::new(
            DVector::from_vec(vec![1.0]),
            DVector::from_vec(vec![2.0, 2.0, 2.0]),
            DVector::from_vec(vec![1.0, 1.0]),
        )
        .unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidConfiguration);

        assert!(TridiagonalMatrix::constant(0, 1.0, 2.0, 1.0).is_err());
    }

    #[test]
    fn test_single_entry_matrix() {
        let a = TridiagonalMatrix::constant(1, 1.0, -3.0, 1.0).unwrap();
        assert_eq!(a.dim(), 1);
        assert_eq!(a.sub().len(), 0);
        assert_eq!(a.get(0, 0), -3.0);
        assert!(a.check_diagonal_dominance().is_ok());
    }

    #[test]
    fn test_get_outside_band_is_zero() {
        let a = laplacian(4);
        assert_eq!(a.get(0, 0), 2.0);
        assert_eq!(a.get(1, 0), -1.0);
        assert_eq!(a.get(0, 1), -1.0);
        assert_eq!(a.get(0, 3), 0.0);
        assert_eq!(a.get(3, 1), 0.0);
    }

    #[test]
    fn test_mul_vector_matches_dense() {
        let a = TridiagonalMatrix::new(
            DVector::from_vec(vec![1.0, -2.0, 0.5]),
            DVector::from_vec(vec![4.0, 5.0, 6.0, 7.0]),
            DVector::from_vec(vec![-1.0, 3.0, 2.0]),
        )
        .unwrap();
        let x = DVector::from_vec(vec![1.0, -1.0, 2.0, 0.5]);

        let banded = a.mul_vector(&x).unwrap();
        let dense = a.to_dense() * &x;
        for i in 0..4 {
            assert_relative_eq!(banded[i], dense[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_mul_vector_dimension_mismatch() {
        let a = laplacian(3);
        assert!(a.mul_vector(&DVector::zeros(4)).is_err());
    }

    #[test]
    fn test_norm_inf() {
        assert_relative_eq!(laplacian(5).norm_inf(), 4.0);
        let a = TridiagonalMatrix::constant(1, 0.0, -7.0, 0.0).unwrap();
        assert_relative_eq!(a.norm_inf(), 7.0);
    }

    #[test]
    fn test_diagonal_dominance() {
        // weak in the interior, strict on the first and last rows
        assert!(laplacian(6).check_diagonal_dominance().is_ok());

        let weak_everywhere = TridiagonalMatrix::new(
            DVector::from_vec(vec![1.0]),
            DVector::from_vec(vec![1.0, 1.0]),
            DVector::from_vec(vec![1.0]),
        )
        .unwrap();
        assert!(weak_everywhere.check_diagonal_dominance().is_err());

        let failing = TridiagonalMatrix::constant(4, 1.0, 1.5, 1.0).unwrap();
        let err = failing.check_diagonal_dominance().unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_residual_norm() {
        let a = laplacian(3);
        let x = DVector::from_vec(vec![1.0, 1.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 0.0, 1.0]);
        assert_relative_eq!(a.residual_norm(&x, &b).unwrap(), 0.0);
    }
}
