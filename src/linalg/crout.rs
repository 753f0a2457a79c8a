//! Crout LU factorization of tridiagonal matrices
//!
//! # Mathematical Background
//!
//! Crout's convention factors A = L·U with a **unit diagonal on U**. For a
//! tridiagonal A both factors are bidiagonal:
//!
//! ```text
//! L = ┌ l0          ┐     U = ┌ 1 u0        ┐
//!     │ a0 l1       │         │   1  u1     │
//!     │    a1 l2    │         │      1  ⋱   │
//!     └       ⋱  ⋱  ┘         └          1  ┘
//! ```
//!
//! Row by row, the general Crout recurrences
//!
//! ```text
//! L[i,i]   = A[i,i]   - Σ_k L[i,k] U[k,i]
//! U[i,i+1] = (A[i,i+1] - Σ_k L[i,k] U[k,i+1]) / L[i,i]
//! ```
//!
//! keep a single non-zero term in the first sum (`k = i - 1`) and none in the
//! second, so the whole factorization is O(N). The sub-diagonal of L is a
//! copy of A's.
//!
//! # Pivots
//!
//! No pivoting is performed. A diagonal entry of L with magnitude at most
//! `ε_machine · ‖A‖∞` aborts the factorization with `SingularSystem`.

use crate::error::{SolverError, SolverResult};
use crate::linalg::tridiagonal::TridiagonalMatrix;
use nalgebra::DVector;

/// Smallest acceptable pivot magnitude for a matrix of infinity norm `scale`
pub fn pivot_threshold(scale: f64) -> f64 {
    f64::EPSILON * scale
}

fn check_pivot(row: usize, pivot: f64, threshold: f64) -> SolverResult<()> {
    if !pivot.is_finite() || pivot.abs() <= threshold {
        return Err(SolverError::SingularSystem {
            row,
            pivot,
            threshold,
        });
    }
    Ok(())
}

// =================================================================================================
// Factors
// =================================================================================================

/// Lower bidiagonal factor: general diagonal, sub-diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct LowerFactor {
    diag: DVector<f64>,
    sub: DVector<f64>,
    threshold: f64,
}

impl LowerFactor {
    /// Build a lower factor directly
    ///
    /// The pivot threshold is derived from the factor's own infinity norm.
    pub fn new(diag: DVector<f64>, sub: DVector<f64>) -> SolverResult<Self> {
        let n = diag.len();
        if n == 0 || sub.len() != n - 1 {
            return Err(SolverError::invalid(format!(
                "Lower factor needs a non-empty diagonal and a sub-diagonal of length n - 1 \
                 (got {} and {})",
                n,
                sub.len()
            )));
        }
        let scale = (0..n)
            .map(|i| diag[i].abs() + if i > 0 { sub[i - 1].abs() } else { 0.0 })
            .fold(0.0, f64::max);
        Ok(Self {
            diag,
            sub,
            threshold: pivot_threshold(scale),
        })
    }

    pub fn dim(&self) -> usize {
        self.diag.len()
    }

    /// Diagonal entries L[i, i]
    pub fn diag(&self) -> &DVector<f64> {
        &self.diag
    }

    /// Sub-diagonal entries L[i + 1, i]
    pub fn sub(&self) -> &DVector<f64> {
        &self.sub
    }
}

/// Upper bidiagonal factor: unit diagonal, super-diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct UpperFactor {
    diag: DVector<f64>,
    sup: DVector<f64>,
}

impl UpperFactor {
    /// Build an upper factor directly
    pub fn new(diag: DVector<f64>, sup: DVector<f64>) -> SolverResult<Self> {
        let n = diag.len();
        if n == 0 || sup.len() != n - 1 {
            return Err(SolverError::invalid(format!(
                "Upper factor needs a non-empty diagonal and a super-diagonal of length n - 1 \
                 (got {} and {})",
                n,
                sup.len()
            )));
        }
        Ok(Self { diag, sup })
    }

    pub fn dim(&self) -> usize {
        self.diag.len()
    }

    /// Diagonal entries U[i, i], all ones when produced by [`decompose`]
    pub fn diag(&self) -> &DVector<f64> {
        &self.diag
    }

    /// Super-diagonal entries U[i, i + 1]
    pub fn sup(&self) -> &DVector<f64> {
        &self.sup
    }
}

/// Crout factors of a tridiagonal matrix, A = L·U
///
/// Immutable once created; the time-stepping driver shares one instance
/// across every step.
#[derive(Debug, Clone, PartialEq)]
pub struct CroutFactors {
    lower: LowerFactor,
    upper: UpperFactor,
}

impl CroutFactors {
    pub fn lower(&self) -> &LowerFactor {
        &self.lower
    }

    pub fn upper(&self) -> &UpperFactor {
        &self.upper
    }

    pub fn dim(&self) -> usize {
        self.lower.dim()
    }

    /// Solve A·x = b with the stored factors (no refactorization)
    pub fn solve(&self, b: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let y = forward_substitute(&self.lower, b)?;
        backward_substitute(&self.upper, &y)
    }
}

// =================================================================================================
// Operations
// =================================================================================================

/// Crout decomposition A = L·U in a single O(N) pass
///
/// # Errors
///
/// `SingularSystem` when a pivot `L[i,i]` is zero, non-finite or smaller in
/// magnitude than `ε_machine · ‖A‖∞`.
pub fn decompose(a: &TridiagonalMatrix) -> SolverResult<CroutFactors> {
    let n = a.dim();
    let threshold = pivot_threshold(a.norm_inf());

    let mut l_diag = DVector::zeros(n);
    let l_sub = a.sub().clone();
    let mut u_sup = DVector::zeros(n.saturating_sub(1));

    for i in 0..n {
        // L[i,:] · U[:,i] reduces to L[i,i-1] · U[i-1,i]
        let correction = if i > 0 { l_sub[i - 1] * u_sup[i - 1] } else { 0.0 };
        l_diag[i] = a.diag()[i] - correction;
        check_pivot(i, l_diag[i], threshold)?;

        if i + 1 < n {
            // L[i,:] · U[:,i+1] has no non-zero term yet
            u_sup[i] = a.sup()[i] / l_diag[i];
        }
    }

    log::trace!("Crout factorization of {n}x{n} system complete");

    Ok(CroutFactors {
        lower: LowerFactor {
            diag: l_diag,
            sub: l_sub,
            threshold,
        },
        upper: UpperFactor {
            diag: DVector::from_element(n, 1.0),
            sup: u_sup,
        },
    })
}

/// Solve L·u = r top to bottom
///
/// `u[i] = (r[i] - L[i,i-1] · u[i-1]) / L[i,i]`
pub fn forward_substitute(l: &LowerFactor, r: &DVector<f64>) -> SolverResult<DVector<f64>> {
    let n = l.dim();
    if r.len() != n {
        return Err(SolverError::invalid(format!(
            "Right-hand side length {} does not match factor dimension {}",
            r.len(),
            n
        )));
    }

    let mut u = DVector::zeros(n);
    for i in 0..n {
        check_pivot(i, l.diag[i], l.threshold)?;
        let known = if i > 0 { l.sub[i - 1] * u[i - 1] } else { 0.0 };
        u[i] = (r[i] - known) / l.diag[i];
    }
    Ok(u)
}

/// Solve U·u = r bottom to top
///
/// `u[i] = (r[i] - U[i,i+1] · u[i+1]) / U[i,i]`; the division is kept even
/// though Crout factors have a unit diagonal.
pub fn backward_substitute(upper: &UpperFactor, r: &DVector<f64>) -> SolverResult<DVector<f64>> {
    let n = upper.dim();
    if r.len() != n {
        return Err(SolverError::invalid(format!(
            "Right-hand side length {} does not match factor dimension {}",
            r.len(),
            n
        )));
    }

    let mut u = DVector::zeros(n);
    for i in (0..n).rev() {
        check_pivot(i, upper.diag[i], 0.0)?;
        let known = if i + 1 < n { upper.sup[i] * u[i + 1] } else { 0.0 };
        u[i] = (r[i] - known) / upper.diag[i];
    }
    Ok(u)
}

/// Factor and solve A·x = b
pub fn solve(a: &TridiagonalMatrix, b: &DVector<f64>) -> SolverResult<DVector<f64>> {
    decompose(a)?.solve(b)
}
