//! Direct solver: Crout LU + substitution
//!
//! # Characteristics
//!
//! - **Cost**: O(N) factorization, O(N) per right-hand side
//! - **Accuracy**: exact up to rounding when no pivot vanishes
//! - **Stability**: no pivoting; relies on the diagonal dominance enforced
//!   at assembly
//!
//! # Example
//!
//! ```rust
//! use bioheat_rs::solver::{DirectSolver, Scenario, Solver};
//!
//! let scenario = Scenario::tissue(40).unwrap();
//! let solution = DirectSolver::new().solve_scenario(&scenario).unwrap();
//! assert!(solution.diagnostics.residual < 1e-9);
//! ```

use crate::error::SolverResult;
use crate::linalg::{decompose, CroutFactors, TridiagonalMatrix};
use crate::solver::assembly::LinearSystem;
use crate::solver::{SolveDiagnostics, Solver, SteadySolution};

/// Crout LU direct solver
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSolver;

impl DirectSolver {
    /// Create a new direct solver
    pub fn new() -> Self {
        Self
    }

    /// Factorize `matrix` once for repeated solves
    pub fn factorize(&self, matrix: &TridiagonalMatrix) -> SolverResult<CroutFactors> {
        decompose(matrix)
    }
}

impl Solver for DirectSolver {
    fn solve(&self, system: &LinearSystem) -> SolverResult<SteadySolution> {
        let factors = self.factorize(&system.matrix)?;
        let values = factors.solve(&system.rhs)?;
        let residual = system.matrix.residual_norm(&values, &system.rhs)?;

        log::debug!(
            "{}: solved {} unknowns, residual {:e}",
            self.name(),
            system.dim(),
            residual
        );

        Ok(SteadySolution {
            values,
            diagnostics: SolveDiagnostics {
                residual,
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "Crout LU"
    }
}
