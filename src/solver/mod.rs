//! Numerical solvers
//!
//! This module assembles the discrete bioheat problem and solves it with
//! three interchangeable methods.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Physical parameters (length, λ², source)
//!    - Dirichlet boundary values
//!    - Grid of interior nodes
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Method selection (direct, iterative, time stepping)
//!    - Numerical parameters (tolerance, budgets, time step)
//!
//! 3. **Solver** (`Solver` trait, `CrankNicolsonDriver`) - The numerical method
//!    - Assembles the tridiagonal system
//!    - Returns the solution with its diagnostics
//!
//! # Module Organization
//!
//! - **`traits`**: `Solver` trait, `SolverType`, `SolverConfiguration`,
//!   result records
//! - **`boundary`**: `DirichletBoundaries`
//! - **`scenario`**: `Grid` and `Scenario`
//! - **`assembly`**: steady and Crank-Nicolson system assembly
//! - **`methods`**: `DirectSolver`, `GaussSeidelSolver`, `CrankNicolsonDriver`
//!
//! # Quick Start Example
//!
//! ```rust
//! use bioheat_rs::solver::{steady_solver, Scenario, SolverConfiguration};
//!
//! // 1. WHAT to solve
//! let scenario = Scenario::tissue(40)?;
//!
//! // 2. HOW to solve
//! let config = SolverConfiguration::iterative(1e-10, 100_000);
//!
//! // 3. Solve
//! let solver = steady_solver(&config)?;
//! let solution = solver.solve_scenario(&scenario)?;
//!
//! println!("{} sweeps, mean ρ = {:?}",
//!     solution.diagnostics.iterations,
//!     solution.diagnostics.mean_spectral_radius);
//! # Ok::<(), bioheat_rs::SolverError>(())
//! ```
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌─────────────────────┐   ┌──────────────────────┐
//! │ BioheatParameters   │   │ DirichletBoundaries  │
//! └──────────┬──────────┘   └──────────┬───────────┘
//!            └────────────┬────────────┘
//!                ┌────────▼────────┐
//!                │ Scenario (+Grid)│ ← WHAT to solve
//!                └────────┬────────┘
//!                         │ assemble
//!                ┌────────▼────────┐
//!                │ LinearSystem /  │
//!                │ TransientSystem │
//!                └────────┬────────┘
//!                         │ SolverConfiguration ← HOW to solve
//!         ┌───────────────┼────────────────┐
//!  ┌──────▼─────┐  ┌──────▼───────┐  ┌─────▼──────────┐
//!  │ Crout LU   │  │ Gauss-Seidel │  │ Crank-Nicolson │
//!  └──────┬─────┘  └──────┬───────┘  └─────┬──────────┘
//!         └───────────────┼────────────────┘
//!                ┌────────▼──────────────────┐
//!                │ SteadySolution /          │
//!                │ SimulationResult          │
//!                └───────────────────────────┘
//! ```
//!
//! # Error Handling
//!
//! Every operation returns [`SolverResult`](crate::error::SolverResult).
//! Failures are one of three kinds:
//!
//! - Invalid configuration (bad length, zero nodes, negative time step)
//! - Singular system (a Crout pivot vanishes)
//! - Non-convergence (iteration or step budget exhausted, divergence)

// =================================================================================================
// Module Declarations
// =================================================================================================
mod traits;
mod boundary;
mod scenario;
mod methods;
pub mod assembly;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{
    Relaxation,
    SimulationResult,
    SolveDiagnostics,
    Solver,
    SolverConfiguration,
    SolverType,
    SteadySolution,
    Trajectory,
    DEFAULT_MAX_ITERATIONS,
    DEFAULT_MAX_STEPS,
    DEFAULT_TIME_STEP,
    DEFAULT_TOLERANCE,
};

pub use boundary::DirichletBoundaries;
pub use scenario::{Grid, Scenario};

pub use assembly::{
    assemble, assemble_steady, assemble_transient, AssembledSystem, AssemblyMode,
    ExplicitStencil, LinearSystem, TransientSystem,
};

pub use methods::{
    optimal_relaxation, CrankNicolsonDriver, DirectSolver, GaussSeidelSolver, ImplicitStepper,
};

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::error::{SolverError, SolverResult};

/// Steady-state solver selected by `config`
///
/// # Errors
///
/// `InvalidConfiguration` if `config` is invalid or selects time stepping,
/// which has no steady [`Solver`] implementation.
pub fn steady_solver(config: &SolverConfiguration) -> SolverResult<Box<dyn Solver>> {
    config.validate()?;
    match config.solver_type {
        SolverType::Direct => Ok(Box::new(DirectSolver::new())),
        SolverType::Iterative { .. } => Ok(Box::new(GaussSeidelSolver::from_configuration(config)?)),
        SolverType::TimeStepping { .. } => Err(SolverError::invalid(
            "Time stepping is run through CrankNicolsonDriver, not a steady solver",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_steady_solver_selection() {
        let direct = steady_solver(&SolverConfiguration::direct()).unwrap();
        assert_eq!(direct.name(), "Crout LU");

        let iterative = steady_solver(&SolverConfiguration::iterative(1e-10, 1000)).unwrap();
        assert_eq!(iterative.name(), "Gauss-Seidel (adaptive SOR)");

        let plain = steady_solver(&SolverConfiguration::iterative_with(
            1e-10,
            1000,
            Relaxation::Fixed(1.0),
        ))
        .unwrap();
        assert_eq!(plain.name(), "Gauss-Seidel");
    }

    #[test]
    fn test_steady_solver_rejects_time_stepping() {
        let err = steady_solver(&SolverConfiguration::time_stepping(1e-3, 1e-10, 10))
            .err()
            .unwrap();
        assert_eq!(err.kind(), FailureKind::InvalidConfiguration);
    }

    #[test]
    fn test_steady_solver_rejects_invalid_configuration() {
        assert!(steady_solver(&SolverConfiguration::iterative(-1.0, 10)).is_err());
    }
}
