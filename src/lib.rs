//! bioheat-rs: tridiagonal solvers for the 1D bioheat equation
//!
//! Solves the steady boundary-value problem
//!
//! ```text
//! u'' - λ² u + S(x) = 0   on (0, L),   u(0) = δ₀,  u(L) = δ_L
//! ```
//!
//! and its transient counterpart ∂u/∂t = u'' - λ²u + S(x), where u is the
//! tissue temperature relative to arterial blood.
//!
//! # Architecture
//!
//! 1. **Separation of physics and numerics**
//!    - [`physics`]: parameters, source term, closed-form reference profile
//!    - [`solver`]: scenario, assembly, the three numerical methods
//!
//! 2. **Tridiagonal algebra**
//!    - [`linalg`]: banded matrix storage and Crout LU factorization
//!
//! 3. **Batch runs**
//!    - [`study`]: one configuration over many grid sizes, failures kept
//!      per configuration
//!    - [`output`]: CSV export of profiles, trajectories and study reports
//!
//! # Quick Start
//!
//! ```rust
//! use bioheat_rs::prelude::*;
//!
//! # fn main() -> Result<(), SolverError> {
//! // 1. Problem: tissue parameters, 37 °C core, 32 °C skin, 37 °C artery
//! let scenario = Scenario::tissue(40)?;
//!
//! // 2. Direct solve
//! let direct = DirectSolver::new().solve_scenario(&scenario)?;
//!
//! // 3. Same problem with adaptive SOR
//! let sor = steady_solver(&SolverConfiguration::iterative(1e-12, 100_000))?;
//! let iterative = sor.solve_scenario(&scenario)?;
//!
//! assert!((&direct.values - &iterative.values).amax() < 1e-8);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `parallel`: solve the grid sizes of a [`study::GridStudy`] concurrently
//!   with Rayon
//!
//! # Logging
//!
//! The crate logs through the `log` facade: convergence summaries at
//! `debug`, study progress at `info`, failures at `warn`. Install any
//! logger (e.g. `env_logger`) to see them.

pub mod error;
pub mod linalg;
pub mod physics;
pub mod solver;
pub mod study;
pub mod output;

pub use error::{FailureKind, SolverError, SolverResult};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use bioheat_rs::prelude::*;
    //! ```
    pub use crate::error::{FailureKind, SolverError, SolverResult};
    pub use crate::physics::{BioheatParameters, SourceTerm};
    pub use crate::solver::{
        steady_solver, CrankNicolsonDriver, DirectSolver, DirichletBoundaries, GaussSeidelSolver,
        Relaxation, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType,
        SteadySolution,
    };
    pub use crate::study::{GridStudy, StudyReport};
}
