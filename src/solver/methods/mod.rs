//! Numerical methods for the bioheat problem
//!
//! Concrete implementations behind the [`Solver`](crate::solver::Solver)
//! trait, plus the transient driver.
//!
//! # Available Methods
//!
//! ## Steady-state solvers
//!
//! - **[`DirectSolver`]**: Crout LU factorization + substitution
//!   - Cost: O(N)
//!   - Use: reference solution, convergence studies
//!
//! - **[`GaussSeidelSolver`]**: Gauss-Seidel sweeps with adaptive SOR
//!   - Cost: O(N) per sweep, O(N²) sweeps for this operator
//!   - Use: method comparison, spectral-radius estimation
//!
//! ## Time stepping
//!
//! - **[`CrankNicolsonDriver`]**: trapezoidal rule marched to steady state
//!   - Order: second order in time and space
//!   - Cost: one factorization, then O(N) per step
//!
//! # Design Philosophy
//!
//! Each method holds only its immutable parameters and can be reused for
//! any number of scenarios, from any thread.

mod crank_nicolson;
mod direct;
mod gauss_seidel;

pub use crank_nicolson::{CrankNicolsonDriver, ImplicitStepper};
pub use direct::DirectSolver;
pub use gauss_seidel::{optimal_relaxation, GaussSeidelSolver};
