//! Tridiagonal linear algebra
//!
//! - [`TridiagonalMatrix`]: banded storage, O(N) products, analytic
//!   diagonal-dominance check
//! - [`crout`]: Crout LU factorization and forward/backward substitution
//!
//! General dense or sparse algebra is deliberately absent; `nalgebra` is used
//! for vector storage and, in tests, as an independent reference solver.

pub mod crout;
pub mod tridiagonal;

pub use crout::{
    backward_substitute, decompose, forward_substitute, solve, CroutFactors, LowerFactor,
    UpperFactor,
};
pub use tridiagonal::TridiagonalMatrix;
