//! Finite-difference assembly of the tridiagonal systems
//!
//! # Steady state
//!
//! Second-order central differences on the interior nodes of
//! `u'' - λ² u + S = 0`, multiplied through by h²:
//!
//! ```text
//! u[i-1] - (2 + λ²h²) u[i] + u[i+1] = -h² S(x_i)
//! ```
//!
//! The boundary values move to the right-hand side of the first and last
//! rows.
//!
//! # Transient (Crank-Nicolson)
//!
//! With k = dt/h² and l = ½ λ² dt, averaging the spatial operator over two
//! time levels gives
//!
//! ```text
//! -k/2 u'[i-1] + (1 + k + l) u'[i] - k/2 u'[i+1]
//!     =  k/2 u[i-1] + (1 - k - l) u[i] + k/2 u[i+1]  +  dt S(x_i)  (+ k·δ at the ends)
//! ```
//!
//! The implicit matrix on the left is constant for fixed (N, dt). The right
//! side is the explicit stencil applied to the current state plus a constant
//! forcing vector.

use crate::error::{SolverError, SolverResult};
use crate::linalg::TridiagonalMatrix;
use crate::solver::scenario::Scenario;
use nalgebra::DVector;

// =================================================================================================
// Assembled systems
// =================================================================================================

/// Steady-state system A·u = b
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    pub matrix: TridiagonalMatrix,
    pub rhs: DVector<f64>,
}

impl LinearSystem {
    /// Pair a matrix with a right-hand side of matching length
    pub fn new(matrix: TridiagonalMatrix, rhs: DVector<f64>) -> SolverResult<Self> {
        if rhs.len() != matrix.dim() {
            return Err(SolverError::invalid(format!(
                "Right-hand side length {} does not match matrix dimension {}",
                rhs.len(),
                matrix.dim()
            )));
        }
        Ok(Self { matrix, rhs })
    }

    pub fn dim(&self) -> usize {
        self.matrix.dim()
    }
}

/// Symmetric three-point stencil of the explicit half of the scheme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplicitStencil {
    /// Weight of u[i-1] and u[i+1]
    pub neighbour: f64,

    /// Weight of u[i]
    pub centre: f64,
}

impl ExplicitStencil {
    /// Apply the stencil to `state`, treating values past the edges as zero
    ///
    /// Boundary contributions are carried by the forcing vector instead.
    pub fn apply(&self, state: &DVector<f64>) -> DVector<f64> {
        let n = state.len();
        DVector::from_fn(n, |i, _| {
            let mut value = self.centre * state[i];
            if i > 0 {
                value += self.neighbour * state[i - 1];
            }
            if i + 1 < n {
                value += self.neighbour * state[i + 1];
            }
            value
        })
    }
}

/// Crank-Nicolson system for one (N, dt) pair
#[derive(Debug, Clone, PartialEq)]
pub struct TransientSystem {
    /// Left-hand matrix, factorized once by the driver
    pub implicit: TridiagonalMatrix,

    /// Right-hand operator applied to the current state each step
    pub explicit: ExplicitStencil,

    /// Source and boundary contribution, identical for every step
    pub forcing: DVector<f64>,

    pub time_step: f64,
}

impl TransientSystem {
    /// Right-hand side of one step from the current state
    pub fn step_rhs(&self, state: &DVector<f64>) -> DVector<f64> {
        self.explicit.apply(state) + &self.forcing
    }
}

// =================================================================================================
// Assembly
// =================================================================================================

/// Which system to build
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssemblyMode {
    /// Elliptic boundary-value problem
    Steady,

    /// One implicit step of size `time_step`
    Transient { time_step: f64 },
}

/// Output of [`assemble`], matching the requested mode
#[derive(Debug, Clone, PartialEq)]
pub enum AssembledSystem {
    Steady(LinearSystem),
    Transient(TransientSystem),
}

/// Build the system selected by `mode`
pub fn assemble(scenario: &Scenario, mode: AssemblyMode) -> SolverResult<AssembledSystem> {
    match mode {
        AssemblyMode::Steady => assemble_steady(scenario).map(AssembledSystem::Steady),
        AssemblyMode::Transient { time_step } => {
            assemble_transient(scenario, time_step).map(AssembledSystem::Transient)
        }
    }
}

fn check_step(h: f64) -> SolverResult<()> {
    if !(h.is_finite() && h > 0.0) {
        return Err(SolverError::invalid(format!(
            "Step size must be positive and finite, got {}",
            h
        )));
    }
    Ok(())
}

/// Source evaluated at every interior node, scaled by `factor`
fn source_vector(scenario: &Scenario, factor: f64) -> DVector<f64> {
    let grid = &scenario.grid;
    let source = scenario.parameters.source();
    DVector::from_fn(grid.interior_nodes(), |i, _| {
        factor * source.evaluate(grid.position(i), grid.length())
    })
}

/// Assemble the steady-state system
///
/// # Errors
///
/// `InvalidConfiguration` for a degenerate step or when λ²h² makes the
/// matrix lose diagonal dominance (λ² < 0).
pub fn assemble_steady(scenario: &Scenario) -> SolverResult<LinearSystem> {
    let n = scenario.size();
    let h = scenario.step();
    check_step(h)?;

    let decay = scenario.parameters.decay();
    let matrix = TridiagonalMatrix::constant(n, 1.0, -(2.0 + decay * h * h), 1.0)?;
    matrix.check_diagonal_dominance()?;

    let mut rhs = if scenario.parameters.source().is_active() {
        -source_vector(scenario, h * h)
    } else {
        DVector::zeros(n)
    };
    rhs[0] -= scenario.boundaries.left;
    rhs[n - 1] -= scenario.boundaries.right;

    LinearSystem::new(matrix, rhs)
}

/// Assemble the Crank-Nicolson system for time step `time_step`
///
/// # Errors
///
/// `InvalidConfiguration` for a non-positive `time_step` or a matrix that
/// is not diagonally dominant.
pub fn assemble_transient(scenario: &Scenario, time_step: f64) -> SolverResult<TransientSystem> {
    if !(time_step.is_finite() && time_step > 0.0) {
        return Err(SolverError::invalid(format!(
            "Time step must be positive and finite, got {}",
            time_step
        )));
    }

    let n = scenario.size();
    let h = scenario.step();
    check_step(h)?;

    let k = time_step / (h * h);
    let l = 0.5 * scenario.parameters.decay() * time_step;

    let implicit = TridiagonalMatrix::constant(n, -0.5 * k, 1.0 + k + l, -0.5 * k)?;
    implicit.check_diagonal_dominance()?;

    let explicit = ExplicitStencil {
        neighbour: 0.5 * k,
        centre: 1.0 - k - l,
    };

    // both time levels contribute k/2 · δ
    let mut forcing = source_vector(scenario, time_step);
    forcing[0] += k * scenario.boundaries.left;
    forcing[n - 1] += k * scenario.boundaries.right;

    Ok(TransientSystem {
        implicit,
        explicit,
        forcing,
        time_step,
    })
}
