//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! - Central enum [`SolverType`] defines which numerical method runs and
//!   carries its parameters (tolerance, budgets, time step)
//! - [`SolverConfiguration`] wraps it and validates it before any solve
//! - [`Solver`] is the steady-state interface {assemble, solve}, implemented
//!   independently by the direct and the iterative method
//! - [`SteadySolution`] and [`SimulationResult`] are the per-solve records;
//!   callers aggregate them, solvers keep no state between calls

use crate::error::{SolverError, SolverResult};
use crate::solver::assembly::{assemble_steady, LinearSystem};
use crate::solver::scenario::Scenario;
use nalgebra::DVector;
use ndarray::Array2;
use std::collections::HashMap;

/// Convergence tolerance on the infinity norm of successive updates
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Sweep budget of the iterative solver
pub const DEFAULT_MAX_ITERATIONS: usize = 200_000;

/// Step budget of the time-stepping driver
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// Time step of the transient experiments
pub const DEFAULT_TIME_STEP: f64 = 1e-3;

// =================================================================================================
// Relaxation policy
// =================================================================================================

/// Relaxation weight policy of the Gauss-Seidel solver
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Relaxation {
    /// Start at W = 1 and re-estimate W from the observed contraction ratio
    #[default]
    Adaptive,

    /// Constant weight; `Fixed(1.0)` is plain Gauss-Seidel
    Fixed(f64),
}

impl Relaxation {
    /// Weight used on the first sweep
    pub fn initial_weight(&self) -> f64 {
        match self {
            Relaxation::Adaptive => 1.0,
            Relaxation::Fixed(weight) => *weight,
        }
    }

    pub fn is_adaptive(&self) -> bool {
        matches!(self, Relaxation::Adaptive)
    }
}

// =================================================================================================
// Central Solver Type Enumeration
// =================================================================================================

/// Type of numerical solution method
///
/// # Examples
///
/// ```rust
/// use bioheat_rs::solver::{Relaxation, SolverType};
///
/// let direct = SolverType::Direct;
///
/// let iterative = SolverType::Iterative {
///     tolerance: 1e-10,
///     max_iterations: 10_000,
///     relaxation: Relaxation::Adaptive,
/// };
///
/// let transient = SolverType::TimeStepping {
///     time_step: 1e-3,
///     tolerance: 1e-10,
///     max_steps: 100_000,
/// };
///
/// assert!(direct.validate().is_ok());
/// assert!(iterative.validate().is_ok());
/// assert!(transient.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SolverType {
    /// Crout LU factorization + forward/backward substitution
    Direct,

    /// Gauss-Seidel sweeps with optional over-relaxation
    ///
    /// # Parameters
    /// - `tolerance`: bound on ‖z_j - z_{j-1}‖∞
    /// - `max_iterations`: sweep budget
    /// - `relaxation`: weight policy
    Iterative {
        tolerance: f64,
        max_iterations: usize,
        relaxation: Relaxation,
    },

    /// Crank-Nicolson marching to steady state
    ///
    /// # Parameters
    /// - `time_step`: dt
    /// - `tolerance`: bound on ‖u_{n+1} - u_n‖∞
    /// - `max_steps`: step budget
    TimeStepping {
        time_step: f64,
        tolerance: f64,
        max_steps: usize,
    },
}

impl SolverType {
    /// Get name identifier
    pub fn name(&self) -> &str {
        match self {
            SolverType::Direct => "Direct",
            SolverType::Iterative { .. } => "Iterative",
            SolverType::TimeStepping { .. } => "TimeStepping",
        }
    }

    /// Validate that parameters are meaningful
    pub fn validate(&self) -> SolverResult<()> {
        match self {
            SolverType::Direct => Ok(()),
            SolverType::Iterative {
                tolerance,
                max_iterations,
                relaxation,
            } => {
                check_tolerance(*tolerance)?;
                if *max_iterations == 0 {
                    return Err(SolverError::invalid("Maximum iterations must be positive"));
                }
                if let Relaxation::Fixed(weight) = relaxation
                    && !(*weight > 0.0 && *weight < 2.0)
                {
                    return Err(SolverError::invalid(format!(
                        "Relaxation weight must lie in (0, 2), got {}",
                        weight
                    )));
                }
                Ok(())
            }
            SolverType::TimeStepping {
                time_step,
                tolerance,
                max_steps,
            } => {
                if !(time_step.is_finite() && *time_step > 0.0) {
                    return Err(SolverError::invalid(format!(
                        "Time step must be positive and finite, got {}",
                        time_step
                    )));
                }
                check_tolerance(*tolerance)?;
                if *max_steps == 0 {
                    return Err(SolverError::invalid("Maximum steps must be positive"));
                }
                Ok(())
            }
        }
    }

    /// Whether this method solves the steady problem directly
    pub fn is_steady(&self) -> bool {
        !matches!(self, SolverType::TimeStepping { .. })
    }
}

fn check_tolerance(tolerance: f64) -> SolverResult<()> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(SolverError::invalid(format!(
            "Tolerance must be positive and finite, got {}",
            tolerance
        )));
    }
    Ok(())
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration for numerical solver
///
/// # Examples
///
/// ```rust
/// use bioheat_rs::solver::SolverConfiguration;
///
/// let config = SolverConfiguration::iterative(1e-10, 50_000);
/// assert!(config.validate().is_ok());
///
/// let bad = SolverConfiguration::time_stepping(-1.0, 1e-10, 10);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfiguration {
    /// Type of solver and its parameters
    pub solver_type: SolverType,
}

impl SolverConfiguration {
    /// Create a new configuration with a given solver type
    pub fn new(solver_type: SolverType) -> Self {
        Self { solver_type }
    }

    /// Direct Crout solve
    pub fn direct() -> Self {
        Self::new(SolverType::Direct)
    }

    /// Gauss-Seidel with adaptive relaxation
    pub fn iterative(tolerance: f64, max_iterations: usize) -> Self {
        Self::iterative_with(tolerance, max_iterations, Relaxation::Adaptive)
    }

    /// Gauss-Seidel with an explicit relaxation policy
    pub fn iterative_with(tolerance: f64, max_iterations: usize, relaxation: Relaxation) -> Self {
        Self::new(SolverType::Iterative {
            tolerance,
            max_iterations,
            relaxation,
        })
    }

    /// Crank-Nicolson marching to steady state
    pub fn time_stepping(time_step: f64, tolerance: f64, max_steps: usize) -> Self {
        Self::new(SolverType::TimeStepping {
            time_step,
            tolerance,
            max_steps,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> SolverResult<()> {
        self.solver_type.validate()
    }
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self::direct()
    }
}

// =================================================================================================
// Results
// =================================================================================================

/// Diagnostics of one steady solve
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolveDiagnostics {
    /// Sweeps performed (zero for the direct method)
    pub iterations: usize,

    /// Mean of the accepted contraction-ratio samples, when any were taken
    pub mean_spectral_radius: Option<f64>,

    /// Relaxation weight in force at the end of the solve
    pub final_relaxation: Option<f64>,

    /// ‖z_j - z_{j-1}‖∞ for every sweep, in order
    pub update_norms: Vec<f64>,

    /// ‖A·u - b‖∞ of the returned solution
    pub residual: f64,
}

/// Solution of a steady system plus its diagnostics
#[derive(Clone, Debug, PartialEq)]
pub struct SteadySolution {
    pub values: DVector<f64>,
    pub diagnostics: SolveDiagnostics,
}

/// Append-only sequence of states, one per time level
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    states: Vec<DVector<f64>>,
}

impl Trajectory {
    /// Start a trajectory from its initial state
    pub fn new(initial: DVector<f64>) -> Self {
        Self {
            states: vec![initial],
        }
    }

    pub(crate) fn push(&mut self, state: DVector<f64>) {
        self.states.push(state);
    }

    /// Number of stored time levels (initial state included)
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[DVector<f64>] {
        &self.states
    }

    pub fn last(&self) -> Option<&DVector<f64>> {
        self.states.last()
    }

    /// Copy into a (time level × node) array
    pub fn to_array(&self) -> Array2<f64> {
        let rows = self.states.len();
        let cols = self.states.first().map_or(0, |s| s.len());
        Array2::from_shape_fn((rows, cols), |(t, i)| self.states[t][i])
    }
}

/// Result of a time-stepping run
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// t_n = n · dt for every stored level
    pub time_points: Vec<f64>,

    /// States, initial condition first
    pub trajectory: Trajectory,

    /// Last state of the trajectory
    pub final_state: DVector<f64>,

    /// Free-form metadata (solver name, dt, steps, ...)
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    pub fn new(time_points: Vec<f64>, trajectory: Trajectory, final_state: DVector<f64>) -> Self {
        Self {
            time_points,
            trajectory,
            final_state,
            metadata: HashMap::new(),
        }
    }

    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Number of time steps taken (trajectory length minus the initial state)
    pub fn steps(&self) -> usize {
        self.trajectory.len().saturating_sub(1)
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Steady-state solver: assemble a scenario, then solve the system
///
/// Implemented by [`DirectSolver`](crate::solver::DirectSolver) and
/// [`GaussSeidelSolver`](crate::solver::GaussSeidelSolver). Implementations
/// hold only their immutable configuration, so one instance may serve many
/// scenarios concurrently.
pub trait Solver: Send + Sync {
    /// Build the linear system of `scenario`
    fn assemble(&self, scenario: &Scenario) -> SolverResult<LinearSystem> {
        assemble_steady(scenario)
    }

    /// Solve an assembled system
    fn solve(&self, system: &LinearSystem) -> SolverResult<SteadySolution>;

    /// Assemble then solve
    fn solve_scenario(&self, scenario: &Scenario) -> SolverResult<SteadySolution> {
        let system = self.assemble(scenario)?;
        self.solve(&system)
    }

    fn name(&self) -> &str;
}
