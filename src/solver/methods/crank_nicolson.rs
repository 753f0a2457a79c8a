//! Crank-Nicolson time stepping to steady state
//!
//! # Mathematical Background
//!
//! The transient problem ∂u/∂t = ∂²u/∂x² - λ²u + S(x) is discretized with
//! the trapezoidal rule in time and central differences in space:
//!
//! ```text
//! (I + ½A) u_{n+1} = (I - ½A) u_n + dt·S + k·(boundary terms)
//! ```
//!
//! with k = dt/h² and l = ½λ²dt, so the implicit matrix has diagonal
//! 1 + k + l and off-diagonals -k/2.
//!
//! # Characteristics
//!
//! - **Order**: second order in time and space
//! - **Stability**: unconditionally stable; high-frequency modes decay slowly
//!   and oscillate when k is large
//! - **Cost**: one Crout factorization per run, O(N) per step
//!
//! The fixed point of the iteration is exactly the steady discrete solution,
//! so marching until ‖u_{n+1} - u_n‖∞ ≤ tol reproduces the direct solve.
//!
//! # Example
//!
//! ```rust
//! use bioheat_rs::solver::{CrankNicolsonDriver, Scenario};
//!
//! let scenario = Scenario::tissue(10).unwrap();
//! let driver = CrankNicolsonDriver::new(1e-3, 1e-10, 100_000);
//! let result = driver.run_uniform(&scenario, -5.0).unwrap();
//!
//! assert_eq!(result.time_points.len(), result.trajectory.len());
//! ```

use crate::error::{SolverError, SolverResult};
use crate::linalg::{decompose, CroutFactors};
use crate::solver::assembly::{assemble_transient, TransientSystem};
use crate::solver::traits::{DEFAULT_MAX_STEPS, DEFAULT_TIME_STEP, DEFAULT_TOLERANCE};
use crate::solver::{Scenario, SimulationResult, SolverConfiguration, SolverType, Trajectory};
use nalgebra::DVector;

// =================================================================================================
// Implicit stepper
// =================================================================================================

/// Assembled and factorized Crank-Nicolson operator for one scenario
///
/// The factorization is computed once and reused for every step.
#[derive(Debug, Clone)]
pub struct ImplicitStepper {
    system: TransientSystem,
    factors: CroutFactors,
}

impl ImplicitStepper {
    pub fn system(&self) -> &TransientSystem {
        &self.system
    }

    /// Advance `state` by one time step
    pub fn step(&self, state: &DVector<f64>) -> SolverResult<DVector<f64>> {
        self.factors.solve(&self.system.step_rhs(state))
    }
}

// =================================================================================================
// Driver
// =================================================================================================

/// Crank-Nicolson driver marching a scenario until the update stalls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrankNicolsonDriver {
    time_step: f64,
    tolerance: f64,
    max_steps: usize,
}

impl CrankNicolsonDriver {
    pub fn new(time_step: f64, tolerance: f64, max_steps: usize) -> Self {
        Self {
            time_step,
            tolerance,
            max_steps,
        }
    }

    /// Build from a `TimeStepping` configuration
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the configuration is invalid or selects
    /// another method.
    pub fn from_configuration(config: &SolverConfiguration) -> SolverResult<Self> {
        config.validate()?;
        match config.solver_type {
            SolverType::TimeStepping {
                time_step,
                tolerance,
                max_steps,
            } => Ok(Self::new(time_step, tolerance, max_steps)),
            other => Err(SolverError::invalid(format!(
                "Crank-Nicolson requires a TimeStepping configuration, got {}",
                other.name()
            ))),
        }
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn name(&self) -> &'static str {
        "Crank-Nicolson"
    }

    /// Assemble and factorize the scenario's transient operator
    pub fn prepare(&self, scenario: &Scenario) -> SolverResult<ImplicitStepper> {
        let system = assemble_transient(scenario, self.time_step)?;
        let factors = decompose(&system.implicit)?;
        Ok(ImplicitStepper { system, factors })
    }

    /// March from `initial` until ‖u_{n+1} - u_n‖∞ < tolerance
    ///
    /// # Returns
    ///
    /// The full trajectory, initial state included, with t_n = n · dt.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration`: `initial` does not have one value per node,
    ///   or the driver parameters are invalid
    /// - `SingularSystem`: the implicit matrix cannot be factorized
    /// - `NonConvergence`: the step budget is exhausted or the state stops
    ///   being finite
    pub fn run(&self, scenario: &Scenario, initial: &DVector<f64>) -> SolverResult<SimulationResult> {
        SolverConfiguration::time_stepping(self.time_step, self.tolerance, self.max_steps)
            .validate()?;

        if initial.len() != scenario.size() {
            return Err(SolverError::invalid(format!(
                "Initial state has {} values but the grid has {} interior nodes",
                initial.len(),
                scenario.size()
            )));
        }
        if let Some(i) = initial.iter().position(|v| !v.is_finite()) {
            return Err(SolverError::invalid(format!(
                "Initial state is not finite at node {}",
                i
            )));
        }

        let stepper = self.prepare(scenario)?;

        let mut trajectory = Trajectory::new(initial.clone());
        let mut time_points = vec![0.0];
        let mut current = initial.clone();
        let mut last_update = f64::INFINITY;

        for step in 1..=self.max_steps {
            let next = stepper.step(&current)?;
            let update = (&next - &current).amax();

            if !update.is_finite() || next.iter().any(|v| !v.is_finite()) {
                log::warn!("{}: state diverged at step {}", self.name(), step);
                return Err(self.non_convergence(step, update));
            }

            trajectory.push(next.clone());
            time_points.push(step as f64 * self.time_step);
            current = next;
            last_update = update;

            if update < self.tolerance {
                log::debug!(
                    "{}: steady state on {} nodes after {} steps (t = {})",
                    self.name(),
                    scenario.size(),
                    step,
                    step as f64 * self.time_step
                );

                let mut result = SimulationResult::new(time_points, trajectory, current);
                result.add_metadata("solver", self.name());
                result.add_metadata("time_step", &self.time_step.to_string());
                result.add_metadata("steps", &step.to_string());
                result.add_metadata("last_update", &format!("{:e}", update));
                return Ok(result);
            }
        }

        log::warn!(
            "{}: no steady state within {} steps (last update {:e})",
            self.name(),
            self.max_steps,
            last_update
        );
        Err(self.non_convergence(self.max_steps, last_update))
    }

    /// [`run`](Self::run) from a uniform initial state
    pub fn run_uniform(&self, scenario: &Scenario, value: f64) -> SolverResult<SimulationResult> {
        self.run(scenario, &DVector::from_element(scenario.size(), value))
    }

    fn non_convergence(&self, iterations: usize, last_update: f64) -> SolverError {
        SolverError::NonConvergence {
            method: "Crank-Nicolson",
            iterations,
            last_update,
            tolerance: self.tolerance,
        }
    }
}

impl Default for CrankNicolsonDriver {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_STEP, DEFAULT_TOLERANCE, DEFAULT_MAX_STEPS)
    }
}
