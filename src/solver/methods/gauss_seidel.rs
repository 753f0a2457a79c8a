//! Gauss-Seidel iteration with adaptive over-relaxation
//!
//! # Mathematical Background
//!
//! One sweep updates the unknowns in increasing row order, using the values
//! already updated during the same sweep:
//!
//! ```text
//! ẑ_i = (b_i - a_{i,i-1} z_{i-1} - a_{i,i+1} z_{i+1}) / a_{i,i}
//! z_i ← W ẑ_i + (1 - W) z_i
//! ```
//!
//! With W = 1 this is plain Gauss-Seidel. The sweep is a strict sequential
//! dependency chain and is never parallelized.
//!
//! # Adaptive relaxation
//!
//! From the second sweep on, the ratio of successive update norms
//!
//! ```text
//! ρ = ‖z_j - z_{j-1}‖∞ / ‖z_{j-1} - z_{j-2}‖∞
//! ```
//!
//! estimates the spectral radius of the iteration. When ρ is finite and
//! below one it is recorded and the weight for the next sweep becomes
//!
//! ```text
//! W = 2 / (1 + √(1 - ρ²))
//! ```
//!
//! This is the optimal SOR weight for consistently ordered SPD matrices
//! (Burden & Faires, Theorem 7.26). Here it is a heuristic: the ratio is
//! measured on the already-relaxed iteration and applied one sweep late, and
//! the preconditions of the formula are not verified.

use crate::error::{SolverError, SolverResult};
use crate::solver::assembly::LinearSystem;
use crate::solver::traits::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::solver::{
    Relaxation, SolveDiagnostics, Solver, SolverConfiguration, SolverType, SteadySolution,
};
use nalgebra::DVector;

/// Optimal SOR weight for an iteration of spectral radius `rho` (0 ≤ ρ < 1)
pub fn optimal_relaxation(rho: f64) -> f64 {
    2.0 / (1.0 + (1.0 - rho * rho).sqrt())
}

/// Gauss-Seidel / SOR iterative solver
///
/// # Example
///
/// ```rust
/// use bioheat_rs::solver::{GaussSeidelSolver, Relaxation, Scenario, Solver};
///
/// let solver = GaussSeidelSolver::new(1e-10, 100_000, Relaxation::Adaptive);
/// let solution = solver.solve_scenario(&Scenario::tissue(20).unwrap()).unwrap();
///
/// assert!(solution.diagnostics.iterations > 0);
/// assert!(solution.diagnostics.mean_spectral_radius.unwrap() < 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussSeidelSolver {
    tolerance: f64,
    max_iterations: usize,
    relaxation: Relaxation,
}

impl GaussSeidelSolver {
    pub fn new(tolerance: f64, max_iterations: usize, relaxation: Relaxation) -> Self {
        Self {
            tolerance,
            max_iterations,
            relaxation,
        }
    }

    /// Build from an `Iterative` configuration
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the configuration is invalid or selects
    /// another method.
    pub fn from_configuration(config: &SolverConfiguration) -> SolverResult<Self> {
        config.validate()?;
        match config.solver_type {
            SolverType::Iterative {
                tolerance,
                max_iterations,
                relaxation,
            } => Ok(Self::new(tolerance, max_iterations, relaxation)),
            other => Err(SolverError::invalid(format!(
                "Gauss-Seidel requires an Iterative configuration, got {}",
                other.name()
            ))),
        }
    }

    /// Plain Gauss-Seidel (W fixed at 1)
    pub fn plain(tolerance: f64, max_iterations: usize) -> Self {
        Self::new(tolerance, max_iterations, Relaxation::Fixed(1.0))
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn relaxation(&self) -> Relaxation {
        self.relaxation
    }

    fn non_convergence(&self, iterations: usize, last_update: f64) -> SolverError {
        SolverError::NonConvergence {
            method: "Gauss-Seidel",
            iterations,
            last_update,
            tolerance: self.tolerance,
        }
    }
}

impl Default for GaussSeidelSolver {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, DEFAULT_MAX_ITERATIONS, Relaxation::Adaptive)
    }
}

impl Solver for GaussSeidelSolver {
    fn solve(&self, system: &LinearSystem) -> SolverResult<SteadySolution> {
        let a = &system.matrix;
        let b = &system.rhs;
        let n = a.dim();

        for (row, &d) in a.diag().iter().enumerate() {
            if d == 0.0 || !d.is_finite() {
                return Err(SolverError::SingularSystem {
                    row,
                    pivot: d,
                    threshold: 0.0,
                });
            }
        }

        let mut z: DVector<f64> = DVector::zeros(n);
        let mut previous = z.clone();
        let mut weight = self.relaxation.initial_weight();
        let mut samples: Vec<f64> = Vec::new();
        let mut update_norms: Vec<f64> = Vec::new();

        for sweep in 0..self.max_iterations {
            for i in 0..n {
                let (left, right) = a.neighbours(i);
                let mut known = 0.0;
                if i > 0 {
                    known += left * z[i - 1];
                }
                if i + 1 < n {
                    known += right * z[i + 1];
                }
                let candidate = (b[i] - known) / a.diag()[i];
                z[i] = weight * candidate + (1.0 - weight) * z[i];
            }

            let norm = (&z - &previous).amax();
            if !norm.is_finite() || z.iter().any(|v| !v.is_finite()) {
                log::warn!("Gauss-Seidel diverged at sweep {} (W = {})", sweep + 1, weight);
                return Err(self.non_convergence(sweep + 1, norm));
            }
            update_norms.push(norm);

            if norm <= self.tolerance {
                let residual = a.residual_norm(&z, b)?;
                let mean_spectral_radius = if samples.is_empty() {
                    None
                } else {
                    Some(samples.iter().sum::<f64>() / samples.len() as f64)
                };

                log::debug!(
                    "Gauss-Seidel converged on {} unknowns in {} sweeps (W = {:.4}, mean ρ = {:?})",
                    n,
                    sweep + 1,
                    weight,
                    mean_spectral_radius
                );

                return Ok(SteadySolution {
                    values: z,
                    diagnostics: SolveDiagnostics {
                        iterations: sweep + 1,
                        mean_spectral_radius,
                        final_relaxation: Some(weight),
                        update_norms,
                        residual,
                    },
                });
            }

            if self.relaxation.is_adaptive() && sweep >= 1 {
                let rho = norm / update_norms[sweep - 1];
                if rho.is_finite() && rho < 1.0 {
                    samples.push(rho);
                    // takes effect on the next sweep
                    weight = optimal_relaxation(rho);
                }
            }

            previous.copy_from(&z);
        }

        let last_update = update_norms.last().copied().unwrap_or(f64::INFINITY);
        log::warn!(
            "Gauss-Seidel exhausted {} sweeps on {} unknowns (last update {:e})",
            self.max_iterations,
            n,
            last_update
        );
        Err(self.non_convergence(self.max_iterations, last_update))
    }

    fn name(&self) -> &'static str {
        match self.relaxation {
            Relaxation::Adaptive => "Gauss-Seidel (adaptive SOR)",
            Relaxation::Fixed(_) => "Gauss-Seidel",
        }
    }
}
