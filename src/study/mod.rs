//! Grid studies: one solver configuration over a sequence of grid sizes
//!
//! A [`GridStudy`] solves the same physical problem for every requested
//! number of interior nodes and collects one [`ConfigurationOutcome`] per
//! size. A failing size never aborts the others; its error is kept in the
//! report next to the successful records.
//!
//! With the `parallel` feature the grid sizes are solved concurrently with
//! Rayon. Every configuration builds its own scenario, system and solver
//! state; the report is assembled from the returned outcomes.
//!
//! # Example
//!
//! ```rust
//! use bioheat_rs::physics::BioheatParameters;
//! use bioheat_rs::solver::{DirichletBoundaries, SolverConfiguration};
//! use bioheat_rs::study::GridStudy;
//!
//! let report = GridStudy::new(
//!     BioheatParameters::tissue().without_source(),
//!     DirichletBoundaries::tissue(),
//!     [5, 10, 20, 40],
//!     SolverConfiguration::direct(),
//! )
//! .with_hyperbolic_sine_reference()
//! .run();
//!
//! let order = report.convergence_order().unwrap();
//! assert!((order + 2.0).abs() < 0.1);
//! ```

mod convergence;
mod report;

pub use convergence::convergence_order;
pub use report::{ConfigurationOutcome, ConfigurationRecord, StudyReport};

use crate::error::{SolverError, SolverResult};
use crate::physics::reference::hyperbolic_sine_profile;
use crate::physics::BioheatParameters;
use crate::solver::{
    steady_solver, CrankNicolsonDriver, DirichletBoundaries, Scenario, SolverConfiguration,
    SolverType,
};
use nalgebra::DVector;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Reference profile used to measure the error of each configuration
pub type ReferenceProfile = Arc<dyn Fn(&Scenario) -> DVector<f64> + Send + Sync>;

/// Uniform starting value of time-stepping runs (surface minus artery temperature)
pub const DEFAULT_INITIAL_VALUE: f64 = -5.0;

/// Batch of solves over several grid sizes
#[derive(Clone)]
pub struct GridStudy {
    parameters: BioheatParameters,
    boundaries: DirichletBoundaries,
    grid_sizes: Vec<usize>,
    configuration: SolverConfiguration,
    reference: Option<ReferenceProfile>,
    initial_value: f64,
}

impl GridStudy {
    /// Create a study; grid sizes are sorted and deduplicated
    pub fn new(
        parameters: BioheatParameters,
        boundaries: DirichletBoundaries,
        grid_sizes: impl IntoIterator<Item = usize>,
        configuration: SolverConfiguration,
    ) -> Self {
        let mut grid_sizes: Vec<usize> = grid_sizes.into_iter().collect();
        grid_sizes.sort_unstable();
        grid_sizes.dedup();

        Self {
            parameters,
            boundaries,
            grid_sizes,
            configuration,
            reference: None,
            initial_value: DEFAULT_INITIAL_VALUE,
        }
    }

    /// Compare every solution against `reference`
    pub fn with_reference<F>(mut self, reference: F) -> Self
    where
        F: Fn(&Scenario) -> DVector<f64> + Send + Sync + 'static,
    {
        self.reference = Some(Arc::new(reference));
        self
    }

    /// Compare against the closed-form profile of the source-free problem
    pub fn with_hyperbolic_sine_reference(self) -> Self {
        self.with_reference(|scenario: &Scenario| {
            hyperbolic_sine_profile(
                &scenario.grid,
                scenario.parameters.decay(),
                &scenario.boundaries,
            )
        })
    }

    /// Uniform initial state of time-stepping runs
    pub fn with_initial_value(mut self, value: f64) -> Self {
        self.initial_value = value;
        self
    }

    pub fn grid_sizes(&self) -> &[usize] {
        &self.grid_sizes
    }

    pub fn configuration(&self) -> &SolverConfiguration {
        &self.configuration
    }

    fn method_name(&self) -> String {
        match self.configuration.solver_type {
            SolverType::TimeStepping { .. } => "Crank-Nicolson".to_string(),
            _ => match steady_solver(&self.configuration) {
                Ok(solver) => solver.name().to_string(),
                Err(_) => self.configuration.solver_type.name().to_string(),
            },
        }
    }

    /// Run every grid size and collect the outcomes
    pub fn run(&self) -> StudyReport {
        log::info!(
            "Grid study ({}) over {} grid sizes",
            self.method_name(),
            self.grid_sizes.len()
        );

        #[cfg(feature = "parallel")]
        let outcomes: Vec<ConfigurationOutcome> = self
            .grid_sizes
            .par_iter()
            .map(|&n| self.run_configuration(n))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<ConfigurationOutcome> = self
            .grid_sizes
            .iter()
            .map(|&n| self.run_configuration(n))
            .collect();

        let report = StudyReport {
            method: self.method_name(),
            parameters: self.parameters,
            boundaries: self.boundaries,
            outcomes: outcomes
                .into_iter()
                .map(|outcome| (outcome.interior_nodes, outcome))
                .collect(),
        };

        if report.failure_count() > 0 {
            log::warn!(
                "Grid study finished with {} failed configuration(s) out of {}",
                report.failure_count(),
                report.len()
            );
        } else {
            log::info!("Grid study finished: {} configurations", report.len());
        }
        report
    }

    /// Solve a single grid size
    pub fn run_configuration(&self, interior_nodes: usize) -> ConfigurationOutcome {
        let step = self.parameters.length() / (interior_nodes as f64 + 1.0);
        let result = self.solve(interior_nodes);

        if let Err(error) = &result {
            log::warn!("N = {}: {}", interior_nodes, error);
        }

        ConfigurationOutcome {
            interior_nodes,
            step,
            result,
        }
    }

    fn solve(&self, interior_nodes: usize) -> SolverResult<ConfigurationRecord> {
        let scenario = Scenario::new(self.parameters, self.boundaries, interior_nodes)?;

        let mut record = match self.configuration.solver_type {
            SolverType::TimeStepping { .. } => {
                let driver = CrankNicolsonDriver::from_configuration(&self.configuration)?;
                let result = driver.run_uniform(&scenario, self.initial_value)?;
                ConfigurationRecord {
                    solution: result.final_state.clone(),
                    max_error: None,
                    iterations: result.steps(),
                    mean_spectral_radius: None,
                    residual: None,
                    transient: Some(result),
                }
            }
            _ => {
                let solver = steady_solver(&self.configuration)?;
                let solution = solver.solve_scenario(&scenario)?;
                ConfigurationRecord {
                    solution: solution.values,
                    max_error: None,
                    iterations: solution.diagnostics.iterations,
                    mean_spectral_radius: solution.diagnostics.mean_spectral_radius,
                    residual: Some(solution.diagnostics.residual),
                    transient: None,
                }
            }
        };

        if let Some(reference) = &self.reference {
            let expected = reference(&scenario);
            if expected.len() != record.solution.len() {
                return Err(SolverError::invalid(format!(
                    "Reference profile has {} values but the grid has {} interior nodes",
                    expected.len(),
                    record.solution.len()
                )));
            }
            record.max_error = Some((&record.solution - &expected).amax());
        }

        log::debug!(
            "N = {}: {} iterations, max error {:?}",
            interior_nodes,
            record.iterations,
            record.max_error
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::solver::Relaxation;

    fn homogeneous() -> BioheatParameters {
        BioheatParameters::tissue().without_source()
    }

    #[test]
    fn test_grid_sizes_sorted_and_deduplicated() {
        let study = GridStudy::new(
            homogeneous(),
            DirichletBoundaries::tissue(),
            [40, 5, 10, 5],
            SolverConfiguration::direct(),
        );
        assert_eq!(study.grid_sizes(), &[5, 10, 40]);
    }

    #[test]
    fn test_failure_does_not_abort_other_sizes() {
        let report = GridStudy::new(
            homogeneous(),
            DirichletBoundaries::tissue(),
            [0, 5, 10],
            SolverConfiguration::direct(),
        )
        .with_hyperbolic_sine_reference()
        .run();

        assert_eq!(report.len(), 3);
        assert_eq!(report.success_count(), 2);
        assert_eq!(
            report.get(0).unwrap().failure_kind(),
            Some(FailureKind::InvalidConfiguration)
        );
        assert!(report.get(5).unwrap().record().unwrap().max_error.unwrap() < 5e-3);
    }

    #[test]
    fn test_budget_failure_reported_per_size() {
        // 500 sweeps converge for N = 5 but not for N = 40
        let report = GridStudy::new(
            homogeneous(),
            DirichletBoundaries::new(5.0, -5.0),
            [5, 40],
            SolverConfiguration::iterative_with(1e-10, 500, Relaxation::Fixed(1.0)),
        )
        .run();

        assert!(report.get(5).unwrap().is_success());
        assert_eq!(
            report.get(40).unwrap().failure_kind(),
            Some(FailureKind::NonConvergence)
        );
    }

    #[test]
    fn test_iterative_study_records_spectral_radius() {
        let report = GridStudy::new(
            homogeneous(),
            DirichletBoundaries::new(5.0, -5.0),
            [10, 20],
            SolverConfiguration::iterative(1e-10, 100_000),
        )
        .run();

        assert_eq!(report.method, "Gauss-Seidel (adaptive SOR)");
        assert_eq!(report.spectral_radii().len(), 2);
        let rho = report.mean_spectral_radius().unwrap();
        assert!(rho > 0.0 && rho < 1.0);
    }

    #[test]
    fn test_time_stepping_study_keeps_trajectory() {
        let report = GridStudy::new(
            BioheatParameters::tissue(),
            DirichletBoundaries::tissue(),
            [6],
            SolverConfiguration::time_stepping(1e-3, 1e-9, 100_000),
        )
        .run();

        let record = report.get(6).unwrap().record().unwrap();
        let transient = record.transient.as_ref().unwrap();
        assert_eq!(record.iterations, transient.steps());
        assert_eq!(transient.trajectory.states()[0], DVector::from_element(6, -5.0));
        assert_eq!(report.method, "Crank-Nicolson");
    }

    #[test]
    fn test_invalid_configuration_fails_every_size() {
        let report = GridStudy::new(
            homogeneous(),
            DirichletBoundaries::tissue(),
            [5, 10],
            SolverConfiguration::time_stepping(0.0, 1e-9, 10),
        )
        .run();

        assert_eq!(report.failure_count(), 2);
        assert!(report
            .failures()
            .all(|(_, e)| e.kind() == FailureKind::InvalidConfiguration));
    }

    #[test]
    fn test_reference_length_mismatch() {
        let report = GridStudy::new(
            homogeneous(),
            DirichletBoundaries::tissue(),
            [5],
            SolverConfiguration::direct(),
        )
        .with_reference(|_: &Scenario| DVector::zeros(3))
        .run();

        assert_eq!(
            report.get(5).unwrap().failure_kind(),
            Some(FailureKind::InvalidConfiguration)
        );
    }
}
