//! Per-configuration records and the aggregated study report

use crate::error::{FailureKind, SolverError};
use crate::physics::BioheatParameters;
use crate::solver::{DirichletBoundaries, SimulationResult};
use crate::study::convergence::convergence_order;
use nalgebra::DVector;
use std::collections::BTreeMap;
use std::fmt;

// =================================================================================================
// Configuration records
// =================================================================================================

/// Successful run of one grid size
#[derive(Debug, Clone)]
pub struct ConfigurationRecord {
    /// Steady solution, or final state of the trajectory
    pub solution: DVector<f64>,

    /// Max absolute deviation from the reference profile, when one was given
    pub max_error: Option<f64>,

    /// Sweeps (iterative), time steps (transient) or zero (direct)
    pub iterations: usize,

    /// Mean contraction ratio observed by the adaptive SOR solver
    pub mean_spectral_radius: Option<f64>,

    /// ‖A·u - b‖∞ for steady solves
    pub residual: Option<f64>,

    /// Full trajectory for time-stepping runs
    pub transient: Option<SimulationResult>,
}

/// Outcome of one grid size: a record or the error that stopped it
#[derive(Debug, Clone)]
pub struct ConfigurationOutcome {
    pub interior_nodes: usize,

    /// h = L / (N + 1)
    pub step: f64,

    pub result: Result<ConfigurationRecord, SolverError>,
}

impl ConfigurationOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn record(&self) -> Option<&ConfigurationRecord> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&SolverError> {
        self.result.as_ref().err()
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error().map(SolverError::kind)
    }
}

// =================================================================================================
// Study report
// =================================================================================================

/// Results of a grid study, ordered by grid size
///
/// Each configuration owns its outcome; the aggregate diagnostics are
/// computed from the map on demand.
#[derive(Debug, Clone)]
pub struct StudyReport {
    /// Name of the method that produced the outcomes
    pub method: String,

    pub parameters: BioheatParameters,

    pub boundaries: DirichletBoundaries,

    pub outcomes: BTreeMap<usize, ConfigurationOutcome>,
}

impl StudyReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, interior_nodes: usize) -> Option<&ConfigurationOutcome> {
        self.outcomes.get(&interior_nodes)
    }

    /// Successful configurations, by increasing N
    pub fn successes(&self) -> impl Iterator<Item = (&ConfigurationOutcome, &ConfigurationRecord)> {
        self.outcomes
            .values()
            .filter_map(|outcome| outcome.record().map(|record| (outcome, record)))
    }

    /// Failed configurations, by increasing N
    pub fn failures(&self) -> impl Iterator<Item = (&ConfigurationOutcome, &SolverError)> {
        self.outcomes
            .values()
            .filter_map(|outcome| outcome.error().map(|error| (outcome, error)))
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// `(h, max_error)` for every success that carries an error
    pub fn errors(&self) -> Vec<(f64, f64)> {
        self.successes()
            .filter_map(|(outcome, record)| record.max_error.map(|e| (outcome.step, e)))
            .collect()
    }

    /// Slope of log(error) vs log(1/h) over the successful configurations
    pub fn convergence_order(&self) -> Option<f64> {
        convergence_order(&self.errors())
    }

    /// Estimated spectral radius per grid size
    pub fn spectral_radii(&self) -> BTreeMap<usize, f64> {
        self.successes()
            .filter_map(|(outcome, record)| {
                record
                    .mean_spectral_radius
                    .map(|rho| (outcome.interior_nodes, rho))
            })
            .collect()
    }

    /// Mean of the per-configuration spectral radius estimates
    pub fn mean_spectral_radius(&self) -> Option<f64> {
        let radii = self.spectral_radii();
        if radii.is_empty() {
            return None;
        }
        Some(radii.values().sum::<f64>() / radii.len() as f64)
    }
}

impl fmt::Display for StudyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid study: {}", self.method)?;
        writeln!(
            f,
            "  L = {}, λ² = {}, {}",
            self.parameters.length(),
            self.parameters.decay(),
            self.boundaries
        )?;

        writeln!(f, "Successful configurations ({}):", self.success_count())?;
        for (outcome, record) in self.successes() {
            write!(
                f,
                "  N = {:>5}  h = {:.4e}  iterations = {:>7}",
                outcome.interior_nodes, outcome.step, record.iterations
            )?;
            if let Some(error) = record.max_error {
                write!(f, "  max error = {:.4e}", error)?;
            }
            if let Some(rho) = record.mean_spectral_radius {
                write!(f, "  ρ = {:.6}", rho)?;
            }
            writeln!(f)?;
        }

        let failures = self.failure_count();
        if failures > 0 {
            writeln!(f, "Failed configurations ({}):", failures)?;
            for (outcome, error) in self.failures() {
                writeln!(
                    f,
                    "  N = {:>5}  h = {:.4e}  [{}] {}",
                    outcome.interior_nodes,
                    outcome.step,
                    error.kind(),
                    error
                )?;
            }
        }

        match self.convergence_order() {
            Some(order) => writeln!(f, "Convergence order (slope of log error vs log 1/h): {:.4}", order)?,
            None => writeln!(f, "Convergence order: n/a")?,
        }
        if let Some(rho) = self.mean_spectral_radius() {
            writeln!(f, "Mean spectral radius: {:.6}", rho)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn success(n: usize, error: f64, rho: Option<f64>) -> ConfigurationOutcome {
        ConfigurationOutcome {
            interior_nodes: n,
            step: 1.0 / (n as f64 + 1.0),
            result: Ok(ConfigurationRecord {
                solution: DVector::zeros(n),
                max_error: Some(error),
                iterations: 10 * n,
                mean_spectral_radius: rho,
                residual: Some(0.0),
                transient: None,
            }),
        }
    }

    fn report(outcomes: Vec<ConfigurationOutcome>) -> StudyReport {
        StudyReport {
            method: "test".to_string(),
            parameters: BioheatParameters::tissue(),
            boundaries: DirichletBoundaries::tissue(),
            outcomes: outcomes.into_iter().map(|o| (o.interior_nodes, o)).collect(),
        }
    }

    #[test]
    fn test_aggregates_skip_failures() {
        let failed = ConfigurationOutcome {
            interior_nodes: 0,
            step: 1.0,
            result: Err(SolverError::invalid("Grid needs at least one interior node")),
        };
        let report = report(vec![
            success(9, 1e-2, Some(0.5)),
            failed,
            success(19, 2.5e-3, Some(0.7)),
        ]);

        assert_eq!(report.len(), 3);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(
            report.get(0).unwrap().failure_kind(),
            Some(FailureKind::InvalidConfiguration)
        );

        // h = 0.1 and 0.05 with error ∝ h²
        assert_relative_eq!(report.convergence_order().unwrap(), -2.0, epsilon = 1e-12);
        assert_relative_eq!(report.mean_spectral_radius().unwrap(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_outcomes_are_ordered_by_grid_size() {
        let report = report(vec![success(40, 1e-4, None), success(5, 1e-2, None), success(10, 1e-3, None)]);
        let sizes: Vec<usize> = report.outcomes.keys().copied().collect();
        assert_eq!(sizes, vec![5, 10, 40]);
    }

    #[test]
    fn test_display_lists_failures_with_kind() {
        let failed = ConfigurationOutcome {
            interior_nodes: 7,
            step: 0.125,
            result: Err(SolverError::SingularSystem {
                row: 2,
                pivot: 0.0,
                threshold: 1e-15,
            }),
        };
        let text = report(vec![success(9, 1e-2, None), failed]).to_string();

        assert!(text.contains("Successful configurations (1)"));
        assert!(text.contains("Failed configurations (1)"));
        assert!(text.contains("[SingularSystem]"));
        assert!(text.contains("N =     7"));
        assert!(text.contains("Convergence order: n/a"));
    }
}
