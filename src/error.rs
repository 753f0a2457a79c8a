//! Error types shared by the assembler, the solvers and the grid study
//!
//! Every fallible operation in the crate returns [`SolverResult`]. The three
//! variants of [`SolverError`] are the only failure outcomes a configuration
//! can have; [`FailureKind`] is the fieldless discriminant used in reports.

use std::fmt;
use thiserror::Error;

/// Crate-wide result alias
pub type SolverResult<T> = Result<T, SolverError>;

/// Failure of one solve (or one configuration of a study)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Parameters rejected before any solve was attempted
    ///
    /// Raised for non-positive grid or step sizes, dimension mismatches,
    /// invalid solver budgets and matrices failing the diagonal-dominance check.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Zero or near-zero pivot met during decomposition or substitution
    #[error("singular system: pivot {pivot:e} at row {row} (threshold {threshold:e})")]
    SingularSystem {
        row: usize,
        pivot: f64,
        threshold: f64,
    },

    /// Iteration or step budget exhausted without meeting the tolerance
    #[error(
        "{method} did not converge after {iterations} iterations \
         (last update norm {last_update:e}, tolerance {tolerance:e})"
    )]
    NonConvergence {
        method: &'static str,
        iterations: usize,
        last_update: f64,
        tolerance: f64,
    },
}

impl SolverError {
    /// Build an [`SolverError::InvalidConfiguration`] from any message
    pub fn invalid(reason: impl Into<String>) -> Self {
        SolverError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Discriminant of this error, without its payload
    pub fn kind(&self) -> FailureKind {
        match self {
            SolverError::InvalidConfiguration { .. } => FailureKind::InvalidConfiguration,
            SolverError::SingularSystem { .. } => FailureKind::SingularSystem,
            SolverError::NonConvergence { .. } => FailureKind::NonConvergence,
        }
    }
}

/// Kind of failure, as listed in study reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    InvalidConfiguration,
    SingularSystem,
    NonConvergence,
}

impl FailureKind {
    /// Short identifier used in reports and CSV exports
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidConfiguration => "InvalidConfiguration",
            FailureKind::SingularSystem => "SingularSystem",
            FailureKind::NonConvergence => "NonConvergence",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            SolverError::invalid("N must be positive").kind(),
            FailureKind::InvalidConfiguration
        );

        let singular = SolverError::SingularSystem {
            row: 3,
            pivot: 0.0,
            threshold: 1e-15,
        };
        assert_eq!(singular.kind(), FailureKind::SingularSystem);

        let stalled = SolverError::NonConvergence {
            method: "Gauss-Seidel",
            iterations: 10,
            last_update: 1e-3,
            tolerance: 1e-12,
        };
        assert_eq!(stalled.kind(), FailureKind::NonConvergence);
    }

    #[test]
    fn test_messages_carry_context() {
        let err = SolverError::SingularSystem {
            row: 2,
            pivot: 1e-300,
            threshold: 1e-15,
        };
        assert!(err.to_string().contains("row 2"));

        let err = SolverError::NonConvergence {
            method: "Crank-Nicolson",
            iterations: 500,
            last_update: 0.5,
            tolerance: 1e-10,
        };
        let message = err.to_string();
        assert!(message.contains("Crank-Nicolson"));
        assert!(message.contains("500"));
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::SingularSystem.to_string(), "SingularSystem");
        assert_eq!(FailureKind::NonConvergence.as_str(), "NonConvergence");
    }
}
