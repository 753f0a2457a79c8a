//! Volumetric heat source term S(x)

use crate::error::{SolverError, SolverResult};

/// Heat source appearing on the right-hand side of the bioheat equation
///
/// The exponential variant models deposition that peaks at the surface
/// (x = L) and decays toward the core:
///
/// ```text
/// S(x) = σ · exp(γ · (L - x))
/// ```
///
/// With γ < 0 the source is largest at x = L.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SourceTerm {
    /// Homogeneous problem
    #[default]
    None,

    /// σ · exp(γ · (L - x))
    Exponential { amplitude: f64, exponent: f64 },
}

impl SourceTerm {
    /// Exponential source with amplitude σ and exponent γ
    pub fn exponential(amplitude: f64, exponent: f64) -> Self {
        SourceTerm::Exponential {
            amplitude,
            exponent,
        }
    }

    /// Whether the source contributes anything to the right-hand side
    pub fn is_active(&self) -> bool {
        !matches!(self, SourceTerm::None)
    }

    /// Evaluate S at position `x` on a domain of length `length`
    pub fn evaluate(&self, x: f64, length: f64) -> f64 {
        match *self {
            SourceTerm::None => 0.0,
            SourceTerm::Exponential {
                amplitude,
                exponent,
            } => amplitude * (exponent * (length - x)).exp(),
        }
    }

    pub(crate) fn validate(&self) -> SolverResult<()> {
        match *self {
            SourceTerm::None => Ok(()),
            SourceTerm::Exponential {
                amplitude,
                exponent,
            } => {
                if !amplitude.is_finite() || !exponent.is_finite() {
                    return Err(SolverError::invalid(format!(
                        "Source parameters must be finite (amplitude {}, exponent {})",
                        amplitude, exponent
                    )));
                }
                Ok(())
            }
        }
    }
}
