//! Immutable physical parameters of the bioheat problem
//!
//! A [`BioheatParameters`] value is built once and handed to every component
//! that needs it. Nothing in the crate mutates it afterwards, so solver
//! instances configured from the same parameters never influence each other.

use crate::error::{SolverError, SolverResult};
use crate::physics::source::SourceTerm;

/// Core body temperature (°C)
pub const CORE_TEMPERATURE: f64 = 37.0;

/// Skin surface temperature (°C)
pub const SURFACE_TEMPERATURE: f64 = 32.0;

/// Arterial blood temperature (°C)
pub const ARTERY_TEMPERATURE: f64 = CORE_TEMPERATURE;

/// Perfusion coefficient λ² of the tissue preset
pub const TISSUE_DECAY: f64 = 2.7;

/// Source amplitude σ of the tissue preset
pub const TISSUE_SOURCE_AMPLITUDE: f64 = 100.0;

/// Physical parameters of the 1D bioheat equation
///
/// ```text
/// u'' - λ² u + S(x) = 0      (steady)
/// ∂u/∂t = u'' - λ² u + S(x)  (transient)
/// ```
///
/// `u` is the temperature relative to arterial blood, so boundary values are
/// deltas (see [`DirichletBoundaries`](crate::solver::DirichletBoundaries)).
///
/// # Example
///
/// ```rust
/// use bioheat_rs::physics::{BioheatParameters, SourceTerm};
///
/// let params = BioheatParameters::tissue().without_source();
/// assert_eq!(params.decay(), 2.7);
/// assert_eq!(params.source(), SourceTerm::None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BioheatParameters {
    length: f64,
    decay: f64,
    source: SourceTerm,
}

impl BioheatParameters {
    /// Create parameters from domain length, decay coefficient λ² and source
    pub fn new(length: f64, decay: f64, source: SourceTerm) -> Self {
        Self {
            length,
            decay,
            source,
        }
    }

    /// Tissue preset: L = 1, λ² = 2.7, S(x) = 100 · exp(-(L - x) / L)
    pub fn tissue() -> Self {
        let length = 1.0;
        Self::new(
            length,
            TISSUE_DECAY,
            SourceTerm::exponential(TISSUE_SOURCE_AMPLITUDE, -1.0 / length),
        )
    }

    /// Same parameters with a different domain length
    pub fn with_length(self, length: f64) -> Self {
        Self { length, ..self }
    }

    /// Same parameters with a different decay coefficient λ²
    pub fn with_decay(self, decay: f64) -> Self {
        Self { decay, ..self }
    }

    /// Same parameters with a different source term
    pub fn with_source(self, source: SourceTerm) -> Self {
        Self { source, ..self }
    }

    /// Same parameters, homogeneous equation
    pub fn without_source(self) -> Self {
        self.with_source(SourceTerm::None)
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Decay (perfusion) coefficient λ²
    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn source(&self) -> SourceTerm {
        self.source
    }

    /// Check that the parameters are physically meaningful
    pub fn validate(&self) -> SolverResult<()> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(SolverError::invalid(format!(
                "Domain length must be positive and finite, got {}",
                self.length
            )));
        }
        if !self.decay.is_finite() {
            return Err(SolverError::invalid(format!(
                "Decay coefficient must be finite, got {}",
                self.decay
            )));
        }
        self.source.validate()
    }
}

impl Default for BioheatParameters {
    fn default() -> Self {
        Self::tissue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_tissue_preset() {
        let params = BioheatParameters::tissue();
        assert_eq!(params.length(), 1.0);
        assert_eq!(params.decay(), 2.7);
        assert_eq!(params.source(), SourceTerm::exponential(100.0, -1.0));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builders_leave_other_fields() {
        let params = BioheatParameters::tissue().with_decay(1.5).without_source();
        assert_eq!(params.decay(), 1.5);
        assert_eq!(params.length(), 1.0);
        assert!(!params.source().is_active());
    }

    #[test]
    fn test_invalid_length() {
        let err = BioheatParameters::tissue().with_length(0.0).validate().unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidConfiguration);

        let err = BioheatParameters::tissue()
            .with_length(f64::NAN)
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidConfiguration);
    }

    #[test]
    fn test_invalid_source() {
        let params = BioheatParameters::tissue().with_source(SourceTerm::exponential(f64::NAN, 1.0));
        assert!(params.validate().is_err());
    }
}
