//! Dirichlet boundary values at the two ends of the domain
//!
//! # Convention
//!
//! The unknown of the bioheat equation is the temperature relative to the
//! arterial blood temperature. Boundary values are therefore stored as
//! deltas: `left = T(0) - T_artery`, `right = T(L) - T_artery`.

use crate::error::{SolverError, SolverResult};
use std::fmt;

/// Fixed values of the unknown at x = 0 and x = L
///
/// # Examples
///
/// ```rust
/// use bioheat_rs::solver::DirichletBoundaries;
///
/// // Core at 37 °C, surface at 32 °C, artery at 37 °C
/// let bc = DirichletBoundaries::from_temperatures(37.0, 32.0, 37.0);
/// assert_eq!(bc.left, 0.0);
/// assert_eq!(bc.right, -5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirichletBoundaries {
    /// Value at x = 0
    pub left: f64,

    /// Value at x = L
    pub right: f64,
}

impl DirichletBoundaries {
    /// Create boundaries from raw deltas
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Create boundaries from core, surface and arterial temperatures
    ///
    /// The core sits at x = 0, the surface at x = L.
    pub fn from_temperatures(core: f64, surface: f64, artery: f64) -> Self {
        Self::new(core - artery, surface - artery)
    }

    /// Tissue preset: core 37 °C, surface 32 °C, artery 37 °C
    pub fn tissue() -> Self {
        use crate::physics::parameters::{
            ARTERY_TEMPERATURE, CORE_TEMPERATURE, SURFACE_TEMPERATURE,
        };
        Self::from_temperatures(CORE_TEMPERATURE, SURFACE_TEMPERATURE, ARTERY_TEMPERATURE)
    }

    /// Both boundary values must be finite
    pub fn validate(&self) -> SolverResult<()> {
        if !self.left.is_finite() || !self.right.is_finite() {
            return Err(SolverError::invalid(format!(
                "Boundary values must be finite (left {}, right {})",
                self.left, self.right
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DirichletBoundaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u(0) = {}, u(L) = {}", self.left, self.right)
    }
}
