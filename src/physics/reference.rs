//! Closed-form reference profile of the homogeneous steady problem
//!
//! For S ≡ 0 and λ² > 0 the boundary-value problem
//!
//! ```text
//! u'' - λ² u = 0,   u(0) = a,   u(L) = b
//! ```
//!
//! has the exact solution
//!
//! ```text
//! u(x) = a · sinh(λ(L - x)) / sinh(λL) + b · sinh(λx) / sinh(λL)
//! ```
//!
//! The solvers never use it; it exists to measure discretization error.

use crate::solver::{DirichletBoundaries, Grid};
use nalgebra::DVector;

/// Exact homogeneous solution evaluated at `x` for decay coefficient `decay` (λ²)
///
/// Falls back to the linear profile when λ² = 0.
pub fn hyperbolic_sine_value(x: f64, length: f64, decay: f64, bc: &DirichletBoundaries) -> f64 {
    if decay == 0.0 {
        return bc.left + (bc.right - bc.left) * x / length;
    }
    let lambda = decay.sqrt();
    let denominator = (lambda * length).sinh();
    bc.left * (lambda * (length - x)).sinh() / denominator
        + bc.right * (lambda * x).sinh() / denominator
}

/// Exact homogeneous solution on every interior node of `grid`
pub fn hyperbolic_sine_profile(
    grid: &Grid,
    decay: f64,
    bc: &DirichletBoundaries,
) -> DVector<f64> {
    DVector::from_fn(grid.interior_nodes(), |i, _| {
        hyperbolic_sine_value(grid.position(i), grid.length(), decay, bc)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matches_boundaries() {
        let bc = DirichletBoundaries::new(2.0, -5.0);
        assert_relative_eq!(hyperbolic_sine_value(0.0, 1.0, 2.7, &bc), 2.0, epsilon = 1e-12);
        assert_relative_eq!(hyperbolic_sine_value(1.0, 1.0, 2.7, &bc), -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_sided_profile() {
        // a = 0 reduces to δ sinh(λx) / sinh(λL)
        let bc = DirichletBoundaries::new(0.0, -5.0);
        let lambda = 2.7f64.sqrt();
        let expected = -5.0 * (lambda * 0.5).sinh() / lambda.sinh();
        assert_relative_eq!(hyperbolic_sine_value(0.5, 1.0, 2.7, &bc), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_decay_is_linear() {
        let bc = DirichletBoundaries::new(1.0, 3.0);
        assert_relative_eq!(hyperbolic_sine_value(0.25, 1.0, 0.0, &bc), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_profile_on_grid() {
        let grid = Grid::new(1.0, 5).unwrap();
        let bc = DirichletBoundaries::tissue();
        let profile = hyperbolic_sine_profile(&grid, 2.7, &bc);
        assert_eq!(profile.len(), 5);
        // monotone from 0 down to -5
        for i in 1..profile.len() {
            assert!(profile[i] < profile[i - 1]);
        }
    }
}
