//! Helper functions for integration tests

use bioheat_rs::physics::reference::hyperbolic_sine_profile;
use bioheat_rs::physics::{BioheatParameters, SourceTerm};
use bioheat_rs::solver::{DirichletBoundaries, Scenario};
use nalgebra::DVector;

/// Assert that two vectors are close in the max norm
pub fn assert_vectors_close(v1: &DVector<f64>, v2: &DVector<f64>, tolerance: f64, message: &str) {
    assert_eq!(v1.len(), v2.len(), "{}: Dimension mismatch", message);

    for (i, (&a, &b)) in v1.iter().zip(v2.iter()).enumerate() {
        let diff = (a - b).abs();
        assert!(
            diff < tolerance,
            "{}: Element {} differs by {} (tolerance {})",
            message,
            i,
            diff,
            tolerance
        );
    }
}

/// Max absolute difference between two vectors of equal length
pub fn max_abs_diff(v1: &DVector<f64>, v2: &DVector<f64>) -> f64 {
    (v1 - v2).amax()
}

/// Homogeneous tissue problem (λ² = 2.7, no source) with the given boundaries
pub fn homogeneous_scenario(interior_nodes: usize, left: f64, right: f64) -> Scenario {
    Scenario::new(
        BioheatParameters::tissue().without_source(),
        DirichletBoundaries::new(left, right),
        interior_nodes,
    )
    .unwrap()
}

/// Exact solution of u'' - λ²u + σ·exp(γ(L - x)) = 0 with Dirichlet ends
///
/// Particular part C·exp(γ(L - x)) with C = σ / (λ² - γ²), plus the
/// homogeneous profile correcting the boundary values. Requires λ² ≠ γ².
pub fn exponential_source_profile(scenario: &Scenario) -> DVector<f64> {
    let params = &scenario.parameters;
    let length = params.length();
    let decay = params.decay();

    let particular = |x: f64| match params.source() {
        SourceTerm::None => 0.0,
        SourceTerm::Exponential {
            amplitude,
            exponent,
        } => amplitude / (decay - exponent * exponent) * (exponent * (length - x)).exp(),
    };

    let corrected = DirichletBoundaries::new(
        scenario.boundaries.left - particular(0.0),
        scenario.boundaries.right - particular(length),
    );
    let homogeneous = hyperbolic_sine_profile(&scenario.grid, decay, &corrected);

    DVector::from_fn(scenario.size(), |i, _| {
        particular(scenario.grid.position(i)) + homogeneous[i]
    })
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}
