//! Integration tests for the steady-state solvers
//!
//! Direct Crout solve and Gauss-Seidel / adaptive SOR on the assembled
//! bioheat systems.

use bioheat_rs::linalg::TridiagonalMatrix;
use bioheat_rs::physics::reference::hyperbolic_sine_profile;
use bioheat_rs::solver::{
    assemble_steady, steady_solver, DirectSolver, GaussSeidelSolver, LinearSystem, Relaxation,
    Scenario, Solver, SolverConfiguration,
};
use bioheat_rs::{FailureKind, SolverError};
use nalgebra::DVector;

mod common;
use common::{assert_vectors_close, exponential_source_profile, homogeneous_scenario, max_abs_diff};

#[test]
fn test_five_node_tissue_profile() {
    // 37 °C core, 32 °C skin, 37 °C artery: u(0) = 0, u(1) = -5
    let scenario = homogeneous_scenario(5, 0.0, -5.0);
    let solution = DirectSolver::new().solve_scenario(&scenario).unwrap();
    let exact = hyperbolic_sine_profile(&scenario.grid, 2.7, &scenario.boundaries);

    let error = max_abs_diff(&solution.values, &exact);
    println!("N = 5 max error: {:e}", error);
    assert!(error < 5e-3, "max error {}", error);

    // profile is monotone between the two boundary values
    for i in 1..5 {
        assert!(solution.values[i] < solution.values[i - 1]);
    }
    assert!(solution.values[0] < 0.0 && solution.values[4] > -5.0);
}

#[test]
fn test_direct_residual_is_small() {
    for n in [1, 5, 40, 320, 2000] {
        let scenario = Scenario::tissue(n).unwrap();
        let system = assemble_steady(&scenario).unwrap();
        let solution = DirectSolver::new().solve(&system).unwrap();

        let residual = system.matrix.residual_norm(&solution.values, &system.rhs).unwrap();
        assert!(residual < 1e-9, "N = {}: residual {:e}", n, residual);
        assert_eq!(solution.diagnostics.residual, residual);
    }
}

#[test]
fn test_direct_matches_dense_reference() {
    let scenario = Scenario::tissue(30).unwrap();
    let system = assemble_steady(&scenario).unwrap();

    let crout = DirectSolver::new().solve(&system).unwrap();
    let dense = system.matrix.to_dense().lu().solve(&system.rhs).unwrap();

    assert_vectors_close(&crout.values, &dense, 1e-10, "Crout vs dense LU");
}

#[test]
fn test_solution_is_unique_across_methods() {
    let scenario = Scenario::tissue(25).unwrap();

    let direct = DirectSolver::new().solve_scenario(&scenario).unwrap();
    let again = DirectSolver::new().solve_scenario(&scenario).unwrap();
    assert_eq!(direct.values, again.values);

    for relaxation in [Relaxation::Adaptive, Relaxation::Fixed(1.0), Relaxation::Fixed(1.5)] {
        let solver = GaussSeidelSolver::new(1e-12, 200_000, relaxation);
        let iterative = solver.solve_scenario(&scenario).unwrap();
        assert_vectors_close(
            &iterative.values,
            &direct.values,
            1e-8,
            &format!("{} ({:?})", solver.name(), relaxation),
        );
    }
}

#[test]
fn test_exponential_source_matches_closed_form() {
    let scenario = Scenario::tissue(320).unwrap();
    let solution = DirectSolver::new().solve_scenario(&scenario).unwrap();
    let exact = exponential_source_profile(&scenario);

    let error = max_abs_diff(&solution.values, &exact);
    assert!(error < 1e-4, "max error {}", error);
}

#[test]
fn test_adaptive_sor_beats_plain_gauss_seidel() {
    let scenario = homogeneous_scenario(40, 5.0, -5.0);

    let plain = steady_solver(&SolverConfiguration::iterative_with(1e-10, 100_000, Relaxation::Fixed(1.0)))
        .unwrap()
        .solve_scenario(&scenario)
        .unwrap();
    let adaptive = steady_solver(&SolverConfiguration::iterative(1e-10, 100_000))
        .unwrap()
        .solve_scenario(&scenario)
        .unwrap();

    println!(
        "plain: {} sweeps, adaptive: {} sweeps (mean ρ = {:?}, final W = {:?})",
        plain.diagnostics.iterations,
        adaptive.diagnostics.iterations,
        adaptive.diagnostics.mean_spectral_radius,
        adaptive.diagnostics.final_relaxation
    );
    assert!(adaptive.diagnostics.iterations <= plain.diagnostics.iterations);

    // plain Gauss-Seidel contracts monotonically on this system
    let norms = &plain.diagnostics.update_norms;
    assert!(norms.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn test_sweep_count_grows_with_grid_size() {
    let mut previous = 0;
    for n in [5, 10, 20, 40] {
        let solution = GaussSeidelSolver::default()
            .solve_scenario(&homogeneous_scenario(n, 5.0, -5.0))
            .unwrap();
        assert!(solution.diagnostics.iterations > previous);
        previous = solution.diagnostics.iterations;
    }
}

#[test]
fn test_zero_pivot_is_reported_not_propagated() {
    let matrix = TridiagonalMatrix::new(
        DVector::from_vec(vec![1.0, 1.0]),
        DVector::from_vec(vec![1.0, 1.0, 4.0]),
        DVector::from_vec(vec![1.0, 1.0]),
    )
    .unwrap();
    let system = LinearSystem::new(matrix, DVector::from_vec(vec![1.0, 2.0, 3.0])).unwrap();

    // l_11 = 1, u_12 = 1, l_22 = 1 - 1·1 = 0
    let err = DirectSolver::new().solve(&system).unwrap_err();
    match err {
        SolverError::SingularSystem { row, .. } => assert_eq!(row, 1),
        other => panic!("expected SingularSystem, got {:?}", other),
    }
}

#[test]
fn test_iteration_budget_exhaustion() {
    let err = GaussSeidelSolver::plain(1e-12, 10)
        .solve_scenario(&homogeneous_scenario(80, 5.0, -5.0))
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::NonConvergence);
    assert!(err.to_string().contains("did not converge after 10 iterations"));
}

#[test]
fn test_invalid_grid_rejected() {
    let err = Scenario::tissue(0).unwrap_err();
    assert_eq!(err.kind(), FailureKind::InvalidConfiguration);
}
