//! Example: tissue temperature profile over a range of grids
//!
//! Reproduces the bioheat experiment set:
//!
//! - Homogeneous problem (no source), direct and adaptive SOR solves,
//!   compared against the sinh closed form
//! - Full problem with the exponential surface source, marched to steady
//!   state with Crank-Nicolson from a uniform -5 profile
//!
//! **Physical System**:
//! - Tissue slab of length L = 1, core at x = 0, skin at x = L
//! - Core 37 °C, skin 32 °C, arterial blood 37 °C
//! - Perfusion λ² = 2.7, source 100·exp(-(L - x))
//!
//! Run with `RUST_LOG=info cargo run --example grid_study` to see the
//! solver logs. CSV files are written to the system temp directory.

use bioheat_rs::{
    output::{CsvConfig, CsvExporter, CsvMetadata, Exporter},
    physics::parameters::{ARTERY_TEMPERATURE, CORE_TEMPERATURE, SURFACE_TEMPERATURE},
    physics::BioheatParameters,
    solver::{DirichletBoundaries, Scenario, SolverConfiguration, DEFAULT_TIME_STEP},
    study::GridStudy,
};

use std::time::Instant;

const GRID_SIZES: [usize; 7] = [5, 10, 20, 40, 80, 160, 320];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("═══════════════════════════════════════════════════════");
    println!("  Bioheat equation - grid study");
    println!("═══════════════════════════════════════════════════════\n");

    let boundaries =
        DirichletBoundaries::from_temperatures(CORE_TEMPERATURE, SURFACE_TEMPERATURE, ARTERY_TEMPERATURE);
    let tissue = BioheatParameters::tissue();
    let homogeneous = tissue.without_source();

    println!("Parameters:");
    println!("  L          : {}", tissue.length());
    println!("  λ²         : {}", tissue.decay());
    println!("  Boundaries : {}", boundaries);
    println!("  Grids      : {:?}\n", GRID_SIZES);

    let tmp_dir = std::env::temp_dir();
    let exporter = CsvExporter::default();

    // =============================================================================================
    // Steady homogeneous problem: direct vs adaptive SOR
    // =============================================================================================

    let configurations = [
        ("direct", SolverConfiguration::direct()),
        ("sor", SolverConfiguration::iterative(1e-12, 200_000)),
    ];

    for (label, configuration) in configurations {
        let started = Instant::now();
        let report = GridStudy::new(homogeneous, boundaries, GRID_SIZES, configuration)
            .with_hyperbolic_sine_reference()
            .run();
        println!("{}", report);
        println!("  elapsed: {:.3}s\n", started.elapsed().as_secs_f64());

        let path = tmp_dir.join(format!("bioheat_study_{}.csv", label));
        exporter.export_study(&report, &path)?;
        println!("  → {}\n", path.display());
    }

    // =============================================================================================
    // Transient problem with source: Crank-Nicolson to steady state
    // =============================================================================================

    let started = Instant::now();
    let report = GridStudy::new(
        tissue,
        boundaries,
        GRID_SIZES,
        SolverConfiguration::time_stepping(DEFAULT_TIME_STEP, 1e-12, 1_000_000),
    )
    .run();
    println!("{}", report);
    println!("  elapsed: {:.3}s\n", started.elapsed().as_secs_f64());

    if let Some(outcome) = report.get(40)
        && let Some(record) = outcome.record()
        && let Some(result) = &record.transient
    {
        let scenario = Scenario::new(tissue, boundaries, 40)?;
        let metadata = CsvMetadata::from_scenario(&scenario, "Crank-Nicolson").with_simulation(result);
        let trajectory_exporter = CsvExporter::new(CsvConfig::default().with_metadata(metadata));

        let trajectory_path = tmp_dir.join("bioheat_trajectory_40.csv");
        trajectory_exporter.export_trajectory(result, Some(500), &trajectory_path)?;

        let profile_path = tmp_dir.join("bioheat_profile_40.csv");
        exporter.export_profile(&scenario.grid.positions(), &record.solution, None, &profile_path)?;

        println!("  → {}", trajectory_path.display());
        println!("  → {}", profile_path.display());
    }

    Ok(())
}
