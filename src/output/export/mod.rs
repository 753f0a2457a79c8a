//! Export module for solver results.
//!
//! # Architecture
//!
//! The [`Exporter`] trait abstracts the file format. Each format is an
//! independent implementation in its own sub-module.
//!
//! # Available formats
//!
//! | Format  | Module  |
//! |---------|---------|
//! | CSV     | [`csv`] |
//!
//! # Usage example
//!
//! ```rust,no_run
//! use bioheat_rs::output::export::{CsvExporter, Exporter};
//! use bioheat_rs::solver::{DirectSolver, Scenario, Solver};
//! use std::path::Path;
//!
//! let scenario = Scenario::tissue(40).unwrap();
//! let solution = DirectSolver::new().solve_scenario(&scenario).unwrap();
//!
//! CsvExporter::default()
//!     .export_profile(&scenario.grid.positions(), &solution.values, None, Path::new("profile.csv"))
//!     .unwrap();
//! ```

pub mod csv;

pub use csv::{downsample_indices, CsvConfig, CsvError, CsvExporter, CsvMetadata};

use crate::solver::SimulationResult;
use crate::study::StudyReport;
use nalgebra::DVector;
use std::path::Path;

/// Abstraction trait for all export formats.
///
/// # Parameter `n_points`
///
/// - `None`: exports every time level
/// - `Some(n)`: uniformly downsamples to `n` levels, always keeping the
///   first and the last one
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Exports a steady profile: positions, values and an optional reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns differ in length, contain NaN/Inf,
    /// are empty, or the file cannot be written.
    fn export_profile(
        &self,
        positions: &DVector<f64>,
        values: &DVector<f64>,
        reference: Option<&DVector<f64>>,
        path: &Path,
    ) -> Result<(), Self::Error>;

    /// Exports a time-stepping trajectory, one row per time level.
    fn export_trajectory(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: &Path,
    ) -> Result<(), Self::Error>;

    /// Exports one row per configuration of a grid study.
    fn export_study(&self, report: &StudyReport, path: &Path) -> Result<(), Self::Error>;
}
