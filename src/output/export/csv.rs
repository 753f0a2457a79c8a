//! CSV export of bioheat results
//!
//! Plain-text CSV readable by spreadsheets, pandas or gnuplot.
//!
//! # Files
//!
//! ## Steady profile
//!
//! ```csv
//! x,u,reference
//! 0.166667,-0.532113,-0.531021
//! ...
//! ```
//!
//! ## Trajectory
//!
//! One row per stored time level, one column per interior node:
//!
//! ```csv
//! t,u_0,u_1,u_2
//! 0.000000,-5.000000,-5.000000,-5.000000
//! 0.001000,-4.712093,-4.998301,-4.712093
//! ...
//! ```
//!
//! ## Study report
//!
//! ```csv
//! N,h,status,max_error,spectral_radius,iterations
//! 5,0.166667,ok,0.003301,,0
//! 0,1.000000,InvalidConfiguration,,,
//! ```
//!
//! # Metadata header
//!
//! With [`CsvConfig::with_metadata`] the file starts with `#` comment lines:
//!
//! ```csv
//! # Bioheat Simulation Data
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Solver: Crank-Nicolson
//! # Length: 1
//! # Decay: 2.7
//! #
//! ```

use crate::output::export::Exporter;
use crate::solver::{Scenario, SimulationResult};
use crate::study::StudyReport;
use nalgebra::DVector;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Failure while writing a CSV file
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("empty data: {0}")]
    EmptyData(&'static str),

    #[error("length mismatch in {column}: expected {expected} values, got {found}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid data: NaN or Inf detected in {0}")]
    NonFinite(String),
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use bioheat_rs::output::export::CsvConfig;
///
/// let config = CsvConfig::default().delimiter(';').precision(10);
/// assert_eq!(config.delimiter, ';');
/// ```
#[derive(Clone, Debug)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    pub metadata: Option<CsvMetadata>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
        }
    }
}

impl CsvConfig {
    /// Semicolon delimiter, comma as decimal separator
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// 12 decimal places
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only the fields that are set are written.
#[derive(Clone, Debug, Default)]
pub struct CsvMetadata {
    pub solver_name: Option<String>,

    /// Domain length L
    pub length: Option<f64>,

    /// λ²
    pub decay: Option<f64>,

    pub interior_nodes: Option<usize>,

    pub time_step: Option<f64>,

    pub steps: Option<usize>,

    /// Additional key/value pairs
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Metadata describing `scenario` solved by `solver`
    pub fn from_scenario(scenario: &Scenario, solver: &str) -> Self {
        Self {
            solver_name: Some(solver.to_string()),
            length: Some(scenario.parameters.length()),
            decay: Some(scenario.parameters.decay()),
            interior_nodes: Some(scenario.size()),
            custom: vec![("Boundaries".to_string(), scenario.boundaries.to_string())],
            ..Default::default()
        }
    }

    /// Add time-stepping information from a run
    pub fn with_simulation(mut self, result: &SimulationResult) -> Self {
        self.steps = Some(result.steps());
        self.time_step = result
            .metadata
            .get("time_step")
            .and_then(|dt| dt.parse().ok());
        self
    }

    pub fn add_custom(&mut self, key: &str, value: &str) {
        self.custom.push((key.to_string(), value.to_string()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header<W: Write>(out: &mut W, metadata: &CsvMetadata) -> Result<(), CsvError> {
    writeln!(out, "# Bioheat Simulation Data")?;
    writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(solver) = &metadata.solver_name {
        writeln!(out, "# Solver: {}", solver)?;
    }
    if let Some(length) = metadata.length {
        writeln!(out, "# Length: {}", length)?;
    }
    if let Some(decay) = metadata.decay {
        writeln!(out, "# Decay: {}", decay)?;
    }
    if let Some(nodes) = metadata.interior_nodes {
        writeln!(out, "# Interior Nodes: {}", nodes)?;
    }
    if let Some(dt) = metadata.time_step {
        writeln!(out, "# Time Step: {}", dt)?;
    }
    if let Some(steps) = metadata.steps {
        writeln!(out, "# Steps: {}", steps)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }
    writeln!(out, "#")?;
    Ok(())
}

fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);
    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

fn check_finite(values: &[f64], column: &str) -> Result<(), CsvError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CsvError::NonFinite(column.to_string()));
    }
    Ok(())
}

/// Row indices kept when downsampling `len` rows to `n_points`
///
/// The first and last rows are always kept.
pub fn downsample_indices(len: usize, n_points: Option<usize>) -> Vec<usize> {
    let n = match n_points {
        Some(n) if n < len => n.max(2),
        _ => return (0..len).collect(),
    };
    if len <= 2 {
        return (0..len).collect();
    }

    let mut indices: Vec<usize> = (0..n).map(|i| i * (len - 1) / (n - 1)).collect();
    indices.dedup();
    indices
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`]
///
/// # Example
///
/// ```rust
/// use bioheat_rs::output::export::{CsvExporter, Exporter};
/// use bioheat_rs::solver::{CrankNicolsonDriver, Scenario};
///
/// let scenario = Scenario::tissue(5).unwrap();
/// let result = CrankNicolsonDriver::new(1e-3, 1e-8, 100_000)
///     .run_uniform(&scenario, -5.0)
///     .unwrap();
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("trajectory.csv");
/// CsvExporter::default().export_trajectory(&result, Some(100), &path).unwrap();
/// ```
#[derive(Clone, Debug, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    fn create(&self, path: &Path) -> Result<BufWriter<File>, CsvError> {
        let mut out = BufWriter::new(File::create(path)?);
        if self.config.include_metadata
            && let Some(metadata) = &self.config.metadata
        {
            write_metadata_header(&mut out, metadata)?;
        }
        Ok(out)
    }

    fn write_row<W: Write>(&self, out: &mut W, cells: &[String]) -> Result<(), CsvError> {
        let delimiter = self.config.delimiter.to_string();
        writeln!(out, "{}", cells.join(&delimiter))?;
        Ok(())
    }

    fn number(&self, value: f64) -> String {
        format_number(value, &self.config)
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn export_profile(
        &self,
        positions: &DVector<f64>,
        values: &DVector<f64>,
        reference: Option<&DVector<f64>>,
        path: &Path,
    ) -> Result<(), CsvError> {
        if values.is_empty() {
            return Err(CsvError::EmptyData("profile has no values"));
        }
        if positions.len() != values.len() {
            return Err(CsvError::LengthMismatch {
                column: "x".to_string(),
                expected: values.len(),
                found: positions.len(),
            });
        }
        if let Some(reference) = reference
            && reference.len() != values.len()
        {
            return Err(CsvError::LengthMismatch {
                column: "reference".to_string(),
                expected: values.len(),
                found: reference.len(),
            });
        }
        check_finite(positions.as_slice(), "x")?;
        check_finite(values.as_slice(), "u")?;
        if let Some(reference) = reference {
            check_finite(reference.as_slice(), "reference")?;
        }

        let mut out = self.create(path)?;

        let mut header = vec!["x".to_string(), "u".to_string()];
        if reference.is_some() {
            header.push("reference".to_string());
        }
        self.write_row(&mut out, &header)?;

        for i in 0..values.len() {
            let mut row = vec![self.number(positions[i]), self.number(values[i])];
            if let Some(reference) = reference {
                row.push(self.number(reference[i]));
            }
            self.write_row(&mut out, &row)?;
        }

        out.flush()?;
        Ok(())
    }

    fn export_trajectory(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: &Path,
    ) -> Result<(), CsvError> {
        let states = result.trajectory.states();
        if states.is_empty() {
            return Err(CsvError::EmptyData("trajectory has no states"));
        }
        if result.time_points.len() != states.len() {
            return Err(CsvError::LengthMismatch {
                column: "t".to_string(),
                expected: states.len(),
                found: result.time_points.len(),
            });
        }
        check_finite(&result.time_points, "t")?;

        let nodes = states[0].len();
        for (level, state) in states.iter().enumerate() {
            if state.len() != nodes {
                return Err(CsvError::LengthMismatch {
                    column: format!("time level {}", level),
                    expected: nodes,
                    found: state.len(),
                });
            }
            check_finite(state.as_slice(), &format!("time level {}", level))?;
        }

        let mut out = self.create(path)?;

        let mut header = vec!["t".to_string()];
        header.extend((0..nodes).map(|i| format!("u_{}", i)));
        self.write_row(&mut out, &header)?;

        for level in downsample_indices(states.len(), n_points) {
            let mut row = Vec::with_capacity(nodes + 1);
            row.push(self.number(result.time_points[level]));
            row.extend(states[level].iter().map(|&v| self.number(v)));
            self.write_row(&mut out, &row)?;
        }

        out.flush()?;
        Ok(())
    }

    fn export_study(&self, report: &StudyReport, path: &Path) -> Result<(), CsvError> {
        if report.is_empty() {
            return Err(CsvError::EmptyData("study report has no configurations"));
        }

        let mut out = self.create(path)?;
        let header = ["N", "h", "status", "max_error", "spectral_radius", "iterations"];
        self.write_row(&mut out, &header.map(String::from))?;

        for outcome in report.outcomes.values() {
            let mut row = vec![outcome.interior_nodes.to_string(), self.number(outcome.step)];
            match &outcome.result {
                Ok(record) => {
                    row.push("ok".to_string());
                    row.push(record.max_error.map(|e| self.number(e)).unwrap_or_default());
                    row.push(
                        record
                            .mean_spectral_radius
                            .map(|rho| self.number(rho))
                            .unwrap_or_default(),
                    );
                    row.push(record.iterations.to_string());
                }
                Err(error) => {
                    row.push(error.kind().to_string());
                    row.extend([String::new(), String::new(), String::new()]);
                }
            }
            self.write_row(&mut out, &row)?;
        }

        out.flush()?;
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::BioheatParameters;
    use crate::solver::{CrankNicolsonDriver, DirichletBoundaries, SolverConfiguration};
    use crate::study::GridStudy;
    use std::fs;
    use tempfile::NamedTempFile;

    fn data_lines(content: &str) -> Vec<&str> {
        content.lines().filter(|l| !l.starts_with('#')).collect()
    }

    #[test]
    fn test_downsample_keeps_first_and_last() {
        let indices = downsample_indices(1001, Some(5));
        assert_eq!(indices, vec![0, 250, 500, 750, 1000]);

        assert_eq!(downsample_indices(4, None), vec![0, 1, 2, 3]);
        assert_eq!(downsample_indices(4, Some(10)), vec![0, 1, 2, 3]);
        assert_eq!(downsample_indices(10, Some(1)), vec![0, 9]);
        assert!(downsample_indices(0, Some(3)).is_empty());
    }

    #[test]
    fn test_export_profile_with_reference() {
        let file = NamedTempFile::new().unwrap();
        let x = DVector::from_vec(vec![0.25, 0.5, 0.75]);
        let u = DVector::from_vec(vec![-1.0, -2.0, -3.5]);
        let exact = DVector::from_vec(vec![-1.1, -2.1, -3.6]);

        CsvExporter::default()
            .export_profile(&x, &u, Some(&exact), file.path())
            .unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        let lines = data_lines(&content);
        assert_eq!(lines[0], "x,u,reference");
        assert_eq!(lines[1], "0.250000,-1.000000,-1.100000");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_export_profile_rejects_bad_data() {
        let file = NamedTempFile::new().unwrap();
        let exporter = CsvExporter::default();
        let x = DVector::from_vec(vec![0.25, 0.5]);

        let err = exporter
            .export_profile(&x, &DVector::from_vec(vec![1.0]), None, file.path())
            .unwrap_err();
        assert!(matches!(err, CsvError::LengthMismatch { .. }));

        let err = exporter
            .export_profile(&x, &DVector::from_vec(vec![1.0, f64::NAN]), None, file.path())
            .unwrap_err();
        assert!(matches!(err, CsvError::NonFinite(_)));

        let empty = DVector::<f64>::zeros(0);
        let err = exporter.export_profile(&empty, &empty, None, file.path()).unwrap_err();
        assert!(matches!(err, CsvError::EmptyData(_)));
    }

    #[test]
    fn test_european_format() {
        let file = NamedTempFile::new().unwrap();
        let x = DVector::from_vec(vec![0.5]);
        let u = DVector::from_vec(vec![-2.25]);

        CsvExporter::new(CsvConfig::european().precision(2))
            .export_profile(&x, &u, None, file.path())
            .unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(data_lines(&content), vec!["x;u", "0,50;-2,25"]);
    }

    #[test]
    fn test_export_trajectory_with_metadata() {
        let scenario = Scenario::tissue(4).unwrap();
        let driver = CrankNicolsonDriver::new(1e-3, 1e-8, 100_000);
        let result = driver.run_uniform(&scenario, -5.0).unwrap();

        let metadata = CsvMetadata::from_scenario(&scenario, driver.name()).with_simulation(&result);
        let exporter = CsvExporter::new(CsvConfig::default().with_metadata(metadata));

        let file = NamedTempFile::new().unwrap();
        exporter.export_trajectory(&result, Some(10), file.path()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with("# Bioheat Simulation Data"));
        assert!(content.contains("# Generated: "));
        assert!(content.contains("# Solver: Crank-Nicolson"));
        assert!(content.contains("# Time Step: 0.001"));
        assert!(content.contains(&format!("# Steps: {}", result.steps())));

        let lines = data_lines(&content);
        assert_eq!(lines[0], "t,u_0,u_1,u_2,u_3");
        assert_eq!(lines.len(), 11);
        assert!(lines[1].starts_with("0.000000,-5.000000"));

        let last_time = format!("{:.6}", result.time_points[result.steps()]);
        assert!(lines[10].starts_with(&last_time));
    }

    #[test]
    fn test_export_study_lists_failures() {
        let report = GridStudy::new(
            BioheatParameters::tissue().without_source(),
            DirichletBoundaries::tissue(),
            [0, 5],
            SolverConfiguration::direct(),
        )
        .with_hyperbolic_sine_reference()
        .run();

        let file = NamedTempFile::new().unwrap();
        CsvExporter::default().export_study(&report, file.path()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        let lines = data_lines(&content);
        assert_eq!(lines[0], "N,h,status,max_error,spectral_radius,iterations");
        assert_eq!(lines[1], "0,1.000000,InvalidConfiguration,,,");
        assert!(lines[2].starts_with("5,0.166667,ok,0.00"));
        assert!(lines[2].ends_with(",,0"));
    }
}
