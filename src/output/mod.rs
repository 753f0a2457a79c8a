//! Output module for solver results
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs       ← This file
//! └── export/      ← Data export
//!     ├── mod.rs   ← Exporter trait
//!     └── csv.rs
//! ```
//!
//! Exported files are meant for external plotting and analysis; the crate
//! itself does not draw anything.

pub mod export;

pub use export::{CsvConfig, CsvError, CsvExporter, CsvMetadata, Exporter};
