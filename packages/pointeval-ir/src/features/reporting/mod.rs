//! Report generation
//!
//! Writes precision results in multiple formats: CSV, JSON, plain-text
//! tables.

pub mod csv;
pub mod json;
pub mod record;
pub mod terminal;

pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use record::{BenchmarkRow, ReportRecord};
pub use terminal::TerminalReporter;
