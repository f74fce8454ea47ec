//! Error types for pointeval-ir
//!
//! One unified error across store, ingestion, analysis and reporting.
//! Most store-level failures never surface here: the accessor layer
//! degrades them to empty results so a single broken benchmark/IR pair
//! cannot abort a whole sweep. The exceptions are listed per kind below.

use std::fmt;
use thiserror::Error;

/// Error kind categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Database errors (schema creation, inserts, opening the store)
    Database,
    /// Log-file ingestion errors
    Ingest,
    /// I/O errors (dump files, diagnostic logs)
    IO,
    /// Report generation errors (CSV, JSON, text tables)
    Report,
    /// A benchmark/analysis/IR name that is not a valid table identifier
    InvalidIdentifier,
    /// The external virtual-call-site count is zero or missing.
    /// Never valid for benchmarks with virtual calls; signals corrupted
    /// input data, so this one is fatal and must propagate.
    ZeroCallSites,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Database => "database",
            ErrorKind::Ingest => "ingest",
            ErrorKind::IO => "io",
            ErrorKind::Report => "report",
            ErrorKind::InvalidIdentifier => "invalid_identifier",
            ErrorKind::ZeroCallSites => "zero_call_sites",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct EvalError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn ingest(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Ingest, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IO, message)
    }

    pub fn report(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Report, message)
    }

    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidIdentifier, message)
    }

    pub fn zero_call_sites(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ZeroCallSites, message)
    }
}

impl From<rusqlite::Error> for EvalError {
    fn from(e: rusqlite::Error) -> Self {
        EvalError::database(e.to_string()).with_source(e)
    }
}

impl From<std::io::Error> for EvalError {
    fn from(e: std::io::Error) -> Self {
        EvalError::io(e.to_string()).with_source(e)
    }
}

impl From<csv::Error> for EvalError {
    fn from(e: csv::Error) -> Self {
        EvalError::report(e.to_string()).with_source(e)
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(e: serde_json::Error) -> Self {
        EvalError::report(e.to_string()).with_source(e)
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EvalError>;
