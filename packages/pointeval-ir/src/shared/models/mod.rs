//! Shared domain models
//!
//! Core value types used by every feature:
//! - [`Ir`]: the two pointer-analysis frontends under comparison
//! - [`TableKey`]: identity of one (benchmark, analysis, IR) relation
//! - [`VariableKey`] / [`HeapObjectKey`]: the units of comparison
//! - [`PointsToRecord`]: one ingested points-to edge

pub mod error;

pub use error::{ErrorKind, EvalError, Result};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two IR frontends whose points-to output is being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ir {
    Soot,
    Wala,
}

impl Ir {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ir::Soot => "soot",
            Ir::Wala => "wala",
        }
    }

    /// Framework tag used by the class-inventory relation. The inventory
    /// was produced from Jimple for the Soot side, hence the different name.
    pub fn framework(&self) -> &'static str {
        match self {
            Ir::Soot => "jimple",
            Ir::Wala => "wala",
        }
    }

    pub fn other(&self) -> Ir {
        match self {
            Ir::Soot => Ir::Wala,
            Ir::Wala => Ir::Soot,
        }
    }
}

impl fmt::Display for Ir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Ir {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "soot" => Ok(Ir::Soot),
            "wala" => Ok(Ir::Wala),
            other => Err(EvalError::invalid_identifier(format!(
                "unknown IR '{other}' (expected 'soot' or 'wala')"
            ))),
        }
    }
}

/// Identity of one (benchmark, analysis, IR) combination.
///
/// Benchmark and analysis names become part of SQL table identifiers, so
/// they are restricted to `[A-Za-z0-9_]` at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableKey {
    pub benchmark: String,
    pub analysis: String,
    pub ir: Ir,
}

impl TableKey {
    pub fn new(benchmark: impl Into<String>, analysis: impl Into<String>, ir: Ir) -> Result<Self> {
        let benchmark = benchmark.into();
        let analysis = analysis.into();
        for name in [&benchmark, &analysis] {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(EvalError::invalid_identifier(format!(
                    "'{name}' is not a valid table-name component"
                )));
            }
        }
        Ok(Self {
            benchmark,
            analysis,
            ir,
        })
    }

    /// Name of the per-combination points-to table.
    pub fn points_to_table(&self) -> String {
        format!("{}_{}_{}", self.benchmark, self.analysis, self.ir)
    }

    /// Name of the per-combination virtual-call receiver table.
    pub fn virtual_call_table(&self) -> String {
        format!(
            "virtualcall_var_{}_{}_{}",
            self.benchmark, self.analysis, self.ir
        )
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.benchmark, self.analysis, self.ir)
    }
}

/// A variable occurrence under a context.
///
/// Cross-IR identity is by string equality of `var` only; context
/// encodings differ between the frontends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableKey {
    pub var_ctx: String,
    pub var: String,
}

impl VariableKey {
    pub fn new(var_ctx: impl Into<String>, var: impl Into<String>) -> Self {
        Self {
            var_ctx: var_ctx.into(),
            var: var.into(),
        }
    }
}

/// An abstract heap allocation site under a context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeapObjectKey {
    pub heap_ctx: String,
    pub heap_obj: String,
}

impl HeapObjectKey {
    pub fn new(heap_ctx: impl Into<String>, heap_obj: impl Into<String>) -> Self {
        Self {
            heap_ctx: heap_ctx.into(),
            heap_obj: heap_obj.into(),
        }
    }
}

/// One points-to edge as stored in the per-combination relation.
///
/// The first four columns come straight from the analysis log; the last
/// three are derived from the identifier grammar at ingest time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsToRecord {
    pub heap_ctx: String,
    pub heap_obj: String,
    pub var_ctx: String,
    pub var: String,
    pub heap_type: String,
    pub enclosing_method: String,
    pub var_type: String,
}
