//! Tabular flattening of result records

use serde::Serialize;

use crate::features::precision::{ClassHierarchyPrecisionResult, IrPrecisionResult};

/// A result that can flatten itself into one table row.
pub trait ReportRecord {
    fn header() -> Vec<&'static str>;
    fn fields(&self) -> Vec<String>;
}

/// One benchmark's result, tagged with the benchmark name.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkRow<T> {
    pub benchmark: String,
    #[serde(flatten)]
    pub result: T,
}

impl<T> BenchmarkRow<T> {
    pub fn new(benchmark: impl Into<String>, result: T) -> Self {
        Self {
            benchmark: benchmark.into(),
            result,
        }
    }
}

impl<T: ReportRecord> BenchmarkRow<T> {
    pub fn header() -> Vec<&'static str> {
        let mut header = vec!["benchmark"];
        header.extend(T::header());
        header
    }

    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.benchmark.clone()];
        fields.extend(self.result.fields());
        fields
    }
}

impl ReportRecord for IrPrecisionResult {
    fn header() -> Vec<&'static str> {
        vec![
            "interesting_types",
            "relevant_vars",
            "relevant_heap_objects",
            "vars",
            "heap_objects",
            "precision_ir",
            "precision_actual",
            "nb_virtual_calls",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.interesting_types.to_string(),
            self.relevant_vars.to_string(),
            self.relevant_heap_objects.to_string(),
            self.vars.to_string(),
            self.heap_objects.to_string(),
            self.precision_ir.to_string(),
            self.precision_actual.to_string(),
            self.nb_virtual_calls.to_string(),
        ]
    }
}

impl ReportRecord for ClassHierarchyPrecisionResult {
    fn header() -> Vec<&'static str> {
        vec![
            "ex_type",
            "ex_vars",
            "ex_heap_objs",
            "heap_objs",
            "variables",
            "precision",
            "precision_prev",
            "ex_vars_types",
        ]
    }

    fn fields(&self) -> Vec<String> {
        let types: Vec<&str> = self.ex_vars_types.iter().map(String::as_str).collect();
        vec![
            self.ex_type.to_string(),
            self.ex_vars.to_string(),
            self.ex_heap_objs.to_string(),
            self.heap_objs.to_string(),
            self.variables.to_string(),
            self.precision.to_string(),
            self.precision_prev.to_string(),
            types.join("|"),
        ]
    }
}
