//! Precision result records
//!
//! Pure output values. Constructed once by the engine, then serialized
//! by the reporting layer; no identity, no mutation after construction.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one IR-precision computation over a single table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrPrecisionResult {
    /// Methods whose distinct-variable counts differ between the IRs.
    pub interesting_types: usize,
    /// Virtual-call receiver variables enclosed in those methods.
    pub relevant_vars: usize,
    /// Heap objects reachable from the relevant variables, null-filtered,
    /// duplicates counted.
    pub relevant_heap_objects: usize,
    /// All (varCtx, var) pairs in the table.
    pub vars: usize,
    /// All (heapCtx, heapObj) pairs in the table, duplicates counted.
    pub heap_objects: usize,
    /// relevant_heap_objects / nb_virtual_calls.
    pub precision_ir: f64,
    /// heap_objects / vars, 0 when the table is empty.
    pub precision_actual: f64,
    /// External virtual-call-site count the ratio was taken against.
    pub nb_virtual_calls: u64,
}

/// Outcome of one class-hierarchy-exclusion precision computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassHierarchyPrecisionResult {
    /// Classes exclusive to this IR's output.
    pub ex_type: usize,
    /// Virtual-call receiver variables declared with an exclusive class.
    pub ex_vars: usize,
    /// Heap objects reachable from the exclusive variables.
    pub ex_heap_objs: usize,
    /// Heap objects reachable from all receiver variables.
    pub heap_objs: usize,
    /// All virtual-call receiver variables.
    pub variables: usize,
    /// (heap_objs - ex_heap_objs) / (variables - ex_vars), 0 when the
    /// corrected denominator is zero.
    pub precision: f64,
    /// heap_objs / variables, uncorrected baseline.
    pub precision_prev: f64,
    /// Declared types that drove the exclusion, for diagnostics.
    pub ex_vars_types: BTreeSet<String>,
}

fn write_count(f: &mut fmt::Formatter<'_>, name: &str, value: usize) -> fmt::Result {
    writeln!(f, "{name:<25} {value}")
}

fn write_ratio(f: &mut fmt::Formatter<'_>, name: &str, value: f64) -> fmt::Result {
    writeln!(f, "{name:<25} {value:.2}")
}

impl fmt::Display for IrPrecisionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_count(f, "interesting_types", self.interesting_types)?;
        write_count(f, "relevant_vars", self.relevant_vars)?;
        write_count(f, "relevant_heap_objects", self.relevant_heap_objects)?;
        write_count(f, "vars", self.vars)?;
        write_count(f, "heap_objects", self.heap_objects)?;
        write_ratio(f, "precision_ir", self.precision_ir)?;
        write_ratio(f, "precision_actual", self.precision_actual)?;
        write_count(f, "nb_virtual_calls", self.nb_virtual_calls as usize)
    }
}

impl fmt::Display for ClassHierarchyPrecisionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_count(f, "ex_type", self.ex_type)?;
        write_count(f, "ex_vars", self.ex_vars)?;
        write_count(f, "ex_heap_objs", self.ex_heap_objs)?;
        write_count(f, "heap_objs", self.heap_objs)?;
        write_count(f, "variables", self.variables)?;
        write_ratio(f, "precision", self.precision)?;
        write_ratio(f, "precision_prev", self.precision_prev)?;
        let types: Vec<&str> = self.ex_vars_types.iter().map(String::as_str).collect();
        writeln!(f, "{:<25} {}", "ex_vars_types", types.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_ratios_with_two_decimals() {
        let result = IrPrecisionResult {
            interesting_types: 3,
            relevant_vars: 10,
            relevant_heap_objects: 7,
            vars: 100,
            heap_objects: 50,
            precision_ir: 0.5,
            precision_actual: 0.333333,
            nb_virtual_calls: 14,
        };
        let text = result.to_string();
        assert!(text.contains("precision_ir              0.50"));
        assert!(text.contains("precision_actual          0.33"));
    }

    #[test]
    fn test_ch_display_joins_types() {
        let result = ClassHierarchyPrecisionResult {
            ex_type: 1,
            ex_vars: 2,
            ex_heap_objs: 3,
            heap_objs: 9,
            variables: 6,
            precision: 1.5,
            precision_prev: 1.5,
            ex_vars_types: ["A".to_string(), "B".to_string()].into_iter().collect(),
        };
        assert!(result.to_string().contains("A|B"));
    }
}
