//! Precision computation over one (benchmark, analysis) pair
//!
//! Holds both IRs' tables and their virtual-call receiver variables,
//! plus a memoized interesting-method set shared by the per-IR
//! operations. All state is scoped to the instance; nothing is shared
//! across benchmarks.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::features::must_alias::MustAlias;
use crate::features::store::{
    exclusive_classes_soot, exclusive_classes_wala, is_exclusive_type, virtual_call_site_count,
    Store, VarPointsToTable, VirtualCallTable,
};
use crate::shared::models::{EvalError, HeapObjectKey, Ir, Result, TableKey, VariableKey};
use crate::shared::utils::identifiers::declared_type;

use super::super::domain::{ClassHierarchyPrecisionResult, IrPrecisionResult};

/// Precision engine for one benchmark under one analysis configuration.
pub struct ComputePrecision {
    store: Store,
    benchmark: String,
    analysis: String,
    soot_table: VarPointsToTable,
    wala_table: VarPointsToTable,
    soot_call_vars: FxHashSet<String>,
    wala_call_vars: FxHashSet<String>,
    /// Memoized interesting-method set. `None` means not yet computed;
    /// an empty computed set is a valid cached value and is kept.
    interesting_methods: Option<FxHashSet<String>>,
    output_dir: PathBuf,
}

impl ComputePrecision {
    pub fn new(store: Store, benchmark: &str, analysis: &str) -> Result<Self> {
        let soot_key = TableKey::new(benchmark, analysis, Ir::Soot)?;
        let wala_key = TableKey::new(benchmark, analysis, Ir::Wala)?;

        let soot_call_vars = VirtualCallTable::new(store.clone(), soot_key.clone()).variables();
        let wala_call_vars = VirtualCallTable::new(store.clone(), wala_key.clone()).variables();
        let soot_table = VarPointsToTable::new(store.clone(), soot_key);
        let wala_table = VarPointsToTable::new(store.clone(), wala_key);
        debug!(
            benchmark,
            analysis,
            soot_rows = soot_table.len(),
            wala_rows = wala_table.len(),
            "opened points-to tables"
        );

        Ok(Self {
            store,
            benchmark: benchmark.to_string(),
            analysis: analysis.to_string(),
            soot_table,
            wala_table,
            soot_call_vars,
            wala_call_vars,
            interesting_methods: None,
            output_dir: PathBuf::from("."),
        })
    }

    /// Redirect dump and log artifacts away from the working directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn benchmark(&self) -> &str {
        &self.benchmark
    }

    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    /// Must-alias partition for the Soot table.
    pub fn soot_must_alias(&self) -> Result<Vec<Vec<VariableKey>>> {
        let key = TableKey::new(&self.benchmark, &self.analysis, Ir::Soot)?;
        Ok(MustAlias::new(self.store.clone(), key).compute_must_alias())
    }

    /// Must-alias partition for the Wala table.
    pub fn wala_must_alias(&self) -> Result<Vec<Vec<VariableKey>>> {
        let key = TableKey::new(&self.benchmark, &self.analysis, Ir::Wala)?;
        Ok(MustAlias::new(self.store.clone(), key).compute_must_alias())
    }

    pub fn soot_ir_precision(&mut self) -> Result<IrPrecisionResult> {
        let methods = self.resolve_interesting_methods()?.clone();
        self.ir_precision(&methods, Ir::Soot)
    }

    pub fn wala_ir_precision(&mut self) -> Result<IrPrecisionResult> {
        let methods = self.resolve_interesting_methods()?.clone();
        self.ir_precision(&methods, Ir::Wala)
    }

    pub fn soot_class_hierarchy_precision(&self) -> ClassHierarchyPrecisionResult {
        let ex_types = exclusive_classes_soot(&self.store, &self.benchmark);
        self.class_hierarchy_precision(&ex_types, &self.soot_table, &self.soot_call_vars)
    }

    pub fn wala_class_hierarchy_precision(&self) -> ClassHierarchyPrecisionResult {
        let ex_types = exclusive_classes_wala(&self.store, &self.benchmark);
        self.class_hierarchy_precision(&ex_types, &self.wala_table, &self.wala_call_vars)
    }

    /// Compute the interesting-method set once and cache it for the
    /// lifetime of this instance.
    fn resolve_interesting_methods(&mut self) -> Result<&FxHashSet<String>> {
        if self.interesting_methods.is_none() {
            let methods = self.compute_interesting_methods()?;
            self.interesting_methods = Some(methods);
        }
        Ok(self.interesting_methods.get_or_insert_with(FxHashSet::default))
    }

    /// Methods present in both IRs (after stripping each IR's
    /// exclusive-class noise) whose distinct-variable counts differ.
    fn compute_interesting_methods(&self) -> Result<FxHashSet<String>> {
        let ex_class_soot = exclusive_classes_soot(&self.store, &self.benchmark);
        let ex_class_wala = exclusive_classes_wala(&self.store, &self.benchmark);

        let mut soot_methods = self.soot_table.enclosing_methods();
        soot_methods.retain(|m| !is_exclusive_type(m, &ex_class_soot));
        let mut wala_methods = self.wala_table.enclosing_methods();
        wala_methods.retain(|m| !is_exclusive_type(m, &ex_class_wala));

        let soot_counts = self.soot_table.variable_count_per_method();
        let wala_counts = self.wala_table.variable_count_per_method();

        let mut interesting = FxHashSet::default();
        for method in soot_methods.intersection(&wala_methods) {
            let soot_count = soot_counts.get(method).copied().unwrap_or(0);
            let wala_count = wala_counts.get(method).copied().unwrap_or(0);
            if soot_count != wala_count {
                interesting.insert(method.clone());
            }
        }
        info!(
            benchmark = %self.benchmark,
            soot_methods = soot_methods.len(),
            wala_methods = wala_methods.len(),
            interesting = interesting.len(),
            "resolved interesting methods"
        );

        self.write_var_types_log(Ir::Soot, &soot_counts)?;
        self.write_var_types_log(Ir::Wala, &wala_counts)?;
        Ok(interesting)
    }

    fn write_var_types_log(
        &self,
        ir: Ir,
        counts: &rustc_hash::FxHashMap<String, usize>,
    ) -> Result<()> {
        let dir = self.output_dir.join("logs");
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!(
            "{}_{}_{}_var_types.log",
            ir.as_str(),
            self.analysis,
            self.benchmark
        ));
        let mut sorted: Vec<(&String, &usize)> = counts.iter().collect();
        sorted.sort();
        let mut out = BufWriter::new(File::create(&path)?);
        for (method, count) in sorted {
            writeln!(out, "{method}:{count}")?;
        }
        out.flush()?;
        Ok(())
    }

    fn ir_precision(&self, methods: &FxHashSet<String>, ir: Ir) -> Result<IrPrecisionResult> {
        let (table, call_vars) = match ir {
            Ir::Soot => (&self.soot_table, &self.soot_call_vars),
            Ir::Wala => (&self.wala_table, &self.wala_call_vars),
        };

        let method_vars = table.variables_of_enclosing_methods(methods);
        let vars = select_virtual_call_variables(&method_vars, call_vars);
        let rel_heap_objs = table.heap_objects_for_variables(&vars);
        dump_heap_objects(
            &self.output_dir.join(format!("{}_{}.dump", self.benchmark, ir.as_str())),
            &rel_heap_objs,
        )?;

        // Fatal when zero: a benchmark with no virtual call sites is
        // broken input, not an empty dataset.
        let nb_virtual_calls = virtual_call_site_count(&self.store, table.key())?;
        let precision_ir = rel_heap_objs.len() as f64 / nb_virtual_calls as f64;

        let total_heap_objs = table.all_heap_ctx_pairs();
        let total_vars = table.all_variable_ctx_pairs();
        let precision_actual = if total_vars.is_empty() {
            0.0
        } else {
            total_heap_objs.len() as f64 / total_vars.len() as f64
        };

        let result = IrPrecisionResult {
            interesting_types: methods.len(),
            relevant_vars: vars.len(),
            relevant_heap_objects: rel_heap_objs.len(),
            vars: total_vars.len(),
            heap_objects: total_heap_objs.len(),
            precision_ir,
            precision_actual,
            nb_virtual_calls,
        };
        info!(benchmark = %self.benchmark, analysis = %self.analysis, ir = %ir,
              precision_ir, precision_actual, "ir precision");
        Ok(result)
    }

    fn class_hierarchy_precision(
        &self,
        ex_types: &FxHashSet<String>,
        table: &VarPointsToTable,
        call_vars: &FxHashSet<String>,
    ) -> ClassHierarchyPrecisionResult {
        let ex_class_vars = table.variables_by_enclosing_class(ex_types);
        let ex_vars = select_virtual_call_variables(&ex_class_vars, call_vars);
        let ex_heap_objs = table.heap_objects_for_variables(&ex_vars);

        let variables = select_virtual_call_variables(&table.all_variable_ctx_pairs(), call_vars);
        let heap_objs = table.heap_objects_for_variables(&variables);

        let precision_prev = if variables.is_empty() {
            0.0
        } else {
            heap_objs.len() as f64 / variables.len() as f64
        };
        // Counts are not guaranteed nested, so the corrections are done
        // in f64 rather than usize.
        let corrected_denominator = variables.len() as f64 - ex_vars.len() as f64;
        let precision = if corrected_denominator == 0.0 {
            0.0
        } else {
            (heap_objs.len() as f64 - ex_heap_objs.len() as f64) / corrected_denominator
        };

        let ex_vars_types: BTreeSet<String> = ex_vars
            .iter()
            .map(|v| declared_type(&v.var).to_string())
            .collect();

        ClassHierarchyPrecisionResult {
            ex_type: ex_types.len(),
            ex_vars: ex_vars.len(),
            ex_heap_objs: ex_heap_objs.len(),
            heap_objs: heap_objs.len(),
            variables: variables.len(),
            precision,
            precision_prev,
            ex_vars_types,
        }
    }
}

/// Keep only the (varCtx, var) pairs whose variable name is a
/// virtual-call receiver.
pub fn select_virtual_call_variables(
    vars: &FxHashSet<VariableKey>,
    call_vars: &FxHashSet<String>,
) -> FxHashSet<VariableKey> {
    vars.iter()
        .filter(|v| call_vars.contains(&v.var))
        .cloned()
        .collect()
}

/// Write the de-duplicated heap objects, one tab-separated pair per
/// line, as an auditable trace of what was counted.
fn dump_heap_objects(path: &Path, heap_objs: &[HeapObjectKey]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let deduped: BTreeSet<&HeapObjectKey> = heap_objs.iter().collect();
    let mut out = BufWriter::new(File::create(path).map_err(|e| {
        EvalError::io(format!("cannot create dump file {}", path.display())).with_source(e)
    })?);
    for obj in deduped {
        writeln!(out, "{}\t{}", obj.heap_ctx, obj.heap_obj)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::store::ingest::{
        create_points_to_table, create_virtual_call_table, derive_record,
        insert_points_to_records, insert_virtual_call_rows,
    };
    use crate::features::store::{insert_classes, record_virtual_call_site_count};
    use tempfile::TempDir;

    fn seed_table(store: &Store, key: &TableKey, rows: &[(&str, &str, &str, &str)]) {
        create_points_to_table(store, key).unwrap();
        let records: Vec<_> = rows
            .iter()
            .map(|(hc, ho, vc, v)| derive_record(hc, ho, vc, v))
            .collect();
        insert_points_to_records(store, key, &records).unwrap();
    }

    fn seed_call_vars(store: &Store, key: &TableKey, vars: &[&str]) {
        create_virtual_call_table(store, key).unwrap();
        let rows: Vec<(String, String)> = vars
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("site{i}"), v.to_string()))
            .collect();
        insert_virtual_call_rows(store, key, &rows).unwrap();
    }

    /// Both IRs agree on one method, disagree on another.
    fn fixture(out: &TempDir) -> ComputePrecision {
        let store = Store::in_memory().unwrap();
        let soot = TableKey::new("toy", "insens", Ir::Soot).unwrap();
        let wala = TableKey::new("toy", "insens", Ir::Wala).unwrap();

        seed_table(
            &store,
            &soot,
            &[
                ("hc1", "<A>/new A/0", "c", "<A: void same()>/r0"),
                ("hc2", "<B>/new B/0", "c", "<A: void diff()>/r0"),
                ("hc3", "<C>/new C/0", "c", "<A: void diff()>/r1"),
            ],
        );
        seed_table(
            &store,
            &wala,
            &[
                ("hc1", "<A>/new A/0", "c", "<A: void same()>/v0"),
                ("hc2", "<B>/new B/0", "c", "<A: void diff()>/v0"),
            ],
        );
        seed_call_vars(
            &store,
            &soot,
            &["<A: void diff()>/r0", "<A: void diff()>/r1"],
        );
        seed_call_vars(&store, &wala, &["<A: void diff()>/v0"]);
        record_virtual_call_site_count(&store, &soot, 2).unwrap();
        record_virtual_call_site_count(&store, &wala, 1).unwrap();

        ComputePrecision::new(store, "toy", "insens")
            .unwrap()
            .with_output_dir(out.path())
    }

    #[test]
    fn test_ir_precision_counts_and_ratios() {
        let out = TempDir::new().unwrap();
        let mut cp = fixture(&out);
        let res = cp.soot_ir_precision().unwrap();

        // "A: void diff()" has 2 soot vars vs 1 wala var; "A: void same()"
        // has 1 vs 1 and is not interesting.
        assert_eq!(res.interesting_types, 1);
        assert_eq!(res.relevant_vars, 2);
        assert_eq!(res.relevant_heap_objects, 2);
        assert_eq!(res.vars, 3);
        assert_eq!(res.heap_objects, 3);
        assert_eq!(res.nb_virtual_calls, 2);
        assert_eq!(res.precision_ir, 1.0);
        assert_eq!(res.precision_actual, 1.0);
    }

    #[test]
    fn test_zero_call_sites_is_fatal() {
        let out = TempDir::new().unwrap();
        let store = Store::in_memory().unwrap();
        let soot = TableKey::new("toy", "insens", Ir::Soot).unwrap();
        let wala = TableKey::new("toy", "insens", Ir::Wala).unwrap();
        seed_table(&store, &soot, &[("hc", "<A>/new A/0", "c", "<A: void m()>/r0")]);
        seed_table(&store, &wala, &[("hc", "<A>/new A/0", "c", "<A: void m()>/v0")]);
        // No call-site count recorded for soot.
        let mut cp = ComputePrecision::new(store, "toy", "insens")
            .unwrap()
            .with_output_dir(out.path());
        let err = cp.soot_ir_precision().unwrap_err();
        assert_eq!(err.kind, crate::shared::models::ErrorKind::ZeroCallSites);
    }

    #[test]
    fn test_dump_file_is_deduplicated() {
        let out = TempDir::new().unwrap();
        let store = Store::in_memory().unwrap();
        let soot = TableKey::new("toy", "insens", Ir::Soot).unwrap();
        let wala = TableKey::new("toy", "insens", Ir::Wala).unwrap();
        // Same heap object twice for the receiver variable, and a
        // differing variable count (1 vs 2) to make the method
        // interesting.
        seed_table(
            &store,
            &soot,
            &[
                ("hc", "<A>/new A/0", "c1", "<A: void m()>/r0"),
                ("hc", "<A>/new A/0", "c2", "<A: void m()>/r0"),
            ],
        );
        seed_table(
            &store,
            &wala,
            &[
                ("hc", "<A>/new A/0", "c1", "<A: void m()>/v0"),
                ("hc", "<A>/new A/0", "c1", "<A: void m()>/v1"),
            ],
        );
        seed_call_vars(&store, &soot, &["<A: void m()>/r0"]);
        seed_call_vars(&store, &wala, &["<A: void m()>/v0"]);
        record_virtual_call_site_count(&store, &soot, 1).unwrap();
        record_virtual_call_site_count(&store, &wala, 1).unwrap();

        let mut cp = ComputePrecision::new(store, "toy", "insens")
            .unwrap()
            .with_output_dir(out.path());
        let res = cp.soot_ir_precision().unwrap();
        // The ratio keeps the duplicates
        assert_eq!(res.relevant_heap_objects, 2);
        // but the dump does not.
        let dump = std::fs::read_to_string(out.path().join("toy_soot.dump")).unwrap();
        assert_eq!(dump.lines().count(), 1);
        assert_eq!(dump.trim(), "hc\t<A>/new A/0");
    }

    #[test]
    fn test_interesting_methods_computed_once() {
        let out = TempDir::new().unwrap();
        let mut cp = fixture(&out);
        cp.soot_ir_precision().unwrap();

        let log = out.path().join("logs/soot_insens_toy_var_types.log");
        assert!(log.exists());
        std::fs::remove_file(&log).unwrap();

        // Second call reuses the cache, so the log is not rewritten.
        cp.wala_ir_precision().unwrap();
        assert!(!log.exists());
    }

    #[test]
    fn test_ch_precision_no_exclusions_matches_baseline() {
        let out = TempDir::new().unwrap();
        let cp = fixture(&out);
        // class_info is empty: nothing is exclusive for either IR.
        let res = cp.soot_class_hierarchy_precision();
        assert_eq!(res.ex_type, 0);
        assert_eq!(res.ex_vars, 0);
        assert_eq!(res.ex_heap_objs, 0);
        assert_eq!(res.precision, res.precision_prev);
        assert!(res.ex_vars_types.is_empty());
    }

    #[test]
    fn test_ch_precision_corrects_for_exclusive_classes() {
        let out = TempDir::new().unwrap();
        let store = Store::in_memory().unwrap();
        let soot = TableKey::new("toy", "insens", Ir::Soot).unwrap();
        let wala = TableKey::new("toy", "insens", Ir::Wala).unwrap();
        // "Only" shows up in the jimple inventory but not the wala one.
        insert_classes(&store, "toy", "jimple", ["Only", "Both"]).unwrap();
        insert_classes(&store, "toy", "wala", ["Both"]).unwrap();

        seed_table(
            &store,
            &soot,
            &[
                ("hc1", "<A>/new A/0", "c", "<Only: void m()>/r0"),
                ("hc2", "<B>/new B/0", "c", "<Both: void n()>/r1"),
            ],
        );
        seed_table(&store, &wala, &[("hc1", "<A>/new A/0", "c", "<Both: void n()>/v0")]);
        seed_call_vars(
            &store,
            &soot,
            &["<Only: void m()>/r0", "<Both: void n()>/r1"],
        );
        seed_call_vars(&store, &wala, &["<Both: void n()>/v0"]);
        record_virtual_call_site_count(&store, &soot, 2).unwrap();
        record_virtual_call_site_count(&store, &wala, 1).unwrap();

        let cp = ComputePrecision::new(store, "toy", "insens")
            .unwrap()
            .with_output_dir(out.path());
        let res = cp.soot_class_hierarchy_precision();
        assert_eq!(res.ex_type, 1);
        assert_eq!(res.ex_vars, 1);
        assert_eq!(res.ex_heap_objs, 1);
        assert_eq!(res.variables, 2);
        assert_eq!(res.heap_objs, 2);
        assert_eq!(res.precision_prev, 1.0);
        // (2 - 1) / (2 - 1)
        assert_eq!(res.precision, 1.0);
        assert!(res.ex_vars_types.contains("Only"));
    }
}
