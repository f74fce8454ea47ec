//! Typed query surface over one (benchmark, analysis, IR) points-to table
//!
//! Every query degrades gracefully: a missing table or a failed statement
//! is logged and yields an empty result, so sparse benchmark-IR
//! combinations never abort a sweep (they show up as zero-valued metrics
//! instead).
//!
//! All membership filters are parameterized. An empty filter set
//! short-circuits without touching the database, and large sets are
//! chunked under SQLite's bound-parameter limit; callers can (and must)
//! batch instead of looping per variable.

use rusqlite::{params_from_iter, Connection};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use crate::features::store::Store;
use crate::shared::models::{HeapObjectKey, TableKey, VariableKey};

/// Upper bound on bound parameters per statement, kept well under
/// SQLite's default limit so pair filters (two parameters per element)
/// stay safe too.
const MAX_PARAMS_PER_QUERY: usize = 900;

/// Accessor for one per-combination points-to relation.
pub struct VarPointsToTable {
    store: Store,
    key: TableKey,
    table: String,
}

impl VarPointsToTable {
    pub fn new(store: Store, key: TableKey) -> Self {
        let table = key.points_to_table();
        Self { store, key, table }
    }

    pub fn key(&self) -> &TableKey {
        &self.key
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Run a query against this table, degrading any failure (including a
    /// missing table) to `T::default()` with a warning.
    fn guarded<T: Default>(
        &self,
        op: &str,
        run: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> T {
        if !self.store.table_exists(&self.table) {
            warn!(table = %self.table, op, "table missing; returning empty result");
            return T::default();
        }
        let conn = self.store.conn();
        match run(&conn) {
            Ok(value) => value,
            Err(e) => {
                warn!(table = %self.table, op, error = %e, "query failed; returning empty result");
                T::default()
            }
        }
    }

    /// Number of points-to rows.
    pub fn len(&self) -> usize {
        self.guarded("len", |conn| {
            let sql = format!("SELECT count(*) FROM \"{}\"", self.table);
            let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct heap types observed in this table.
    pub fn heap_types(&self) -> FxHashSet<String> {
        self.distinct_column("heapType")
    }

    /// Distinct enclosing methods observed among variables.
    pub fn enclosing_methods(&self) -> FxHashSet<String> {
        self.distinct_column("enclosingMethod")
    }

    fn distinct_column(&self, column: &str) -> FxHashSet<String> {
        self.guarded(column, |conn| {
            let sql = format!("SELECT DISTINCT {column} FROM \"{}\"", self.table);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<FxHashSet<_>>>()?;
            Ok(rows)
        })
    }

    /// All (varCtx, var) pairs.
    pub fn all_variable_ctx_pairs(&self) -> FxHashSet<VariableKey> {
        self.guarded("all_variable_ctx_pairs", |conn| {
            let sql = format!("SELECT varCtx, var FROM \"{}\"", self.table);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| Ok(VariableKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                .collect::<rusqlite::Result<FxHashSet<_>>>()?;
            Ok(rows)
        })
    }

    /// All (heapCtx, heapObj) pairs. Duplicates are preserved; callers
    /// dedupe when they need a universe.
    pub fn all_heap_ctx_pairs(&self) -> Vec<HeapObjectKey> {
        self.guarded("all_heap_ctx_pairs", |conn| {
            let sql = format!("SELECT heapCtx, heapObj FROM \"{}\"", self.table);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(HeapObjectKey::new(
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Variables whose enclosing method is in `methods`.
    pub fn variables_of_enclosing_methods(
        &self,
        methods: &FxHashSet<String>,
    ) -> FxHashSet<VariableKey> {
        self.variables_matching("enclosingMethod", methods)
    }

    /// Variables whose declared type is in `classes`.
    pub fn variables_by_enclosing_class(
        &self,
        classes: &FxHashSet<String>,
    ) -> FxHashSet<VariableKey> {
        self.variables_matching("varType", classes)
    }

    /// Membership filter over one column. Handles the empty set (no
    /// query), singletons, and sets beyond the parameter limit (chunked)
    /// uniformly.
    fn variables_matching(
        &self,
        column: &'static str,
        values: &FxHashSet<String>,
    ) -> FxHashSet<VariableKey> {
        if values.is_empty() {
            return FxHashSet::default();
        }
        let mut sorted: Vec<&String> = values.iter().collect();
        sorted.sort();

        let mut out = FxHashSet::default();
        for chunk in sorted.chunks(MAX_PARAMS_PER_QUERY) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT varCtx, var FROM \"{}\" WHERE {column} IN ({placeholders})",
                self.table
            );
            let rows: Vec<VariableKey> = self.guarded(column, |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params_from_iter(chunk.iter().map(|s| s.as_str())), |row| {
                        Ok(VariableKey::new(
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                        ))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            });
            out.extend(rows);
        }
        out
    }

    /// Per-method distinct-variable counts.
    pub fn variable_count_per_method(&self) -> FxHashMap<String, usize> {
        self.guarded("variable_count_per_method", |conn| {
            let sql = format!(
                "SELECT enclosingMethod, count(DISTINCT var) FROM \"{}\" GROUP BY enclosingMethod",
                self.table
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
                })?
                .collect::<rusqlite::Result<FxHashMap<_, _>>>()?;
            Ok(rows)
        })
    }

    /// Heap objects reachable from any of `vars`, excluding the abstract
    /// "null" object (any heap object whose identifier contains "null",
    /// which would inflate counts without representing an allocation).
    ///
    /// Duplicate rows are preserved. Variables are matched as exact
    /// (varCtx, var) pairs.
    pub fn heap_objects_for_variables(&self, vars: &FxHashSet<VariableKey>) -> Vec<HeapObjectKey> {
        if vars.is_empty() {
            return Vec::new();
        }
        let mut sorted: Vec<&VariableKey> = vars.iter().collect();
        sorted.sort();

        let mut out = Vec::new();
        for chunk in sorted.chunks(MAX_PARAMS_PER_QUERY / 2) {
            let tuples = vec!["(?, ?)"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT heapCtx, heapObj FROM \"{}\" \
                 WHERE (varCtx, var) IN (VALUES {tuples}) \
                 AND heapObj NOT LIKE '%null%'",
                self.table
            );
            let params = chunk
                .iter()
                .flat_map(|v| [v.var_ctx.as_str(), v.var.as_str()]);
            let rows: Vec<HeapObjectKey> = self.guarded("heap_objects_for_variables", |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params_from_iter(params), |row| {
                        Ok(HeapObjectKey::new(
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                        ))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            });
            out.extend(rows);
        }
        out
    }

    /// Full relation in stable (var, varCtx) order, the single pass the
    /// must-alias engine builds its points-to map from. The explicit
    /// ordering makes the alias partition independent of insertion order.
    pub fn rows_ordered(&self) -> Vec<(VariableKey, HeapObjectKey)> {
        self.guarded("rows_ordered", |conn| {
            let sql = format!(
                "SELECT varCtx, var, heapCtx, heapObj FROM \"{}\" ORDER BY var ASC, varCtx ASC",
                self.table
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        VariableKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?),
                        HeapObjectKey::new(row.get::<_, String>(2)?, row.get::<_, String>(3)?),
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }
}
