//! Virtual-call receiver variables and call-site totals
//!
//! Two relations back this module:
//! - the per-combination `virtualcall_var_*` table of (site, receiver)
//!   pairs, from which the receiver-variable set is read;
//! - `virtual_call_stats`, the externally sourced total number of virtual
//!   call sites per (benchmark, analysis, IR).
//!
//! Receiver variables are plain variable identifiers, not
//! context-qualified: the precision engine filters (varCtx, var) pairs by
//! the `var` component alone.

use rusqlite::{params, OptionalExtension};
use rustc_hash::FxHashSet;
use tracing::warn;

use crate::features::store::Store;
use crate::shared::models::{EvalError, Result, TableKey};

/// Accessor for one per-combination virtual-call receiver table.
pub struct VirtualCallTable {
    store: Store,
    key: TableKey,
    table: String,
}

impl VirtualCallTable {
    pub fn new(store: Store, key: TableKey) -> Self {
        let table = key.virtual_call_table();
        Self { store, key, table }
    }

    pub fn key(&self) -> &TableKey {
        &self.key
    }

    /// Distinct receiver variables at dynamically dispatched call sites.
    /// Missing table degrades to an empty set with a warning.
    pub fn variables(&self) -> FxHashSet<String> {
        if !self.store.table_exists(&self.table) {
            warn!(table = %self.table, "virtual-call table missing; returning empty set");
            return FxHashSet::default();
        }
        let conn = self.store.conn();
        let sql = format!("SELECT DISTINCT virtualVar FROM \"{}\"", self.table);
        let run = || -> rusqlite::Result<FxHashSet<String>> {
            let mut stmt = conn.prepare(&sql)?;
            let vars = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<FxHashSet<_>>>()?;
            Ok(vars)
        };
        match run() {
            Ok(vars) => vars,
            Err(e) => {
                warn!(table = %self.table, error = %e, "query failed; returning empty set");
                FxHashSet::default()
            }
        }
    }
}

/// Total number of virtual call sites for one combination.
///
/// This count is sourced independently of the points-to relation, and a
/// missing or zero value is never semantically valid for benchmarks known
/// to contain virtual calls, so unlike the accessors above, this is a
/// fatal error that propagates.
pub fn virtual_call_site_count(store: &Store, key: &TableKey) -> Result<u64> {
    let conn = store.conn();
    let count: Option<i64> = conn
        .query_row(
            "SELECT nb_sites FROM virtual_call_stats
             WHERE benchmark = ?1 AND analysis = ?2 AND ir = ?3",
            params![key.benchmark, key.analysis, key.ir.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    match count {
        Some(n) if n > 0 => Ok(n as u64),
        Some(_) => Err(EvalError::zero_call_sites(format!(
            "virtual-call-site count for {key} is zero"
        ))),
        None => Err(EvalError::zero_call_sites(format!(
            "no virtual-call-site count recorded for {key}"
        ))),
    }
}

/// Record (or replace) the call-site total for one combination.
pub fn record_virtual_call_site_count(store: &Store, key: &TableKey, count: u64) -> Result<()> {
    let conn = store.conn();
    conn.execute(
        "INSERT OR REPLACE INTO virtual_call_stats (benchmark, analysis, ir, nb_sites)
         VALUES (?1, ?2, ?3, ?4)",
        params![key.benchmark, key.analysis, key.ir.as_str(), count as i64],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::store::ingest::{create_virtual_call_table, insert_virtual_call_rows};
    use crate::shared::models::{ErrorKind, Ir};

    #[test]
    fn test_missing_table_is_empty() {
        let store = Store::in_memory().unwrap();
        let key = TableKey::new("bench", "1cs", Ir::Soot).unwrap();
        let table = VirtualCallTable::new(store, key);
        assert!(table.variables().is_empty());
    }

    #[test]
    fn test_receiver_variables_are_distinct() {
        let store = Store::in_memory().unwrap();
        let key = TableKey::new("bench", "1cs", Ir::Soot).unwrap();
        create_virtual_call_table(&store, &key).unwrap();
        insert_virtual_call_rows(
            &store,
            &key,
            &[
                ("site0".to_string(), "r0".to_string()),
                ("site1".to_string(), "r0".to_string()),
                ("site2".to_string(), "r1".to_string()),
            ],
        )
        .unwrap();
        let table = VirtualCallTable::new(store, key);
        let vars = table.variables();
        assert_eq!(vars, ["r0".to_string(), "r1".to_string()].into_iter().collect());
    }

    #[test]
    fn test_call_site_count_round_trip() {
        let store = Store::in_memory().unwrap();
        let key = TableKey::new("bench", "1cs", Ir::Soot).unwrap();
        record_virtual_call_site_count(&store, &key, 42).unwrap();
        assert_eq!(virtual_call_site_count(&store, &key).unwrap(), 42);
    }

    #[test]
    fn test_zero_or_missing_count_is_fatal() {
        let store = Store::in_memory().unwrap();
        let key = TableKey::new("bench", "1cs", Ir::Wala).unwrap();

        let err = virtual_call_site_count(&store, &key).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ZeroCallSites);

        record_virtual_call_site_count(&store, &key, 0).unwrap();
        let err = virtual_call_site_count(&store, &key).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ZeroCallSites);
    }
}
