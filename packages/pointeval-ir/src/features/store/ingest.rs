//! TSV log ingestion
//!
//! Materializes raw analysis log files into the per-combination tables.
//! Log layout on disk, as produced by the analysis runs:
//!
//! ```text
//! {root}/{analysis}/{benchmark}_{ir}/database/Stats_Simple_Application_VarPointsTo.csv
//! {root}/{analysis}/{benchmark}_{ir}/database/VirtualMethodInvocation.csv
//! ```
//!
//! Both files are tab-separated. The points-to file carries
//! (heapCtx, heapObj, varCtx, var); three columns (heapType,
//! enclosingMethod, varType) are derived from the identifier grammar at
//! load time so queries never re-parse strings.
//!
//! A missing log file is the normal sparse-combination case: it logs a
//! warning and loads zero rows.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rusqlite::params;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::features::store::virtual_calls::record_virtual_call_site_count;
use crate::features::store::Store;
use crate::shared::models::{PointsToRecord, Result, TableKey};
use crate::shared::utils::{declared_type, enclosing_method, heap_type};

pub const VAR_POINTS_TO_LOG: &str = "Stats_Simple_Application_VarPointsTo.csv";
pub const VIRTUAL_CALL_LOG: &str = "VirtualMethodInvocation.csv";

fn log_path(root: &Path, key: &TableKey, file_name: &str) -> PathBuf {
    root.join(&key.analysis)
        .join(format!("{}_{}", key.benchmark, key.ir))
        .join("database")
        .join(file_name)
}

/// Derive the full seven-column record from one raw log tuple.
pub fn derive_record(heap_ctx: &str, heap_obj: &str, var_ctx: &str, var: &str) -> PointsToRecord {
    PointsToRecord {
        heap_ctx: heap_ctx.to_string(),
        heap_obj: heap_obj.to_string(),
        var_ctx: var_ctx.to_string(),
        var: var.to_string(),
        heap_type: heap_type(heap_obj).to_string(),
        enclosing_method: enclosing_method(var).to_string(),
        var_type: declared_type(var).to_string(),
    }
}

pub fn create_points_to_table(store: &Store, key: &TableKey) -> Result<()> {
    let conn = store.conn();
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" (
            heapCtx TEXT,
            heapObj TEXT,
            varCtx TEXT,
            var TEXT,
            heapType TEXT,
            enclosingMethod TEXT,
            varType TEXT
        )",
        key.points_to_table()
    );
    conn.execute(&sql, [])?;
    Ok(())
}

/// Bulk-insert records in one transaction.
pub fn insert_points_to_records(
    store: &Store,
    key: &TableKey,
    records: &[PointsToRecord],
) -> Result<usize> {
    let conn = store.conn();
    let tx = conn.unchecked_transaction()?;
    {
        let sql = format!(
            "INSERT INTO \"{}\" VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            key.points_to_table()
        );
        let mut stmt = tx.prepare(&sql)?;
        for r in records {
            stmt.execute(params![
                r.heap_ctx,
                r.heap_obj,
                r.var_ctx,
                r.var,
                r.heap_type,
                r.enclosing_method,
                r.var_type,
            ])?;
        }
    }
    tx.commit()?;
    Ok(records.len())
}

/// Load one combination's points-to log. Returns the number of rows
/// loaded (zero when the log file is missing).
pub fn load_var_points_to(store: &Store, root: &Path, key: &TableKey) -> Result<usize> {
    let path = log_path(root, key, VAR_POINTS_TO_LOG);
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "points-to log missing; loading 0 rows");
            return Ok(0);
        }
    };

    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(heap_ctx), Some(heap_obj), Some(var_ctx), Some(var)) => {
                records.push(derive_record(heap_ctx, heap_obj, var_ctx, var));
            }
            _ => {
                debug!(table = %key.points_to_table(), line, "skipping malformed log line");
            }
        }
    }

    create_points_to_table(store, key)?;
    let loaded = insert_points_to_records(store, key, &records)?;
    info!(table = %key.points_to_table(), rows = loaded, "loaded points-to log");
    Ok(loaded)
}

pub fn create_virtual_call_table(store: &Store, key: &TableKey) -> Result<()> {
    let conn = store.conn();
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" (
            virtualCallSite TEXT,
            virtualVar TEXT
        )",
        key.virtual_call_table()
    );
    conn.execute(&sql, [])?;
    Ok(())
}

pub fn insert_virtual_call_rows(
    store: &Store,
    key: &TableKey,
    rows: &[(String, String)],
) -> Result<usize> {
    let conn = store.conn();
    let tx = conn.unchecked_transaction()?;
    {
        let sql = format!(
            "INSERT INTO \"{}\" VALUES (?1, ?2)",
            key.virtual_call_table()
        );
        let mut stmt = tx.prepare(&sql)?;
        for (site, var) in rows {
            stmt.execute(params![site, var])?;
        }
    }
    tx.commit()?;
    Ok(rows.len())
}

/// Load one combination's virtual-call log and record its distinct
/// call-site count into `virtual_call_stats`. Returns the number of rows
/// loaded (zero when the log file is missing; no count is recorded then,
/// so a later precision run fails fast instead of dividing by a bogus
/// zero).
pub fn load_virtual_calls(store: &Store, root: &Path, key: &TableKey) -> Result<usize> {
    let path = log_path(root, key, VIRTUAL_CALL_LOG);
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "virtual-call log missing; loading 0 rows");
            return Ok(0);
        }
    };

    let mut rows = Vec::new();
    let mut sites = FxHashSet::default();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        match (fields.next(), fields.next()) {
            (Some(site), Some(var)) => {
                sites.insert(site.to_string());
                rows.push((site.to_string(), var.to_string()));
            }
            _ => {
                debug!(table = %key.virtual_call_table(), line, "skipping malformed log line");
            }
        }
    }

    create_virtual_call_table(store, key)?;
    let loaded = insert_virtual_call_rows(store, key, &rows)?;
    if !sites.is_empty() {
        record_virtual_call_site_count(store, key, sites.len() as u64)?;
    }
    info!(table = %key.virtual_call_table(), rows = loaded, sites = sites.len(),
          "loaded virtual-call log");
    Ok(loaded)
}
