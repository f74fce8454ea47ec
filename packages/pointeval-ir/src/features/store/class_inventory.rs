//! Exclusive-class resolution
//!
//! The two frontends do not see the same class hierarchy: each produces
//! output for classes the other never mentions (synthetic classes,
//! differently-modeled library internals). Those "exclusive" classes must
//! be excluded from comparative statistics, or they skew the precision of
//! whichever IR happens to carry more of them.
//!
//! Exclusivity per (benchmark, IR pair) is a set difference over the
//! `class_info` inventory relation, computed with SQL `EXCEPT`.

use rusqlite::params;
use rustc_hash::FxHashSet;
use tracing::warn;

use crate::features::store::Store;
use crate::shared::models::{Ir, Result};
use crate::shared::utils::type_tag;

/// Classes present in `from_ir`'s inventory for `benchmark` but absent
/// from `to_ir`'s. Query failures degrade to an empty set (no exclusions)
/// with a warning.
pub fn exclusive_classes(
    store: &Store,
    benchmark: &str,
    from_ir: Ir,
    to_ir: Ir,
) -> FxHashSet<String> {
    let conn = store.conn();
    let run = || -> rusqlite::Result<FxHashSet<String>> {
        let mut stmt = conn.prepare(
            "SELECT class_name FROM class_info WHERE benchmark = ?1 AND framework = ?2
             EXCEPT
             SELECT class_name FROM class_info WHERE benchmark = ?3 AND framework = ?4",
        )?;
        let classes = stmt
            .query_map(
                params![benchmark, from_ir.framework(), benchmark, to_ir.framework()],
                |row| row.get::<_, String>(0),
            )?
            .collect::<rusqlite::Result<FxHashSet<_>>>()?;
        Ok(classes)
    };
    match run() {
        Ok(classes) => classes,
        Err(e) => {
            warn!(benchmark, from = %from_ir, to = %to_ir, error = %e,
                  "exclusive-class query failed; returning empty set");
            FxHashSet::default()
        }
    }
}

/// Classes only Soot's output mentions.
pub fn exclusive_classes_soot(store: &Store, benchmark: &str) -> FxHashSet<String> {
    exclusive_classes(store, benchmark, Ir::Soot, Ir::Soot.other())
}

/// Classes only Wala's output mentions.
pub fn exclusive_classes_wala(store: &Store, benchmark: &str) -> FxHashSet<String> {
    exclusive_classes(store, benchmark, Ir::Wala, Ir::Wala.other())
}

/// Does this variable (or method) identifier belong to an exclusive
/// class? Decided by the type tag before the first `:`.
pub fn is_exclusive_type(identifier: &str, exclusive: &FxHashSet<String>) -> bool {
    exclusive.contains(type_tag(identifier))
}

/// Load class names into the inventory (ingestion and test seeding).
pub fn insert_classes<I, S>(store: &Store, benchmark: &str, framework: &str, classes: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let conn = store.conn();
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO class_info (benchmark, framework, class_name) VALUES (?1, ?2, ?3)",
        )?;
        for class in classes {
            stmt.execute(params![benchmark, framework, class.as_ref()])?;
            inserted += 1;
        }
    }
    tx.commit()?;
    Ok(inserted)
}
