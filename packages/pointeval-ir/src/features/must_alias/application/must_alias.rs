//! Must-alias partition over one points-to table
//!
//! Two variables must-alias when their points-to sets are exactly
//! equal. The pass interns the table's heap objects into a bitset
//! universe, folds the rows into per-variable sets, then unions
//! variables whose canonical sets collide.

use rustc_hash::FxHashMap;
use tracing::info;

use crate::features::store::{Store, VarPointsToTable};
use crate::shared::models::{TableKey, VariableKey};

use super::super::domain::{HeapSet, HeapUniverse, PointsToMap};
use super::super::infrastructure::UnionFind;

/// Must-alias engine for one `(benchmark, analysis, ir)` table.
pub struct MustAlias {
    table: VarPointsToTable,
}

impl MustAlias {
    pub fn new(store: Store, key: TableKey) -> Self {
        Self {
            table: VarPointsToTable::new(store, key),
        }
    }

    /// Load the table into per-variable bitsets.
    ///
    /// Rows are read in a fixed order, so the map's variable order is
    /// stable across runs of the same database.
    pub fn points_to_map(&self) -> PointsToMap {
        let universe = HeapUniverse::from_pairs(self.table.all_heap_ctx_pairs());
        PointsToMap::build(universe, self.table.rows_ordered())
    }

    /// Partition all variables of the table into alias classes.
    ///
    /// Singleton classes are included; every variable appears exactly
    /// once across the result.
    pub fn compute_must_alias(&self) -> Vec<Vec<VariableKey>> {
        let map = self.points_to_map();
        let classes = Self::partition(&map);
        info!(
            table = %self.table.key(),
            variables = map.len(),
            classes = classes.len(),
            "computed must-alias partition"
        );
        classes
    }

    /// Group the map's variables by exact points-to set equality.
    pub fn partition(map: &PointsToMap) -> Vec<Vec<VariableKey>> {
        let mut uf = UnionFind::new(map.len());
        let mut seen: FxHashMap<&HeapSet, u32> = FxHashMap::default();

        let vars: Vec<&VariableKey> = map.iter().map(|(var, _)| var).collect();
        for (idx, (_, set)) in map.iter().enumerate() {
            let idx = idx as u32;
            match seen.get(set) {
                Some(&first) => {
                    uf.union(first, idx);
                }
                None => {
                    seen.insert(set, idx);
                }
            }
        }

        uf.sets()
            .into_iter()
            .map(|members| {
                members
                    .into_iter()
                    .map(|id| vars[id as usize].clone())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::store::ingest::{
        create_points_to_table, derive_record, insert_points_to_records,
    };
    use crate::shared::models::Ir;

    fn seeded(rows: &[(&str, &str, &str, &str)]) -> (Store, TableKey) {
        let store = Store::in_memory().unwrap();
        let key = TableKey::new("toy", "insens", Ir::Soot).unwrap();
        create_points_to_table(&store, &key).unwrap();
        let records: Vec<_> = rows
            .iter()
            .map(|(hc, ho, vc, v)| derive_record(hc, ho, vc, v))
            .collect();
        insert_points_to_records(&store, &key, &records).unwrap();
        (store, key)
    }

    fn var(ctx: &str, name: &str) -> VariableKey {
        VariableKey::new(ctx, name)
    }

    #[test]
    fn test_equal_sets_alias() {
        let (store, key) = seeded(&[
            ("h1", "obj/java.lang.String/new A/0", "c", "<A: void m()>/a"),
            ("h2", "obj/java.lang.B/new B/0", "c", "<A: void m()>/a"),
            ("h1", "obj/java.lang.String/new A/0", "c", "<A: void m()>/b"),
            ("h2", "obj/java.lang.B/new B/0", "c", "<A: void m()>/b"),
            ("h1", "obj/java.lang.String/new A/0", "c", "<A: void m()>/c"),
        ]);
        let classes = MustAlias::new(store, key).compute_must_alias();

        assert_eq!(classes.len(), 2);
        let aliased = classes.iter().find(|c| c.len() == 2).unwrap();
        assert!(aliased.contains(&var("c", "<A: void m()>/a")));
        assert!(aliased.contains(&var("c", "<A: void m()>/b")));
    }

    #[test]
    fn test_partition_covers_every_variable_once() {
        let (store, key) = seeded(&[
            ("h1", "o1", "c1", "v1"),
            ("h2", "o2", "c1", "v2"),
            ("h1", "o1", "c2", "v1"),
        ]);
        let engine = MustAlias::new(store, key);
        let map = engine.points_to_map();
        let classes = MustAlias::partition(&map);

        let mut all: Vec<VariableKey> = classes.into_iter().flatten().collect();
        all.sort();
        let mut expected = vec![var("c1", "v1"), var("c1", "v2"), var("c2", "v1")];
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_subset_does_not_alias() {
        // {o1} vs {o1, o2}: superset relation is not equality.
        let (store, key) = seeded(&[
            ("h", "o1", "c", "small"),
            ("h", "o1", "c", "big"),
            ("h", "o2", "c", "big"),
        ]);
        let classes = MustAlias::new(store, key).compute_must_alias();
        assert_eq!(classes.len(), 2);
        assert!(classes.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_empty_table_yields_no_classes() {
        let store = Store::in_memory().unwrap();
        let key = TableKey::new("toy", "insens", Ir::Wala).unwrap();
        create_points_to_table(&store, &key).unwrap();
        let classes = MustAlias::new(store, key).compute_must_alias();
        assert!(classes.is_empty());
    }
}
