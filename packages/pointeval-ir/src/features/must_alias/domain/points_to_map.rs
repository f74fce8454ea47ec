//! Per-variable points-to sets in stable first-seen order

use rustc_hash::FxHashMap;

use crate::shared::models::{HeapObjectKey, VariableKey};

use super::heap_set::{HeapSet, HeapUniverse};

/// All variables of one table mapped to their heap-object bitsets.
///
/// Variables are kept in the order they were first seen so that
/// downstream passes are deterministic for a given row order.
#[derive(Debug)]
pub struct PointsToMap {
    universe: HeapUniverse,
    sets: FxHashMap<VariableKey, HeapSet>,
    order: Vec<VariableKey>,
}

impl PointsToMap {
    /// Fold rows of (variable, heap object) into per-variable sets.
    ///
    /// Rows whose heap pair is outside the universe are skipped; the
    /// universe is expected to be built from the same table.
    pub fn build(
        universe: HeapUniverse,
        rows: impl IntoIterator<Item = (VariableKey, HeapObjectKey)>,
    ) -> Self {
        let mut sets: FxHashMap<VariableKey, HeapSet> = FxHashMap::default();
        let mut order = Vec::new();
        for (var, heap) in rows {
            let Some(id) = universe.id_of(&heap) else {
                continue;
            };
            sets.entry(var.clone())
                .or_insert_with(|| {
                    order.push(var);
                    universe.empty_set()
                })
                .insert(id);
        }
        Self { universe, sets, order }
    }

    pub fn universe(&self) -> &HeapUniverse {
        &self.universe
    }

    /// Number of distinct variables.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn set_of(&self, var: &VariableKey) -> Option<&HeapSet> {
        self.sets.get(var)
    }

    /// Variables in first-seen order, each with its points-to set.
    pub fn iter(&self) -> impl Iterator<Item = (&VariableKey, &HeapSet)> {
        self.order.iter().map(|var| (var, &self.sets[var]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(ctx: &str, name: &str) -> VariableKey {
        VariableKey::new(ctx, name)
    }

    fn heap(ctx: &str, obj: &str) -> HeapObjectKey {
        HeapObjectKey::new(ctx, obj)
    }

    #[test]
    fn test_build_groups_rows_by_variable() {
        let pairs = vec![heap("h1", "o1"), heap("h2", "o2"), heap("h1", "o3")];
        let universe = HeapUniverse::from_pairs(pairs.clone());
        let map = PointsToMap::build(
            universe,
            vec![
                (var("c", "a"), pairs[0].clone()),
                (var("c", "a"), pairs[1].clone()),
                (var("c", "b"), pairs[2].clone()),
            ],
        );
        assert_eq!(map.len(), 2);
        assert_eq!(map.set_of(&var("c", "a")).unwrap().len(), 2);
        assert_eq!(map.set_of(&var("c", "b")).unwrap().len(), 1);
        let order: Vec<_> = map.iter().map(|(v, _)| v.clone()).collect();
        assert_eq!(order, vec![var("c", "a"), var("c", "b")]);
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let pair = heap("h", "o");
        let universe = HeapUniverse::from_pairs(vec![pair.clone()]);
        let map = PointsToMap::build(
            universe,
            vec![(var("c", "a"), pair.clone()), (var("c", "a"), pair)],
        );
        assert_eq!(map.set_of(&var("c", "a")).unwrap().len(), 1);
    }
}
