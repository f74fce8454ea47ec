//! Fixed-universe heap-object sets
//!
//! A points-to table can relate millions of rows to a few hundred
//! thousand distinct heap objects. Per-variable sets are therefore kept
//! as dense bitsets over a universe interned once per table:
//! - Insert / membership: O(1)
//! - Equality and hashing: O(words), on the exact bit pattern
//! - Memory: O(universe / 64) per variable
//!
//! Exact bit-pattern equality is what makes [`HeapSet`] usable as the
//! canonical key in the must-alias pass: two variables are aliased iff
//! their sets are set-equal, never merely hash-equal.

use rustc_hash::FxHashMap;

use crate::shared::models::HeapObjectKey;

/// Interned universe of heap objects for one table.
///
/// The universe is fixed at construction; sets built against it cannot
/// grow new objects afterwards.
#[derive(Debug, Clone, Default)]
pub struct HeapUniverse {
    index: FxHashMap<HeapObjectKey, u32>,
    objects: Vec<HeapObjectKey>,
}

impl HeapUniverse {
    /// Build the universe from (possibly duplicated) heap pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = HeapObjectKey>) -> Self {
        let mut universe = Self::default();
        for pair in pairs {
            if !universe.index.contains_key(&pair) {
                let id = universe.objects.len() as u32;
                universe.index.insert(pair.clone(), id);
                universe.objects.push(pair);
            }
        }
        universe
    }

    /// Number of distinct heap objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn id_of(&self, key: &HeapObjectKey) -> Option<u32> {
        self.index.get(key).copied()
    }

    pub fn object(&self, id: u32) -> &HeapObjectKey {
        &self.objects[id as usize]
    }

    /// A fresh all-zero set over this universe.
    pub fn empty_set(&self) -> HeapSet {
        HeapSet::new(self.len())
    }
}

/// Dense bitset over one [`HeapUniverse`].
///
/// `Eq`/`Hash` are derived over the word array, so two sets over the same
/// universe compare equal exactly when they contain the same objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeapSet {
    words: Box<[u64]>,
}

impl HeapSet {
    fn new(universe_len: usize) -> Self {
        Self {
            words: vec![0u64; universe_len.div_ceil(64)].into_boxed_slice(),
        }
    }

    /// Insert an object id. Returns true if it was not present.
    #[inline]
    pub fn insert(&mut self, id: u32) -> bool {
        let word = (id / 64) as usize;
        let bit = 1u64 << (id % 64);
        let fresh = self.words[word] & bit == 0;
        self.words[word] |= bit;
        fresh
    }

    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        let word = (id / 64) as usize;
        match self.words.get(word) {
            Some(w) => w & (1u64 << (id % 64)) != 0,
            None => false,
        }
    }

    /// Number of objects in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Object ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            (0..64)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| wi as u32 * 64 + bit)
        })
    }
}
