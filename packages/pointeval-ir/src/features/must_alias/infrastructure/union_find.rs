//! Union-Find (Disjoint Set Union) Data Structure
//!
//! Optimized implementation with:
//! - Path compression: O(α(n)) find operations
//! - Union by rank: Balanced trees
//!
//! Backs the must-alias partition: variables with identical points-to
//! sets are unioned into one alias class.
//!
//! # References
//! - Tarjan, R. E. "Efficiency of a Good But Not Linear Set Union Algorithm" (1975)

/// Union-Find with path compression and union by rank
#[derive(Debug, Clone)]
pub struct UnionFind {
    /// Parent pointers (self-loop = root)
    parent: Vec<u32>,

    /// Rank (tree height upper bound) for union by rank
    rank: Vec<u8>,

    /// Number of disjoint sets
    set_count: usize,
}

impl UnionFind {
    /// Create a new Union-Find with n elements (0..n-1)
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            rank: vec![0; n],
            set_count: n,
        }
    }

    /// Find the representative (root) of element x with path compression
    ///
    /// Complexity: O(α(n)) amortized where α is inverse Ackermann function
    #[inline]
    pub fn find(&mut self, x: u32) -> u32 {
        // First pass: walk to the root
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // Second pass: compress the path
        let mut current = x;
        while self.parent[current as usize] != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }
        root
    }

    /// Union two sets by rank
    ///
    /// Returns the new representative
    pub fn union(&mut self, x: u32, y: u32) -> u32 {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return root_x; // Already in same set
        }

        let rx = root_x as usize;
        let ry = root_y as usize;

        // Union by rank (attach smaller tree under larger)
        let new_root = if self.rank[rx] < self.rank[ry] {
            self.parent[rx] = root_y;
            root_y
        } else if self.rank[rx] > self.rank[ry] {
            self.parent[ry] = root_x;
            root_x
        } else {
            // Equal ranks, pick x as root and increment its rank
            self.parent[ry] = root_x;
            self.rank[rx] += 1;
            root_x
        };

        self.set_count -= 1;
        new_root
    }

    /// Check if two elements are in the same set
    #[inline]
    pub fn connected(&mut self, x: u32, y: u32) -> bool {
        self.find(x) == self.find(y)
    }

    /// Number of disjoint sets
    #[inline]
    pub fn count(&self) -> usize {
        self.set_count
    }

    /// Total number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// All sets as member lists, in order of each set's first element.
    ///
    /// Members within a set appear in ascending element order.
    pub fn sets(&mut self) -> Vec<Vec<u32>> {
        let mut root_slot: rustc_hash::FxHashMap<u32, usize> =
            rustc_hash::FxHashMap::default();
        let mut out: Vec<Vec<u32>> = Vec::with_capacity(self.set_count);
        for element in 0..self.parent.len() as u32 {
            let root = self.find(element);
            let slot = *root_slot.entry(root).or_insert_with(|| {
                out.push(Vec::new());
                out.len() - 1
            });
            out[slot].push(element);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_union_find() {
        let mut uf = UnionFind::new(10);

        // Initially all separate
        assert_eq!(uf.count(), 10);
        assert!(!uf.connected(0, 1));

        // Union some elements
        uf.union(0, 1);
        uf.union(2, 3);
        assert!(uf.connected(0, 1));
        assert!(uf.connected(2, 3));
        assert!(!uf.connected(0, 2));
        assert_eq!(uf.count(), 8);

        // Chain union
        uf.union(1, 2); // Merges {0,1} with {2,3}
        assert!(uf.connected(0, 3));
        assert_eq!(uf.count(), 7);
    }

    #[test]
    fn test_path_compression() {
        let mut uf = UnionFind::new(100);

        // Create a long chain
        for i in 0..99 {
            uf.union(i, i + 1);
        }

        uf.find(0);
        let root = uf.find(99);

        for i in 0..100 {
            assert_eq!(uf.find(i), root);
        }
    }

    #[test]
    fn test_sets_preserve_first_seen_order() {
        let mut uf = UnionFind::new(5);
        uf.union(3, 4);
        uf.union(0, 2);

        let sets = uf.sets();
        assert_eq!(sets, vec![vec![0, 2], vec![1], vec![3, 4]]);
    }

    #[test]
    fn test_union_is_idempotent() {
        let mut uf = UnionFind::new(3);
        uf.union(0, 1);
        uf.union(0, 1);
        assert_eq!(uf.count(), 2);
    }
}
