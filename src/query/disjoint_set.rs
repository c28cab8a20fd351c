//! Disjoint-set union with path compression and union by rank
//!
//! Rank only bounds tree height. A separate `size` payload is carried per
//! root and added together on union; the connectivity query stores region
//! areas there.
//!
//! Elements outside `0..len()` behave as permanent singletons: `find`
//! returns them unchanged and `unite` refuses them.

/// Union-find over `0..n` with an additive size payload
#[derive(Debug, Clone, Default)]
pub struct DisjointSetUnion {
    parent: Vec<usize>,
    rank: Vec<u32>,
    size: Vec<i64>,
    components: usize,
}

impl DisjointSetUnion {
    /// Create `n` singleton sets, each of size 1
    pub fn new(n: usize) -> Self {
        Self::with_sizes(vec![1; n])
    }

    /// Create one singleton set per entry, each carrying the given size
    pub fn with_sizes(sizes: Vec<i64>) -> Self {
        let n = sizes.len();
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            size: sizes,
            components: n,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Check if there are no elements
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets remaining
    pub const fn component_count(&self) -> usize {
        self.components
    }

    /// Root of the set containing `x`
    ///
    /// Every node on the path from `x` is repointed directly at the root.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while let Some(&next) = self.parent.get(root) {
            if next == root {
                break;
            }
            root = next;
        }

        let mut node = x;
        while node != root {
            let Some(slot) = self.parent.get_mut(node) else {
                break;
            };
            node = std::mem::replace(slot, root);
        }

        root
    }

    /// Merge the sets containing `x` and `y`
    ///
    /// The lower-rank root goes under the higher-rank one; on a tie the
    /// surviving root's rank grows by one. Returns `false` if they were
    /// already joined or either element is out of range.
    pub fn unite(&mut self, x: usize, y: usize) -> bool {
        if x >= self.len() || y >= self.len() {
            return false;
        }

        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return false;
        }

        let rank_x = self.rank_of(root_x);
        let rank_y = self.rank_of(root_y);

        let (survivor, absorbed) = if rank_x < rank_y {
            (root_y, root_x)
        } else {
            (root_x, root_y)
        };

        if let Some(parent) = self.parent.get_mut(absorbed) {
            *parent = survivor;
        }
        let absorbed_size = self.size.get(absorbed).copied().unwrap_or(0);
        if let Some(size) = self.size.get_mut(survivor) {
            *size += absorbed_size;
        }
        if rank_x == rank_y {
            if let Some(rank) = self.rank.get_mut(survivor) {
                *rank += 1;
            }
        }

        self.components -= 1;
        true
    }

    /// Check if `x` and `y` are in the same set
    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Size payload of the set containing `x`
    pub fn size_of(&mut self, x: usize) -> i64 {
        let root = self.find(x);
        self.size.get(root).copied().unwrap_or(0)
    }

    /// Overwrite the size payload of the set containing `x`
    pub fn set_size(&mut self, x: usize, size: i64) {
        let root = self.find(x);
        if let Some(slot) = self.size.get_mut(root) {
            *slot = size;
        }
    }

    fn rank_of(&self, root: usize) -> u32 {
        self.rank.get(root).copied().unwrap_or(0)
    }
}

