use super::RBTreeMap;
use crate::comparator::Natural;
use crate::raw::RawRBTree;

impl<K, V> RBTreeMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` elements.
    ///
    /// Nodes live in a slot arena, so a map that never grows past `capacity`
    /// allocates only once.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeMap::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`, with capacity for at least
    /// `capacity` elements.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        RBTreeMap {
            raw: RawRBTree::with_capacity(capacity, comparator),
        }
    }

    /// Returns the number of elements the map can hold without reallocating.
    ///
    /// Slots freed by removals are reused before the arena grows.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
