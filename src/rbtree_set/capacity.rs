use super::RBTreeSet;
use crate::RBTreeMap;

impl<T> RBTreeSet<T> {
    /// Creates an empty set with capacity for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::with_capacity(32);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_capacity(capacity),
        }
    }
}

impl<T, C> RBTreeSet<T, C> {
    /// Creates an empty set ordered by `comparator`, with capacity for at least
    /// `capacity` elements.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_capacity_and_comparator(capacity, comparator),
        }
    }

    /// Returns the number of elements the set can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }
}
