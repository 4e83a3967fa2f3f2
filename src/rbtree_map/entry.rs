use core::fmt;
use core::mem;

use crate::comparator::Natural;
use crate::raw::{Handle, RawRBTree, Side};

/// A view into a single entry in a map, which may either be vacant or occupied.
///
/// This `enum` is constructed from the [`entry`] method on [`crate::RBTreeMap`].
///
/// # Examples
///
/// ```
/// use rbtree_collections::RBTreeMap;
/// use rbtree_collections::rbtree_map::Entry;
///
/// let mut map = RBTreeMap::new();
///
/// match map.entry("oz") {
///     Entry::Vacant(v) => {
///         v.insert(1);
///     }
///     Entry::Occupied(mut o) => {
///         *o.get_mut() += 1;
///     }
/// }
/// assert_eq!(map["oz"], 1);
/// ```
///
/// [`entry`]: crate::RBTreeMap::entry
pub enum Entry<'a, K: 'a, V: 'a, C = Natural> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, C>),

    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, C>),
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Entry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

/// A view into a vacant entry in a `RBTreeMap`.
/// It is part of the [`Entry`] enum.
///
/// The position the key will be attached at was found when the entry was
/// created, so inserting does not search again.
pub struct VacantEntry<'a, K, V, C = Natural> {
    pub(super) key: K,
    pub(super) position: Option<(Handle, Side)>,
    pub(super) tree: &'a mut RawRBTree<K, V, C>,
}

impl<K: fmt::Debug, V, C> fmt::Debug for VacantEntry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VacantEntry").field("key", &self.key).finish()
    }
}

/// A view into an occupied entry in a `RBTreeMap`.
/// It is part of the [`Entry`] enum.
///
/// # Examples
///
/// ```
/// use rbtree_collections::RBTreeMap;
/// use rbtree_collections::rbtree_map::Entry;
///
/// let mut map = RBTreeMap::new();
/// map.insert("oz", 1);
///
/// if let Entry::Occupied(mut o) = map.entry("oz") {
///     *o.get_mut() += 1;
/// }
/// assert_eq!(map["oz"], 2);
/// ```
pub struct OccupiedEntry<'a, K, V, C = Natural> {
    pub(super) handle: Handle,
    pub(super) tree: &'a mut RawRBTree<K, V, C>,
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OccupiedEntry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry").field("key", self.key()).field("value", self.get()).finish()
    }
}

impl<'a, K, V, C> Entry<'a, K, V, C> {
    /// Ensures a value is in the entry by inserting the default if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// assert_eq!(map["poneyland"], 12);
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the default function if empty,
    /// and returns a mutable reference to the value in the entry.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default()),
        }
    }

    /// Like [`or_insert_with`](Entry::or_insert_with), but the default function
    /// is given a reference to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    /// map.entry("poneyland").or_insert_with_key(|key| key.chars().count());
    ///
    /// assert_eq!(map["poneyland"], 9);
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                let value = default(&v.key);
                v.insert(value)
            }
        }
    }

    /// Returns a reference to this entry's key.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(o) => o.key(),
            Entry::Vacant(v) => v.key(),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["poneyland"], 42);
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["poneyland"], 43);
    /// ```
    #[allow(clippy::return_self_not_must_use)]
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(ref mut o) = self {
            f(o.get_mut());
        }
        self
    }

    /// Sets the value of the entry, and returns an `OccupiedEntry`.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, C> {
        match self {
            Entry::Occupied(mut o) => {
                o.insert(value);
                o
            }
            Entry::Vacant(v) => v.insert_entry(value),
        }
    }
}

impl<'a, K, V: Default, C> Entry<'a, K, V, C> {
    /// Ensures a value is in the entry by inserting the default value if empty,
    /// and returns a mutable reference to the value in the entry.
    #[allow(clippy::must_use_candidate)]
    pub fn or_default(self) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(V::default()),
        }
    }
}

impl<'a, K, V, C> VacantEntry<'a, K, V, C> {
    /// Gets a reference to the key that would be used when inserting a value
    /// through the `VacantEntry`.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    #[allow(clippy::must_use_candidate)]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Sets the value of the entry with the `VacantEntry`'s key,
    /// and returns a mutable reference to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    /// use rbtree_collections::rbtree_map::Entry;
    ///
    /// let mut map: RBTreeMap<&str, u32> = RBTreeMap::new();
    ///
    /// if let Entry::Vacant(o) = map.entry("poneyland") {
    ///     o.insert(37);
    /// }
    /// assert_eq!(map["poneyland"], 37);
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        let tree = self.tree;
        let handle = tree.insert_at(self.position, self.key, value);
        tree.value_mut(handle)
    }

    /// Sets the value of the entry with the `VacantEntry`'s key,
    /// and returns an `OccupiedEntry`.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, C> {
        let handle = self.tree.insert_at(self.position, self.key, value);
        OccupiedEntry { handle, tree: self.tree }
    }
}

impl<'a, K, V, C> OccupiedEntry<'a, K, V, C> {
    /// Gets a reference to the key in the entry.
    ///
    /// This is the key stored in the map, not the one passed to `entry`.
    #[must_use]
    pub fn key(&self) -> &K {
        self.tree.key(self.handle)
    }

    /// Takes the key-value pair out of the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    /// use rbtree_collections::rbtree_map::Entry;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// if let Entry::Occupied(o) = map.entry("poneyland") {
    ///     o.remove_entry();
    /// }
    ///
    /// assert!(!map.contains_key("poneyland"));
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn remove_entry(self) -> (K, V) {
        self.tree.remove_node(self.handle)
    }

    /// Gets a reference to the value in the entry.
    #[must_use]
    pub fn get(&self) -> &V {
        self.tree.key_value(self.handle).1
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// If you need a reference to the `OccupiedEntry` that may outlive the
    /// destruction of the `Entry` value, see [`into_mut`](OccupiedEntry::into_mut).
    pub fn get_mut(&mut self) -> &mut V {
        self.tree.value_mut(self.handle)
    }

    /// Converts the entry into a mutable reference to its value.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_mut(self) -> &'a mut V {
        self.tree.value_mut(self.handle)
    }

    /// Sets the value of the entry with the `OccupiedEntry`'s key,
    /// and returns the entry's old value.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Takes the value of the entry out of the map, and returns it.
    #[allow(clippy::must_use_candidate)]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::RBTreeMap;
    use crate::comparator::Natural;
    use crate::rbtree_map::Entry;

    #[test]
    fn vacant_insert_keeps_tree_valid() {
        let mut map = RBTreeMap::new();
        for key in (0..200).rev() {
            match map.entry(key) {
                Entry::Vacant(v) => {
                    assert_eq!(*v.key(), key);
                    *v.insert(0) += key;
                }
                Entry::Occupied(_) => panic!("key {key} inserted twice"),
            }
            map.raw.validate_invariants();
        }
        assert_eq!(map.len(), 200);
        assert_eq!(map.get(&150), Some(&150));
    }

    #[test]
    fn occupied_entry_removal_rebalances() {
        let mut map: RBTreeMap<i32, i32> = (0..64).map(|k| (k, k)).collect();
        for key in (0..64).step_by(2) {
            let Entry::Occupied(o) = map.entry(key) else {
                panic!("key {key} missing");
            };
            assert_eq!(o.remove_entry(), (key, key));
            map.raw.validate_invariants();
        }
        assert!(map.keys().all(|k| k % 2 == 1));
    }

    #[test]
    fn entries_follow_the_comparator() {
        let mut map = RBTreeMap::with_comparator(Natural.reversed());
        *map.entry(1).or_insert(0) += 1;
        *map.entry(2).or_default() += 2;
        *map.entry(1).or_insert(0) += 10;
        let entry = map.entry(3).insert_entry(3);
        assert_eq!((entry.key(), entry.get()), (&3, &3));
        assert_eq!(map.into_iter().collect::<alloc::vec::Vec<_>>(), [(3, 3), (2, 2), (1, 11)]);
    }
}
