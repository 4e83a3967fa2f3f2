use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{Bound, ControlFlow, Index, RangeBounds};

use crate::comparator::{Comparator, Natural};
use crate::raw::{Arena, Node, RawRBTree, SearchResult, Side, Span};

mod capacity;
mod entry;

pub use entry::{Entry, OccupiedEntry, VacantEntry};

/// Validates that the start bound does not exceed the end bound under `comparator`.
///
/// # Panics
///
/// Panics if `start > end` or if `start == end` and both bounds are `Excluded`.
fn validate_range_bounds<T, C, R>(comparator: &C, range: &R)
where
    T: ?Sized,
    C: Comparator<T>,
    R: RangeBounds<T>,
{
    if let (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end)) =
        (range.start_bound(), range.end_bound())
    {
        let order = comparator.compare(start, end);
        let valid =
            if matches!(range.start_bound(), Bound::Excluded(_)) && matches!(range.end_bound(), Bound::Excluded(_)) {
                order == Ordering::Less
            } else {
                order != Ordering::Greater
            };
        assert!(valid, "range start is greater than range end in RBTreeMap");
    }
}

/// Turns a key and an inclusivity flag into a [`Bound`].
fn bound<Q: ?Sized>(key: &Q, inclusive: bool) -> Bound<&Q> {
    if inclusive { Bound::Included(key) } else { Bound::Excluded(key) }
}

/// An ordered map based on a [red-black tree].
///
/// Entries are kept in the order defined by the map's comparator `C`. By
/// default this is [`Natural`], the key type's [`Ord`] implementation; any
/// other [`Comparator`], including a closure, can be supplied with
/// [`with_comparator`](RBTreeMap::with_comparator). The comparator is fixed for
/// the life of the map.
///
/// Lookups, insertions and removals take O(log n) time. Iterators obtained from
/// functions such as [`RBTreeMap::iter`], [`RBTreeMap::into_iter`],
/// [`RBTreeMap::values`], or [`RBTreeMap::keys`] produce their items in key
/// order and take amortized constant time per item returned.
///
/// Besides the `BTreeMap`-style API, the map offers navigation relative to keys
/// that need not be present: [`floor`](RBTreeMap::floor),
/// [`ceiling`](RBTreeMap::ceiling), [`lower`](RBTreeMap::lower) and
/// [`higher`](RBTreeMap::higher), bounded traversals with early exit
/// ([`ascending_from`](RBTreeMap::ascending_from),
/// [`descending_from`](RBTreeMap::descending_from)), and extraction of a
/// sub-range into a new map ([`sub_map`](RBTreeMap::sub_map)).
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the comparator, changes while it is in the map. This is
/// normally only possible through [`Cell`], [`RefCell`], global state, I/O, or unsafe code.
/// The behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `RBTreeMap` that observed the logic error and not result in undefined behavior. This could
/// include panics, incorrect results, aborts, memory leaks, and non-termination.
///
/// The map is not synchronized. Share it across threads behind a lock.
///
/// # Examples
///
/// ```
/// use rbtree_collections::RBTreeMap;
///
/// // type inference lets us omit an explicit type signature (which
/// // would be `RBTreeMap<&str, &str>` in this example).
/// let mut movie_reviews = RBTreeMap::new();
///
/// // review some movies.
/// movie_reviews.insert("Office Space",       "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction",       "Masterpiece.");
/// movie_reviews.insert("The Godfather",      "Very enjoyable.");
/// movie_reviews.insert("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains_key("Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.",
///              movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// movie_reviews.remove("The Blues Brothers");
///
/// // the closest title at or before "P" alphabetically.
/// assert_eq!(movie_reviews.floor("P").map(|(k, _)| *k), Some("Office Space"));
///
/// // Look up the value for a key (will panic if the key is not found).
/// println!("Movie review: {}", movie_reviews["Office Space"]);
///
/// // iterate over everything.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// An `RBTreeMap` with a known list of items can be initialized from an array:
///
/// ```
/// use rbtree_collections::RBTreeMap;
///
/// let solar_distance = RBTreeMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
pub struct RBTreeMap<K, V, C = Natural> {
    raw: RawRBTree<K, V, C>,
}

/// An iterator over the entries of a `RBTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_collections::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    range: Range<'a, K, V>,
    remaining: usize,
}

/// A mutable iterator over the entries of a `RBTreeMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// [`iter_mut`]: RBTreeMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K: 'a, V: 'a> {
    range: RangeMut<'a, K, V>,
    remaining: usize,
}

/// An owning iterator over the entries of a `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeMap`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of a `RBTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`].
///
/// [`keys`]: RBTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`].
///
/// [`values`]: RBTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`RBTreeMap`].
///
/// [`values_mut`]: RBTreeMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

/// An owning iterator over the keys of a `RBTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`RBTreeMap`].
///
/// [`into_keys`]: RBTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`into_values`] method on [`RBTreeMap`].
///
/// [`into_values`]: RBTreeMap::into_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

/// An iterator over a sub-range of entries in a `RBTreeMap`.
///
/// This `struct` is created by the [`range`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// [`range`]: RBTreeMap::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K: 'a, V: 'a> {
    nodes: &'a Arena<Node<K>>,
    values: &'a Arena<V>,
    span: Span,
}

/// A mutable iterator over a sub-range of entries in a `RBTreeMap`.
///
/// This `struct` is created by the [`range_mut`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// [`range_mut`]: RBTreeMap::range_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct RangeMut<'a, K: 'a, V: 'a> {
    nodes: &'a Arena<Node<K>>,
    // Only the values are borrowed mutably; the links stay shared.
    values: *mut Arena<V>,
    span: Span,
    _marker: PhantomData<&'a mut V>,
}

// SAFETY: RangeMut behaves as (&Arena<Node<K>>, &mut Arena<V>).
// It is NOT Sync because mutable iterators should not be shared across threads.
unsafe impl<K: Sync, V: Send> Send for RangeMut<'_, K, V> {}

impl<K, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap` ordered by the keys' [`Ord`] implementation.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> RBTreeMap<K, V> {
        RBTreeMap {
            raw: RawRBTree::new(Natural),
        }
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Makes a new, empty `RBTreeMap` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::{Natural, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::with_comparator(Natural.reversed());
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        RBTreeMap {
            raw: RawRBTree::new(comparator),
        }
    }

    /// Returns the comparator that orders this map.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Clears the map, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get(key)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// This gives access to the stored key, which may differ from an equal
    /// lookup key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(map.get_key_value(&2), None);
    /// ```
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get_key_value(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.contains_key(&1), true);
    /// assert_eq!(map.contains_key(&2), false);
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.search(key).is_some()
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get_mut(key)
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|handle| self.raw.key_value(handle))
    }

    /// Returns the first entry in the map for in-place manipulation.
    /// The key of this entry is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// if let Some(mut entry) = map.first_entry() {
    ///     if *entry.key() > 0 {
    ///         entry.insert("first");
    ///     }
    /// }
    /// assert_eq!(*map.get(&1).unwrap(), "first");
    /// assert_eq!(*map.get(&2).unwrap(), "b");
    /// ```
    pub fn first_entry(&mut self) -> Option<OccupiedEntry<'_, K, V, C>> {
        let handle = self.raw.first()?;
        Some(OccupiedEntry {
            handle,
            tree: &mut self.raw,
        })
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|handle| self.raw.key_value(handle))
    }

    /// Returns the last entry in the map for in-place manipulation.
    /// The key of this entry is the maximum key in the map.
    pub fn last_entry(&mut self) -> Option<OccupiedEntry<'_, K, V, C>> {
        let handle = self.raw.last()?;
        Some(OccupiedEntry {
            handle,
            tree: &mut self.raw,
        })
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_last() {
    ///     assert!(map.iter().all(|(k, _v)| *k < key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    ///
    /// If the map did have this key present, the value is updated, and the old
    /// value is returned. The key is not updated, and the tree's shape and
    /// colors are left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        C: Comparator<K>,
    {
        self.raw.insert(key, value)
    }

    /// Inserts `key` with `value`, replacing the stored key as well if an equal
    /// one is present. Returns the key that was replaced.
    pub(crate) fn replace_key(&mut self, key: K, value: V) -> Option<K>
    where
        C: Comparator<K>,
    {
        match self.raw.search_slot(&key) {
            SearchResult::Found(handle) => {
                self.raw.replace_value(handle, value);
                Some(self.raw.replace_key(handle, key))
            }
            SearchResult::NotFound(position) => {
                self.raw.insert_at(position, key, value);
                None
            }
        }
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the key
    /// was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove(key)
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    ///
    /// `key` need not be present in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (3, 'b'), (5, 'c')]);
    /// assert_eq!(map.floor(&4), Some((&3, &'b')));
    /// assert_eq!(map.floor(&3), Some((&3, &'b')));
    /// assert_eq!(map.floor(&0), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.floor(key).map(|handle| self.raw.key_value(handle))
    }

    /// Returns the entry with the least key greater than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (3, 'b'), (5, 'c')]);
    /// assert_eq!(map.ceiling(&4), Some((&5, &'c')));
    /// assert_eq!(map.ceiling(&6), None);
    /// ```
    pub fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.ceiling(key).map(|handle| self.raw.key_value(handle))
    }

    /// Returns the entry with the greatest key strictly less than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (3, 'b'), (5, 'c')]);
    /// assert_eq!(map.lower(&3), Some((&1, &'a')));
    /// assert_eq!(map.lower(&1), None);
    /// ```
    pub fn lower<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.lower(key).map(|handle| self.raw.key_value(handle))
    }

    /// Returns the entry with the least key strictly greater than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (3, 'b'), (5, 'c')]);
    /// assert_eq!(map.higher(&3), Some((&5, &'c')));
    /// assert_eq!(map.higher(&5), None);
    /// ```
    pub fn higher<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.higher(key).map(|handle| self.raw.key_value(handle))
    }

    /// Visits entries in ascending order starting at `key` (if `inclusive`) or
    /// just after it, until the entries run out or `visit` returns
    /// [`ControlFlow::Break`].
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::ControlFlow;
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, ()> = (1..=9).map(|k| (k, ())).collect();
    /// let mut seen = Vec::new();
    /// map.ascending_from(&4, false, |&k, _| {
    ///     seen.push(k);
    ///     if k == 7 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    /// });
    /// assert_eq!(seen, [5, 6, 7]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + k) for k visited entries.
    pub fn ascending_from<Q, F>(&self, key: &Q, inclusive: bool, visit: F)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        let start = if inclusive { self.raw.ceiling(key) } else { self.raw.higher(key) };
        self.raw.walk(start, Side::Right, visit);
    }

    /// Visits entries in descending order starting at `key` (if `inclusive`) or
    /// just before it, until the entries run out or `visit` returns
    /// [`ControlFlow::Break`].
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::ControlFlow;
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (3, 'b'), (5, 'c')]);
    /// let mut seen = Vec::new();
    /// map.descending_from(&3, true, |&k, &v| {
    ///     seen.push((k, v));
    ///     ControlFlow::Continue(())
    /// });
    /// assert_eq!(seen, [(3, 'b'), (1, 'a')]);
    /// ```
    pub fn descending_from<Q, F>(&self, key: &Q, inclusive: bool, visit: F)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        let start = if inclusive { self.raw.floor(key) } else { self.raw.lower(key) };
        self.raw.walk(start, Side::Left, visit);
    }

    /// Copies the entries between `from` and `to` into a new map with the same
    /// comparator. Each boundary is independently inclusive or exclusive.
    ///
    /// Unlike [`range`](RBTreeMap::range), this never panics: a boundary with
    /// no matching entry, or boundaries that resolve out of order, give an
    /// empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, ()> = [1, 3, 5, 7, 9].into_iter().map(|k| (k, ())).collect();
    /// let keys = |m: &RBTreeMap<i32, ()>| m.keys().copied().collect::<Vec<_>>();
    ///
    /// assert_eq!(keys(&map.sub_map(&3, true, &7, false)), [3, 5]);
    /// assert_eq!(keys(&map.sub_map(&4, true, &7, true)), [5, 7]);
    /// assert!(map.sub_map(&100, true, &200, true).is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + k log k) for k copied entries.
    #[must_use]
    pub fn sub_map<Q>(&self, from: &Q, from_inclusive: bool, to: &Q, to_inclusive: bool) -> Self
    where
        K: Borrow<Q> + Clone,
        V: Clone,
        Q: ?Sized,
        C: Comparator<K> + Comparator<Q> + Clone,
    {
        let span = self.raw.span_between(bound(from, from_inclusive), bound(to, to_inclusive));
        let mut sub = RBTreeMap::with_comparator(self.raw.comparator().clone());
        sub.extend(self.range_over(span).map(|(k, v)| (k.clone(), v.clone())));
        sub
    }

    /// Constructs a double-ended iterator over a sub-range of elements in the map.
    /// The simplest way is to use the range syntax `min..max`, thus `range(min..max)` will
    /// yield elements from min (inclusive) to max (exclusive).
    /// The range may also be entered as `(Bound<T>, Bound<T>)`, so for example
    /// `range((Excluded(4), Included(10)))` will yield a left-exclusive, right-inclusive
    /// range from 4 to 10.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::Bound::Included;
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(3, "a");
    /// map.insert(5, "b");
    /// map.insert(8, "c");
    /// for (&key, &value) in map.range((Included(&4), Included(&8))) {
    ///     println!("{key}: {value}");
    /// }
    /// assert_eq!(Some((&5, &"b")), map.range(4..).next());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each iteration step is O(1) amortized.
    pub fn range<T, R>(&self, range: R) -> Range<'_, K, V>
    where
        T: ?Sized,
        K: Borrow<T>,
        C: Comparator<T>,
        R: RangeBounds<T>,
    {
        validate_range_bounds(self.raw.comparator(), &range);
        let span = self.raw.span_between(range.start_bound(), range.end_bound());
        self.range_over(span)
    }

    /// Constructs a mutable double-ended iterator over a sub-range of elements in the map.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, i32> =
    ///     [("Alice", 0), ("Bob", 0), ("Carol", 0), ("Cheryl", 0)].into();
    /// for (_, balance) in map.range_mut("B".."Cheryl") {
    ///     *balance += 100;
    /// }
    /// assert_eq!(map["Alice"], 0);
    /// assert_eq!(map["Bob"], 100);
    /// assert_eq!(map["Carol"], 100);
    /// assert_eq!(map["Cheryl"], 0);
    /// ```
    pub fn range_mut<T, R>(&mut self, range: R) -> RangeMut<'_, K, V>
    where
        T: ?Sized,
        K: Borrow<T>,
        C: Comparator<T>,
        R: RangeBounds<T>,
    {
        validate_range_bounds(self.raw.comparator(), &range);
        let span = self.raw.span_between(range.start_bound(), range.end_bound());
        self.range_mut_over(span)
    }

    fn range_over(&self, span: Span) -> Range<'_, K, V> {
        Range {
            nodes: self.raw.nodes(),
            values: self.raw.values(),
            span,
        }
    }

    fn range_mut_over(&mut self, span: Span) -> RangeMut<'_, K, V> {
        let (nodes, values) = self.raw.split_mut();
        RangeMut {
            nodes,
            values: core::ptr::from_mut(values),
            span,
            _marker: PhantomData,
        }
    }

    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut count: RBTreeMap<&str, usize> = RBTreeMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     count.entry(x).and_modify(|curr| *curr += 1).or_insert(1);
    /// }
    ///
    /// assert_eq!(count["a"], 3);
    /// assert_eq!(count["b"], 2);
    /// assert_eq!(count["c"], 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C>
    where
        C: Comparator<K>,
    {
        match self.raw.search_slot(&key) {
            SearchResult::Found(handle) => Entry::Occupied(OccupiedEntry {
                handle,
                tree: &mut self.raw,
            }),
            SearchResult::NotFound(position) => Entry::Vacant(VacantEntry {
                key,
                position,
                tree: &mut self.raw,
            }),
        }
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    /// The elements are visited in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// // Keep only the elements with even-numbered keys.
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n) in the worst case (when many elements are removed).
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.raw.retain(f);
    }

    /// Moves all elements from `other` into `self`, leaving `other` empty.
    ///
    /// If a key from `other` is already present in `self`, the respective
    /// value from `self` will be overwritten with the respective value from `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::from([(1, "a"), (3, "c")]);
    /// let mut b = RBTreeMap::from([(3, "d"), (4, "e")]);
    ///
    /// a.append(&mut b);
    ///
    /// assert_eq!(a.len(), 3);
    /// assert_eq!(b.len(), 0);
    /// assert_eq!(a[&3], "d");
    /// ```
    pub fn append(&mut self, other: &mut Self)
    where
        C: Comparator<K>,
    {
        if other.is_empty() {
            return;
        }
        self.extend(other.raw.drain_to_vec());
    }

    /// Rebuilds the map under a different comparator.
    ///
    /// A map's ordering can't change in place; this moves every entry into a new
    /// map ordered by `comparator`. Keys that are distinct under the old
    /// ordering but equal under the new one collapse, keeping the value of the
    /// last one in the old order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::{Natural, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// let map = map.rebuild_with(Natural.reversed());
    /// assert_eq!(map.first_key_value(), Some((&3, &'c')));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n)
    #[must_use]
    pub fn rebuild_with<D>(mut self, comparator: D) -> RBTreeMap<K, V, D>
    where
        D: Comparator<K>,
    {
        let entries = self.raw.drain_to_vec();
        let mut map = RBTreeMap {
            raw: RawRBTree::with_capacity(entries.len(), comparator),
        };
        map.extend(entries);
        map
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    /// The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<i32> = a.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    /// The map cannot be used after calling this.
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each iteration step is O(1) amortized.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            range: self.range_over(self.raw.span()),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([
    ///    ("a", 1),
    ///    ("b", 2),
    ///    ("c", 3),
    /// ]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 12, 13]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let remaining = self.raw.len();
        let span = self.raw.span();
        IterMut {
            range: self.range_mut_over(span),
            remaining,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(1, "hello");
    /// a.insert(2, "goodbye");
    ///
    /// let values: Vec<&str> = a.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

#[cfg(test)]
impl<K, V, C> RBTreeMap<K, V, C> {
    pub(crate) const fn raw(&self) -> &RawRBTree<K, V, C> {
        &self.raw
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RBTreeMap<K, V, C> {
    /// Deep-copies the map. The copy shares nothing with the original.
    fn clone(&self) -> Self {
        RBTreeMap { raw: self.raw.clone() }
    }
}

impl<K: Hash, V: Hash, C> Hash for RBTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RBTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for RBTreeMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for RBTreeMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C> Ord for RBTreeMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RBTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RBTreeMap<K, V, C> {
    fn default() -> Self {
        RBTreeMap::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for RBTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RBTreeMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Comparator<K>> Extend<(&'a K, &'a V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for RBTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V, C> Index<&Q> for RBTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `RBTreeMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (nodes, values) = (self.nodes, self.values);
        let node = nodes.get(self.span.next_front(nodes)?);
        Some((node.key(), values.get(node.value())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.span.is_empty() { (0, Some(0)) } else { (1, None) }
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (nodes, values) = (self.nodes, self.values);
        let node = nodes.get(self.span.next_back(nodes)?);
        Some((node.key(), values.get(node.value())))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            nodes: self.nodes,
            values: self.values,
            span: self.span,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for RangeMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = nodes.get(self.span.next_front(nodes)?);
        // SAFETY: `values` comes from a `&'a mut Arena<V>` and the span yields
        // each node once, so every value slot is borrowed at most once.
        let value = unsafe { Arena::get_mut_ptr(self.values, node.value()) };
        Some((node.key(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.span.is_empty() { (0, Some(0)) } else { (1, None) }
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for RangeMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = nodes.get(self.span.next_back(nodes)?);
        // SAFETY: Same as in next() - every node, and so every value slot, is yielded once.
        let value = unsafe { Arena::get_mut_ptr(self.values, node.value()) };
        Some((node.key(), value))
    }
}

impl<K, V> FusedIterator for RangeMut<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RangeMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keys only; the values may be mutably borrowed elsewhere.
        let mut span = self.span;
        let mut list = f.debug_list();
        while let Some(handle) = span.next_front(self.nodes) {
            list.entry(self.nodes.get(handle).key());
        }
        list.finish()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.range.next()?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.range.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            range: self.range.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.range.next()?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.range.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.range, f)
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    /// Creates an empty `rbtree_map::IntoIter`.
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a K> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a V> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a mut V> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for IntoKeys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(k, _)| k)).finish()
    }
}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for IntoValues<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(_, v)| v)).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    #[should_panic(expected = "range start is greater than range end in RBTreeMap")]
    fn inverted_range_panics() {
        let map: RBTreeMap<i32, ()> = (0..10).map(|k| (k, ())).collect();
        // Tuple bounds avoid clippy::reversed_empty_ranges.
        let _ = map.range((Bound::Included(7), Bound::Excluded(3)));
    }

    #[test]
    #[should_panic(expected = "range start is greater than range end in RBTreeMap")]
    fn equal_excluded_range_panics() {
        let map: RBTreeMap<i32, ()> = RBTreeMap::new();
        let _ = map.range((Bound::Excluded(3), Bound::Excluded(3)));
    }

    #[test]
    fn range_bounds_follow_the_comparator() {
        let natural: RBTreeMap<i32, ()> = (0..10).map(|k| (k, ())).collect();
        let map = natural.rebuild_with(Natural.reversed());
        // Under the reversed order 7 comes before 3.
        let keys: Vec<i32> = map.range((Bound::Included(7), Bound::Excluded(3))).map(|(k, ())| *k).collect();
        assert_eq!(keys, [7, 6, 5, 4]);
    }

    #[test]
    fn range_mut_touches_only_the_range() {
        let mut map: RBTreeMap<i32, i32> = (0..10).map(|k| (k, 0)).collect();
        for (_, v) in map.range_mut(3..=5).rev() {
            *v += 1;
        }
        let touched: Vec<i32> = map.iter().filter(|&(_, v)| *v == 1).map(|(k, _)| *k).collect();
        assert_eq!(touched, [3, 4, 5]);
        map.raw.validate_invariants();
    }

    #[test]
    fn iterators_meet_in_the_middle() {
        let map: RBTreeMap<i32, i32> = (0..5).map(|k| (k, k)).collect();
        let mut iter = map.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some((&0, &0)));
        assert_eq!(iter.next_back(), Some((&4, &4)));
        assert_eq!(iter.next(), Some((&1, &1)));
        assert_eq!(iter.next_back(), Some((&3, &3)));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next(), Some((&2, &2)));
        assert_eq!(iter.next_back(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn iter_mut_from_both_ends() {
        let mut map: RBTreeMap<i32, i32> = (0..6).map(|k| (k, k)).collect();
        let mut iter = map.iter_mut();
        while let Some((_, front)) = iter.next() {
            *front *= 10;
            if let Some((_, back)) = iter.next_back() {
                *back *= 100;
            }
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [0, 10, 20, 300, 400, 500]);
    }

    #[test]
    fn replace_key_swaps_stored_key() {
        let mut map: RBTreeMap<(i32, &str), (), _> =
            RBTreeMap::with_comparator(|a: &(i32, &str), b: &(i32, &str)| a.0.cmp(&b.0));
        assert_eq!(map.replace_key((1, "old"), ()), None);
        assert_eq!(map.replace_key((1, "new"), ()), Some((1, "old")));
        assert_eq!(map.first_key_value(), Some((&(1, "new"), &())));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn debug_output() {
        let mut map = RBTreeMap::from([(1, 'a'), (2, 'b')]);
        assert_eq!(alloc::format!("{map:?}"), "{1: 'a', 2: 'b'}");
        assert_eq!(alloc::format!("{:?}", map.keys()), "[1, 2]");
        assert_eq!(alloc::format!("{:?}", map.range_mut(2..)), "[2]");
    }
}
