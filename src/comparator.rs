use core::cmp::Ordering;

/// A total order over `T`, supplied to a collection at construction.
///
/// The collections in this crate never compare keys any other way, so a
/// comparator must be a strict total order and must not change its answers
/// while it is in use.
///
/// Any `Fn(&T, &T) -> Ordering` closure or function is a comparator. [`Natural`]
/// uses `T`'s [`Ord`] implementation, and [`reversed`](Comparator::reversed)
/// inverts any comparator.
///
/// # Examples
///
/// ```
/// use rbtree_collections::{Natural, RBTreeMap};
///
/// // Order strings by length, then alphabetically.
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len()).then(a.cmp(b));
/// let mut map = RBTreeMap::with_comparator(by_len);
/// map.insert("ccc", 3);
/// map.insert("a", 1);
/// map.insert("bb", 2);
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "bb", "ccc"]);
///
/// let mut desc = RBTreeMap::with_comparator(Natural.reversed());
/// desc.insert(1, ());
/// desc.insert(2, ());
/// assert_eq!(desc.first_key_value(), Some((&2, &())));
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Returns a comparator that orders in the opposite direction.
    #[must_use]
    fn reversed(self) -> Reversed<Self>
    where
        Self: Sized,
    {
        Reversed(self)
    }
}

/// Orders by the key type's [`Ord`] implementation.
///
/// This is the default comparator of [`RBTreeMap`](crate::RBTreeMap) and
/// [`RBTreeSet`](crate::RBTreeSet). It compares any borrowed form of the key,
/// so a `RBTreeMap<String, _>` can be queried with `&str`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl Natural {
    /// Returns the descending natural order.
    #[must_use]
    pub const fn reversed(self) -> Reversed<Self> {
        Reversed(self)
    }
}

impl<T: ?Sized + Ord> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts the order of the wrapped comparator.
///
/// Created by [`Comparator::reversed`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reversed<C>(pub C);

impl<C> Reversed<C> {
    /// Returns a comparator that orders in the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Reversed<Self> {
        Reversed(self)
    }
}

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
