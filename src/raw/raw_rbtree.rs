use core::borrow::Borrow;
use core::cmp::Ordering;
use core::ops::{Bound, ControlFlow};

use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::comparator::Comparator;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side, Span};

/// The red-black tree backing `RBTreeMap` and `RBTreeSet`.
///
/// Nodes and values live in two arenas and are linked by [`Handle`]s. Every
/// non-root node has a `parent` handle; it is a plain index, the arena owns
/// the node. Removing one entry never moves another, so handles of surviving
/// entries stay valid across removals.
pub(crate) struct RawRBTree<K, V, C> {
    /// Tree nodes: key, links and color.
    nodes: Arena<Node<K>>,
    /// Values, kept apart from the links so a value can be borrowed mutably
    /// while the structure is walked.
    values: Arena<V>,
    root: Option<Handle>,
    len: usize,
    cmp: C,
}

/// Outcome of looking a key up for insertion.
pub(crate) enum SearchResult {
    /// The key is stored in this node.
    Found(Handle),
    /// The key is absent. A new node would hang from the given side of the
    /// given parent, or become the root if there is no parent.
    NotFound(Option<(Handle, Side)>),
}

impl<K, V, C> RawRBTree<K, V, C> {
    /// Creates a new, empty tree ordered by `cmp`.
    pub(crate) const fn new(cmp: C) -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Creates a new tree with room for `capacity` entries.
    pub(crate) fn with_capacity(capacity: usize, cmp: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            cmp,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().min(self.values.capacity())
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Drops every entry.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) const fn nodes(&self) -> &Arena<Node<K>> {
        &self.nodes
    }

    pub(crate) const fn values(&self) -> &Arena<V> {
        &self.values
    }

    /// Borrows the structure shared and the values exclusively, at the same time.
    pub(crate) fn split_mut(&mut self) -> (&Arena<Node<K>>, &mut Arena<V>) {
        (&self.nodes, &mut self.values)
    }

    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &K {
        self.nodes.get(handle).key()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        self.values.get_mut(self.nodes.get(handle).value())
    }

    #[inline]
    pub(crate) fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (node.key(), self.values.get(node.value()))
    }

    #[inline]
    pub(crate) fn key_value_mut(&mut self, handle: Handle) -> (&K, &mut V) {
        let node = self.nodes.get(handle);
        (node.key(), self.values.get_mut(node.value()))
    }

    /// Replaces the value stored at `handle`, returning the old one.
    pub(crate) fn replace_value(&mut self, handle: Handle, value: V) -> V {
        core::mem::replace(self.value_mut(handle), value)
    }

    /// Replaces the key stored at `handle` with one that compares equal to it.
    pub(crate) fn replace_key(&mut self, handle: Handle, key: K) -> K {
        self.nodes.get_mut(handle).replace_key(key)
    }

    /// Leftmost node.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.nodes.extreme(root, Side::Left))
    }

    /// Rightmost node.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.nodes.extreme(root, Side::Right))
    }

    /// A span over every entry.
    pub(crate) fn span(&self) -> Span {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => Span::new(first, last),
            _ => Span::EMPTY,
        }
    }

    /// Visits entries from `start` onward, through successors for `Side::Right`
    /// and predecessors for `Side::Left`, until they run out or `visit` breaks.
    pub(crate) fn walk<F>(&self, start: Option<Handle>, direction: Side, mut visit: F)
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        let mut current = start;
        while let Some(handle) = current {
            let (key, value) = self.key_value(handle);
            if visit(key, value).is_break() {
                return;
            }
            current = self.nodes.step(handle, direction);
        }
    }

    /// Removes every entry, returning them in ascending order.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut order = Vec::with_capacity(self.len);
        let mut span = self.span();
        while let Some(handle) = span.next_front(&self.nodes) {
            order.push(handle);
        }

        let entries = order
            .into_iter()
            .map(|handle| {
                let (key, value) = self.nodes.take(handle).into_parts();
                (key, self.values.take(value))
            })
            .collect();
        self.clear();
        entries
    }

    /// Keeps only the entries for which `keep` returns `true`, visiting in ascending order.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut current = self.first();
        while let Some(handle) = current {
            // Removing `handle` leaves its successor's handle valid.
            current = self.nodes.successor(handle);
            let (key, value) = self.key_value_mut(handle);
            if !keep(key, value) {
                self.remove_node(handle);
            }
        }
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first()?;
        Some(self.remove_node(first))
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last()?;
        Some(self.remove_node(last))
    }

    /// Attaches a new entry at a position produced by [`SearchResult::NotFound`]
    /// and rebalances. Returns the new node's handle.
    pub(crate) fn insert_at(&mut self, position: Option<(Handle, Side)>, key: K, value: V) -> Handle {
        let value = self.values.alloc(value);
        let parent = position.map(|(parent, _)| parent);
        let handle = self.nodes.alloc(Node::new_red(key, value, parent));
        self.len += 1;

        match position {
            None => {
                debug_assert!(self.root.is_none(), "`RawRBTree::insert_at()` - root already exists!");
                self.root = Some(handle);
            }
            Some((parent, side)) => {
                debug_assert!(
                    self.nodes.get(parent).child(side).is_none(),
                    "`RawRBTree::insert_at()` - position is occupied!"
                );
                self.nodes.get_mut(parent).set_child(side, Some(handle));
            }
        }

        self.fix_after_insert(handle);
        handle
    }

    /// Restores the red-black invariants after `node` was attached red.
    fn fix_after_insert(&mut self, mut node: Handle) {
        while let Some(parent) = self.nodes.get(node).parent() {
            if !self.nodes.is_red(Some(parent)) {
                break;
            }
            let grandparent = self
                .nodes
                .get(parent)
                .parent()
                .expect("`RawRBTree::fix_after_insert()` - red node has no parent!");
            let side = self.nodes.get(grandparent).side_of(parent);
            let uncle = self.nodes.get(grandparent).child(side.opposite());

            if self.nodes.is_red(uncle) {
                // Push the red up a level and retry from the grandparent.
                self.nodes.paint(Some(parent), Color::Black);
                self.nodes.paint(uncle, Color::Black);
                self.nodes.paint(Some(grandparent), Color::Red);
                node = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.nodes.get(parent).side_of(node) != side {
                // Inner grandchild: turn it into the outer case.
                self.rotate(parent, side);
                parent = node;
            }
            self.nodes.paint(Some(parent), Color::Black);
            self.nodes.paint(Some(grandparent), Color::Red);
            self.rotate(grandparent, side.opposite());
            break;
        }
        self.nodes.paint(self.root, Color::Black);
    }

    /// Unlinks the node at `handle`, rebalances, and returns its entry.
    pub(crate) fn remove_node(&mut self, target: Handle) -> (K, V) {
        let node = self.nodes.get(target);
        let (left, right) = (node.left(), node.right());

        // `vacated` is whatever now fills the position that physically lost a
        // node, and `vacated_parent` is that position's parent.
        let (removed_color, vacated, vacated_parent) = match (left, right) {
            (Some(left), Some(right)) => {
                // The successor takes `target`'s place, links and color.
                let successor = self.nodes.extreme(right, Side::Left);
                let removed_color = self.nodes.get(successor).color();
                let vacated = self.nodes.get(successor).right();
                let vacated_parent = if successor == right {
                    Some(successor)
                } else {
                    let parent = self.nodes.get(successor).parent();
                    self.transplant(successor, vacated);
                    self.nodes.get_mut(successor).set_child(Side::Right, Some(right));
                    self.nodes.get_mut(right).set_parent(Some(successor));
                    parent
                };

                self.transplant(target, Some(successor));
                self.nodes.get_mut(successor).set_child(Side::Left, Some(left));
                self.nodes.get_mut(left).set_parent(Some(successor));
                let color = self.nodes.get(target).color();
                self.nodes.get_mut(successor).set_color(color);

                (removed_color, vacated, vacated_parent)
            }
            (child, None) | (None, child) => {
                let removed_color = node.color();
                let parent = node.parent();
                self.transplant(target, child);
                (removed_color, child, parent)
            }
        };

        if removed_color == Color::Black {
            self.fix_after_remove(vacated, vacated_parent);
        }

        self.len -= 1;
        let (key, value) = self.nodes.take(target).into_parts();
        (key, self.values.take(value))
    }

    /// Restores black-height after a black node was removed above `node`.
    ///
    /// `node` is one black short and may be absent, so its parent is tracked
    /// separately.
    fn fix_after_remove(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while node != self.root && !self.nodes.is_red(node) {
            let Some(above) = parent else {
                break;
            };
            let side = if self.nodes.get(above).left() == node {
                Side::Left
            } else {
                Side::Right
            };
            let far = side.opposite();

            let mut sibling = self.sibling(above, far);
            if self.nodes.is_red(Some(sibling)) {
                self.nodes.paint(Some(sibling), Color::Black);
                self.nodes.paint(Some(above), Color::Red);
                self.rotate(above, side);
                sibling = self.sibling(above, far);
            }

            let near_child = self.nodes.get(sibling).child(side);
            let far_child = self.nodes.get(sibling).child(far);
            if !self.nodes.is_red(near_child) && !self.nodes.is_red(far_child) {
                self.nodes.paint(Some(sibling), Color::Red);
                node = Some(above);
                parent = self.nodes.get(above).parent();
                continue;
            }

            if !self.nodes.is_red(far_child) {
                self.nodes.paint(near_child, Color::Black);
                self.nodes.paint(Some(sibling), Color::Red);
                self.rotate(sibling, far);
                sibling = self.sibling(above, far);
            }

            let color = self.nodes.get(above).color();
            self.nodes.paint(Some(sibling), color);
            self.nodes.paint(Some(above), Color::Black);
            let far_child = self.nodes.get(sibling).child(far);
            self.nodes.paint(far_child, Color::Black);
            self.rotate(above, side);
            node = self.root;
            break;
        }
        self.nodes.paint(node, Color::Black);
    }

    /// The child of `parent` on `side`, which balance guarantees exists.
    fn sibling(&self, parent: Handle, side: Side) -> Handle {
        self.nodes
            .get(parent)
            .child(side)
            .expect("`RawRBTree::fix_after_remove()` - deficient node has no sibling!")
    }

    /// Rotates `pivot` down toward `direction`, promoting its child on the other
    /// side. `rotate(p, Side::Left)` is a left rotation.
    fn rotate(&mut self, pivot: Handle, direction: Side) {
        let up = direction.opposite();
        let promoted = self.nodes.get(pivot).child(up).expect("`RawRBTree::rotate()` - no child to promote!");
        let inner = self.nodes.get(promoted).child(direction);

        self.nodes.get_mut(pivot).set_child(up, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(pivot));
        }

        let parent = self.nodes.get(pivot).parent();
        self.replace_child(parent, pivot, Some(promoted));
        self.nodes.get_mut(promoted).set_parent(parent);

        self.nodes.get_mut(promoted).set_child(direction, Some(pivot));
        self.nodes.get_mut(pivot).set_parent(Some(promoted));
    }

    /// Puts `new` in the position `old` occupies under its parent. `old`'s own
    /// links are left as they are.
    fn transplant(&mut self, old: Handle, new: Option<Handle>) {
        let parent = self.nodes.get(old).parent();
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.nodes.get_mut(new).set_parent(parent);
        }
    }

    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.nodes.get(parent).side_of(old);
                self.nodes.get_mut(parent).set_child(side, new);
            }
        }
    }
}

impl<K, V, C> RawRBTree<K, V, C> {
    /// Finds `key`, or the position where it would be attached.
    pub(crate) fn search_slot<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let Some(mut current) = self.root else {
            return SearchResult::NotFound(None);
        };

        loop {
            let node = self.nodes.get(current);
            let side = match self.cmp.compare(key, node.key().borrow()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return SearchResult::Found(current),
            };
            match node.child(side) {
                Some(child) => current = child,
                None => return SearchResult::NotFound(Some((current, side))),
            }
        }
    }

    /// Returns the node holding `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        match self.search_slot(key) {
            SearchResult::Found(handle) => Some(handle),
            SearchResult::NotFound(_) => None,
        }
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key)?;
        Some(self.key_value(handle).1)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key)?;
        Some(self.value_mut(handle))
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key)?;
        Some(self.key_value(handle))
    }

    /// Removes `key`, returning its entry.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key)?;
        Some(self.remove_node(handle))
    }

    /// The node closest to `key` on `side` of it: `Side::Left` gives floor
    /// (`inclusive`) or lower, `Side::Right` gives ceiling or higher.
    pub(crate) fn nearest<Q>(&self, key: &Q, side: Side, inclusive: bool) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let wanted = match side {
            Side::Left => Ordering::Less,
            Side::Right => Ordering::Greater,
        };

        let mut best = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let ord = self.cmp.compare(node.key().borrow(), key);
            if ord == Ordering::Equal && inclusive {
                return Some(handle);
            }
            if ord == wanted {
                // A candidate; anything closer lies back toward `key`.
                best = Some(handle);
                current = node.child(side.opposite());
            } else {
                current = node.child(side);
            }
        }
        best
    }

    /// Greatest key less than or equal to `key`.
    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.nearest(key, Side::Left, true)
    }

    /// Least key greater than or equal to `key`.
    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.nearest(key, Side::Right, true)
    }

    /// Greatest key strictly less than `key`.
    pub(crate) fn lower<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.nearest(key, Side::Left, false)
    }

    /// Least key strictly greater than `key`.
    pub(crate) fn higher<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.nearest(key, Side::Right, false)
    }

    /// Resolves a pair of bounds to the span of entries between them.
    ///
    /// The span is empty when either bound has no matching entry or when the
    /// resolved start orders after the resolved end.
    pub(crate) fn span_between<Q>(&self, start: Bound<&Q>, end: Bound<&Q>) -> Span
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let front = match start {
            Bound::Unbounded => self.first(),
            Bound::Included(key) => self.ceiling(key),
            Bound::Excluded(key) => self.higher(key),
        };
        let back = match end {
            Bound::Unbounded => self.last(),
            Bound::Included(key) => self.floor(key),
            Bound::Excluded(key) => self.lower(key),
        };

        match (front, back) {
            (Some(front), Some(back))
                if self.cmp.compare(self.key(front).borrow(), self.key(back).borrow()) != Ordering::Greater =>
            {
                Span::new(front, back)
            }
            _ => Span::EMPTY,
        }
    }
}

impl<K, V, C: Comparator<K>> RawRBTree<K, V, C> {
    /// Inserts an entry. An existing key keeps its node and has its value replaced.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.search_slot(&key) {
            SearchResult::Found(handle) => Some(self.replace_value(handle, value)),
            SearchResult::NotFound(position) => {
                self.insert_at(position, key, value);
                None
            }
        }
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RawRBTree<K, V, C> {
    /// Copies the tree shape and colors into fresh, compacted arenas.
    fn clone(&self) -> Self {
        let mut nodes = Arena::with_capacity(self.len);
        let mut values = Arena::with_capacity(self.len);
        let mut root = None;

        // (node to copy, where its copy attaches)
        let mut pending: SmallVec<[(Handle, Option<(Handle, Side)>); 32]> = SmallVec::new();
        if let Some(source_root) = self.root {
            pending.push((source_root, None));
        }

        while let Some((source, attach)) = pending.pop() {
            let node = self.nodes.get(source);
            let value = values.alloc(self.values.get(node.value()).clone());
            let mut copy = Node::new_red(node.key().clone(), value, attach.map(|(parent, _)| parent));
            copy.set_color(node.color());
            let handle = nodes.alloc(copy);

            match attach {
                None => root = Some(handle),
                Some((parent, side)) => nodes.get_mut(parent).set_child(side, Some(handle)),
            }
            for side in [Side::Left, Side::Right] {
                if let Some(child) = node.child(side) {
                    pending.push((child, Some((handle, side))));
                }
            }
        }

        Self {
            nodes,
            values,
            root,
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::comparator::Natural;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use core::fmt::Debug;
    use proptest::prelude::*;

    impl<K: Debug, V, C: Comparator<K>> RawRBTree<K, V, C> {
        /// Checks every red-black and bookkeeping invariant, panicking with a
        /// list of violations.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut reachable = 0;

            if let Some(root) = self.root {
                let node = self.nodes.get(root);
                if node.parent().is_some() {
                    errors.push("root has a parent".into());
                }
                if node.color() == Color::Red {
                    errors.push("root is red".into());
                }
                self.validate_node(root, None, None, &mut reachable, &mut errors);
            }

            if reachable != self.len {
                errors.push(alloc::format!("len={} but {} nodes are reachable", self.len, reachable));
            }
            if self.nodes.len() != self.len || self.values.len() != self.len {
                errors.push(alloc::format!(
                    "len={} but arenas hold {} nodes and {} values",
                    self.len,
                    self.nodes.len(),
                    self.values.len()
                ));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns the black-height of the subtree at `handle`.
        fn validate_node(
            &self,
            handle: Handle,
            lower: Option<&K>,
            upper: Option<&K>,
            reachable: &mut usize,
            errors: &mut Vec<String>,
        ) -> usize {
            *reachable += 1;
            let node = self.nodes.get(handle);
            let key = node.key();

            if let Some(lower) = lower
                && self.cmp.compare(lower, key) != Ordering::Less
            {
                errors.push(alloc::format!("{key:?} is not greater than ancestor {lower:?}"));
            }
            if let Some(upper) = upper
                && self.cmp.compare(key, upper) != Ordering::Less
            {
                errors.push(alloc::format!("{key:?} is not less than ancestor {upper:?}"));
            }
            if node.color() == Color::Red && (self.nodes.is_red(node.left()) || self.nodes.is_red(node.right())) {
                errors.push(alloc::format!("red node {key:?} has a red child"));
            }

            let mut heights = [0; 2];
            for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
                if let Some(child) = node.child(side) {
                    if self.nodes.get(child).parent() != Some(handle) {
                        errors.push(alloc::format!("child of {key:?} does not point back to it"));
                    }
                    let (lo, hi) = match side {
                        Side::Left => (lower, Some(key)),
                        Side::Right => (Some(key), upper),
                    };
                    heights[slot] = self.validate_node(child, lo, hi, reachable, errors);
                }
            }
            if heights[0] != heights[1] {
                errors.push(alloc::format!("black-height mismatch under {key:?}: {heights:?}"));
            }

            heights[0] + usize::from(node.color() == Color::Black)
        }

        /// Number of nodes on the longest root-to-leaf path.
        pub(crate) fn height(&self) -> usize {
            fn depth<K>(nodes: &Arena<Node<K>>, handle: Option<Handle>) -> usize {
                handle.map_or(0, |h| {
                    let node = nodes.get(h);
                    1 + depth(nodes, node.left()).max(depth(nodes, node.right()))
                })
            }
            depth(&self.nodes, self.root)
        }

        fn keys(&self) -> Vec<&K> {
            let mut keys = Vec::new();
            let mut span = self.span();
            while let Some(handle) = span.next_front(&self.nodes) {
                keys.push(self.key(handle));
            }
            keys
        }
    }

    fn assert_balanced<K: Debug, V, C: Comparator<K>>(tree: &RawRBTree<K, V, C>) {
        tree.validate_invariants();
        // height <= 2 * log2(n + 1)  <=>  2^height <= (n + 1)^2
        let n = tree.len() + 1;
        assert!(
            1usize << tree.height() <= n * n,
            "height {} exceeds the red-black bound for {} entries",
            tree.height(),
            tree.len()
        );
    }

    fn tree_of(keys: &[i32]) -> RawRBTree<i32, i32, Natural> {
        let mut tree = RawRBTree::new(Natural);
        for &key in keys {
            tree.insert(key, key * 10);
        }
        tree
    }

    fn entries_of(tree: &RawRBTree<i32, i32, Natural>) -> Vec<(i32, i32)> {
        let mut entries = Vec::new();
        tree.walk(tree.first(), Side::Right, |&k, &v| {
            entries.push((k, v));
            ControlFlow::Continue(())
        });
        entries
    }

    fn adversarial_orders(n: i32) -> [Vec<i32>; 3] {
        let ascending: Vec<i32> = (0..n).collect();
        let descending: Vec<i32> = (0..n).rev().collect();
        let alternating: Vec<i32> = (0..n).map(|i| if i % 2 == 0 { i / 2 } else { n - 1 - i / 2 }).collect();
        [ascending, descending, alternating]
    }

    #[test]
    fn empty_tree() {
        let mut tree: RawRBTree<i32, i32, Natural> = RawRBTree::new(Natural);
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.remove(&1), None);
        assert_eq!(tree.pop_first(), None);
        assert!(tree.span().is_empty());
        assert_eq!(tree.floor(&0), None);
    }

    #[test]
    fn first_insert_is_black_root() {
        let tree = tree_of(&[42]);
        tree.validate_invariants();
        let root = tree.root.unwrap();
        assert_eq!(tree.nodes.get(root).color(), Color::Black);
        assert_eq!(tree.key_value(root), (&42, &420));
    }

    #[test]
    fn overwrite_keeps_node_and_shape() {
        let mut tree = tree_of(&[2, 1, 3]);
        let before = tree.search(&3).unwrap();
        assert_eq!(tree.insert(3, 99), Some(30));
        assert_eq!(tree.search(&3), Some(before));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(&3), Some(&99));
        tree.validate_invariants();
    }

    #[test]
    fn height_bound_holds_while_inserting_adversarial_orders() {
        for order in adversarial_orders(600) {
            let mut tree = RawRBTree::new(Natural);
            for key in order {
                tree.insert(key, ());
                assert_balanced(&tree);
            }
        }
    }

    #[test]
    fn height_bound_holds_while_removing_adversarial_orders() {
        for order in adversarial_orders(600) {
            let mut tree = tree_of(&(0..600).collect::<Vec<_>>());
            for key in order {
                assert_eq!(tree.remove(&key), Some((key, key * 10)));
                assert_balanced(&tree);
            }
            assert!(tree.is_empty());
            assert_eq!(tree.root, None);
        }
    }

    #[test]
    fn removing_two_child_node_keeps_order() {
        let mut tree = tree_of(&[10, 5, 15, 3, 7, 12, 20]);
        let handle = tree.search(&10).unwrap();
        let node = tree.nodes.get(handle);
        assert!(node.left().is_some() && node.right().is_some());

        assert_eq!(tree.remove(&10), Some((10, 100)));
        tree.validate_invariants();
        assert_eq!(tree.keys(), [&3, &5, &7, &12, &15, &20]);
    }

    #[test]
    fn handles_survive_removal_of_other_nodes() {
        let mut tree = tree_of(&(0..64).collect::<Vec<_>>());
        let handles: Vec<(i32, Handle)> = (0..64).map(|k| (k, tree.search(&k).unwrap())).collect();

        // The root always has two children here, so this exercises successor relinking.
        let root_key = *tree.key(tree.root.unwrap());
        tree.remove(&root_key);
        for &(key, handle) in &handles {
            if key != root_key {
                assert_eq!(tree.key_value(handle), (&key, &(key * 10)));
            }
        }
        tree.validate_invariants();
    }

    #[test]
    fn navigation_on_odd_keys() {
        let tree = tree_of(&[1, 3, 5, 7, 9]);
        let key = |h: Option<Handle>| h.map(|h| *tree.key(h));

        assert_eq!(key(tree.floor(&6)), Some(5));
        assert_eq!(key(tree.ceiling(&6)), Some(7));
        assert_eq!(key(tree.floor(&5)), Some(5));
        assert_eq!(key(tree.ceiling(&5)), Some(5));
        assert_eq!(key(tree.lower(&5)), Some(3));
        assert_eq!(key(tree.higher(&5)), Some(7));
        assert_eq!(key(tree.floor(&0)), None);
        assert_eq!(key(tree.ceiling(&10)), None);
        assert_eq!(key(tree.lower(&1)), None);
        assert_eq!(key(tree.higher(&9)), None);
        assert_eq!(key(tree.floor(&100)), Some(9));
        assert_eq!(key(tree.first()), Some(1));
        assert_eq!(key(tree.last()), Some(9));
    }

    #[test]
    fn spans_resolve_inclusivity() {
        let tree = tree_of(&[1, 3, 5, 7, 9]);
        let collect = |mut span: Span| {
            let mut out = Vec::new();
            while let Some(h) = span.next_front(&tree.nodes) {
                out.push(*tree.key(h));
            }
            out
        };

        assert_eq!(collect(tree.span_between(Bound::Included(&3), Bound::Excluded(&7))), [3, 5]);
        assert_eq!(collect(tree.span_between(Bound::Included(&4), Bound::Included(&7))), [5, 7]);
        assert_eq!(collect(tree.span_between(Bound::Excluded(&3), Bound::Unbounded)), [5, 7, 9]);
        assert_eq!(collect(tree.span_between(Bound::Included(&100), Bound::Included(&200))), [0; 0]);
        assert_eq!(collect(tree.span_between(Bound::Included(&4), Bound::Included(&4))), [0; 0]);
        assert_eq!(collect(tree.span_between(Bound::Included(&7), Bound::Included(&3))), [0; 0]);
    }

    #[test]
    fn walk_stops_on_break() {
        let tree = tree_of(&[1, 2, 3, 4, 5]);
        let mut seen = vec![];
        tree.walk(tree.ceiling(&2), Side::Right, |&k, _| {
            seen.push(k);
            if k == 4 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        });
        assert_eq!(seen, [2, 3, 4]);

        seen.clear();
        tree.walk(tree.lower(&4), Side::Left, |&k, _| {
            seen.push(k);
            ControlFlow::Continue(())
        });
        assert_eq!(seen, [3, 2, 1]);
    }

    #[test]
    fn clone_is_compact_and_independent() {
        let mut tree = tree_of(&(0..100).collect::<Vec<_>>());
        for key in (0..100).step_by(3) {
            tree.remove(&key);
        }

        let mut copy = tree.clone();
        copy.validate_invariants();
        assert_eq!(copy.keys(), tree.keys());
        assert_eq!(copy.height(), tree.height());

        let before = entries_of(&tree);
        copy.insert(1000, 0);
        copy.remove(&1);
        assert_eq!(entries_of(&tree), before);
        tree.validate_invariants();

        let copied = entries_of(&copy);
        tree.insert(2000, 0);
        tree.remove(&2);
        tree.remove(&4);
        assert_eq!(entries_of(&copy), copied);
        copy.validate_invariants();
    }

    #[test]
    fn retain_and_drain() {
        let mut tree = tree_of(&(0..50).collect::<Vec<_>>());
        tree.retain(|k, v| {
            *v += 1;
            k % 2 == 0
        });
        tree.validate_invariants();
        assert_eq!(tree.len(), 25);
        assert_eq!(tree.get(&4), Some(&41));

        let drained = tree.drain_to_vec();
        assert_eq!(drained.first(), Some(&(0, 1)));
        assert_eq!(drained.last(), Some(&(48, 481)));
        assert!(drained.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(tree.is_empty());
        tree.validate_invariants();
    }

    #[test]
    fn reversed_comparator_orders_descending() {
        let mut tree = RawRBTree::new(Natural.reversed());
        for key in [3, 1, 4, 1, 5, 9, 2, 6] {
            tree.insert(key, ());
        }
        tree.validate_invariants();
        assert_eq!(tree.keys(), [&9, &6, &5, &4, &3, &2, &1]);
        // "floor" follows the comparator, not the numeric order.
        assert_eq!(tree.floor(&7).map(|h| *tree.key(h)), Some(9));
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        PopFirst,
        PopLast,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..400).prop_map(Op::Insert),
            4 => (0i32..400).prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..600)) {
            let mut tree: RawRBTree<i32, i32, Natural> = RawRBTree::new(Natural);
            let mut model: BTreeMap<i32, i32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        prop_assert_eq!(tree.insert(key, key * 2), model.insert(key, key * 2));
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(tree.remove(&key), model.remove_entry(&key));
                    }
                    Op::PopFirst => prop_assert_eq!(tree.pop_first(), model.pop_first()),
                    Op::PopLast => prop_assert_eq!(tree.pop_last(), model.pop_last()),
                }
                assert_balanced(&tree);
                prop_assert_eq!(tree.keys(), model.keys().collect::<Vec<_>>());
            }
        }

        #[test]
        fn navigation_matches_model(keys in prop::collection::btree_set(-500i32..500, 0..200), probe in -600i32..600) {
            let tree = tree_of(&keys.iter().copied().collect::<Vec<_>>());
            let key = |h: Option<Handle>| h.map(|h| *tree.key(h));

            prop_assert_eq!(key(tree.floor(&probe)), keys.range(..=probe).next_back().copied());
            prop_assert_eq!(key(tree.lower(&probe)), keys.range(..probe).next_back().copied());
            prop_assert_eq!(key(tree.ceiling(&probe)), keys.range(probe..).next().copied());
            prop_assert_eq!(
                key(tree.higher(&probe)),
                keys.range((Bound::Excluded(probe), Bound::Unbounded)).next().copied()
            );
        }
    }
}
