use super::arena::Arena;
use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child link of a node.
///
/// Every mirrored case in the balancing code is written once in terms of a
/// `Side` and its [`opposite`](Side::opposite).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A red-black tree node. The value lives in a separate arena.
pub(crate) struct Node<K> {
    key: K,
    value: Handle,
    color: Color,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a detached red node.
    pub(crate) const fn new_red(key: K, value: Handle, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> Handle {
        self.value
    }

    /// Swaps in an equal key, returning the old one.
    pub(crate) fn replace_key(&mut self, key: K) -> K {
        core::mem::replace(&mut self.key, key)
    }

    /// Consumes the node, returning its key and value handle.
    pub(crate) fn into_parts(self) -> (K, Handle) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns which side `child` hangs from. `child` must be a child of this node.
    #[inline]
    pub(crate) fn side_of(&self, child: Handle) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(self.right, Some(child), "`Node::side_of()` - not a child of this node!");
            Side::Right
        }
    }
}

// Structural walks. These only follow links, so they need no comparator.
impl<K> Arena<Node<K>> {
    /// Color of a possibly absent node. Absent nodes are black.
    #[inline]
    pub(crate) fn color_of(&self, handle: Option<Handle>) -> Color {
        handle.map_or(Color::Black, |h| self.get(h).color())
    }

    #[inline]
    pub(crate) fn is_red(&self, handle: Option<Handle>) -> bool {
        self.color_of(handle) == Color::Red
    }

    /// Recolors a possibly absent node. Recoloring an absent node does nothing.
    #[inline]
    pub(crate) fn paint(&mut self, handle: Option<Handle>, color: Color) {
        if let Some(h) = handle {
            self.get_mut(h).set_color(color);
        }
    }

    /// Follows `side` links from `handle` as far as they go.
    pub(crate) fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(next) = self.get(handle).child(side) {
            handle = next;
        }
        handle
    }

    /// The in-order neighbour of `handle` in direction `side`: the successor for
    /// `Side::Right`, the predecessor for `Side::Left`.
    pub(crate) fn step(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.get(handle).child(side) {
            return Some(self.extreme(child, side.opposite()));
        }

        // Climb while we are arriving from the `side` child.
        let mut current = handle;
        while let Some(parent) = self.get(current).parent() {
            if self.get(parent).child(side) == Some(current) {
                current = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }

    #[inline]
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Side::Right)
    }

    #[inline]
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Side::Left)
    }
}

/// The not-yet-visited stretch of an in-order walk, from `front` to `back` inclusive.
///
/// Both ends advance toward each other; the span is exhausted once they have
/// met. `front` must not order after `back`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Span {
    front: Option<Handle>,
    back: Option<Handle>,
}

impl Span {
    pub(crate) const EMPTY: Span = Span { front: None, back: None };

    pub(crate) const fn new(front: Handle, back: Handle) -> Self {
        Span {
            front: Some(front),
            back: Some(back),
        }
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.front.is_none()
    }

    pub(crate) fn next_front<K>(&mut self, nodes: &Arena<Node<K>>) -> Option<Handle> {
        let current = self.front?;
        if self.front == self.back {
            *self = Span::EMPTY;
        } else {
            self.front = nodes.successor(current);
        }
        Some(current)
    }

    pub(crate) fn next_back<K>(&mut self, nodes: &Arena<Node<K>>) -> Option<Handle> {
        let current = self.back?;
        if self.front == self.back {
            *self = Span::EMPTY;
        } else {
            self.back = nodes.predecessor(current);
        }
        Some(current)
    }
}
