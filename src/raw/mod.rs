mod arena;
mod handle;
mod node;
mod raw_rbtree;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use node::{Node, Side, Span};
pub(crate) use raw_rbtree::{RawRBTree, SearchResult};
