//! Red-black tree ordered collections for Rust.
//!
//! This crate provides [`RBTreeMap`] and [`RBTreeSet`]: sorted collections with the
//! familiar `BTreeMap`/`BTreeSet` API, ordered by a pluggable [`Comparator`], plus
//! navigation relative to arbitrary keys:
//!
//! - [`floor`](RBTreeMap::floor) / [`ceiling`](RBTreeMap::ceiling) - nearest key at or below / above
//! - [`lower`](RBTreeMap::lower) / [`higher`](RBTreeMap::higher) - nearest key strictly below / above
//! - [`ascending_from`](RBTreeMap::ascending_from) / [`descending_from`](RBTreeMap::descending_from) -
//!   ordered traversal from a key, stoppable from the visitor
//! - [`sub_map`](RBTreeMap::sub_map) - copy of the entries between two keys
//!
//! # Example
//!
//! ```
//! use rbtree_collections::{Natural, RBTreeMap};
//!
//! let mut prices = RBTreeMap::new();
//! prices.insert(100, "bid");
//! prices.insert(105, "mid");
//! prices.insert(110, "ask");
//!
//! // Nearest entries around a key that is not present.
//! assert_eq!(prices.floor(&107), Some((&105, &"mid")));
//! assert_eq!(prices.higher(&105), Some((&110, &"ask")));
//!
//! // The same entries, newest-first.
//! let descending = prices.rebuild_with(Natural.reversed());
//! assert_eq!(descending.first_key_value(), Some((&110, &"ask")));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Custom ordering** - Any [`Comparator`], including closures and [`Reversed`] orders
//! - **Guaranteed O(log n)** - Red-black balancing keeps the height within 2·log2(n + 1)
//! - **`serde`** (optional feature) - Serialize and deserialize both collections
//!
//! # Implementation
//!
//! Nodes live in a slot arena and link to each other by 32-bit handles rather than
//! pointers; values are stored in a second arena. Removing an entry never moves
//! another, and freed slots are reused by later insertions.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: Mutable iteration hands out disjoint `&mut V` from one arena, which needs unsafe code.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod comparator;
mod raw;

pub mod rbtree_map;
pub mod rbtree_set;

#[cfg(feature = "serde")]
mod serde_impl;

pub use comparator::{Comparator, Natural, Reversed};
pub use rbtree_map::RBTreeMap;
pub use rbtree_set::RBTreeSet;
