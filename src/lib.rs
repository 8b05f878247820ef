//! A generic red-black tree engine for ordered containers.
//!
//! [`RbTree`] stores values in sorted order and is meant to sit underneath set, multiset, map
//! and multimap facades. One tree type covers all four:
//!
//! - a [`KeyOf`] strategy extracts the ordering key from each stored value ([`Identity`] for
//!   sets, [`First`] for `(key, value)` pairs);
//! - a [`Compare`] strategy orders keys ([`Natural`], [`Reverse`] or any closure);
//! - each insertion picks its duplicate policy: [`insert_unique`](RbTree::insert_unique)
//!   rejects equivalent keys, [`insert_equal`](RbTree::insert_equal) keeps them in insertion
//!   order.
//!
//! Elements are addressed through [`Position`]s, which stay valid until their own element is
//! erased.
//!
//! # Example
//!
//! ```
//! use redwood_tree::{First, Natural, RbTree};
//!
//! // A multimap from score to player.
//! let mut scores: RbTree<(u32, &str), First> = RbTree::with_comparator(Natural);
//! scores.insert_equal((85, "Bob"));
//! scores.insert_equal((100, "Alice"));
//! scores.insert_equal((85, "Carol"));
//!
//! let (first, last) = scores.equal_range(&85);
//! let tied: Vec<_> = scores.iter_between(first, last).map(|&(_, name)| name).collect();
//! assert_eq!(tied, ["Bob", "Carol"]);
//!
//! // Positions survive unrelated erasures.
//! let alice = scores.find(&100);
//! scores.erase_key(&85);
//! assert_eq!(scores.get(alice), Some(&(100, "Alice")));
//! assert_eq!(scores.len(), 1);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Stable positions** - Nodes live in an arena and are never moved by rebalancing
//! - **Fallible allocation** - `try_*` operations report allocation failure and leave the tree
//!   unchanged
//! - **Panic safe** - A panicking comparator never leaves the tree half-modified
//!
//! # Implementation
//!
//! Nodes are stored in a slot arena and linked by 32-bit indices rather than pointers. The tree
//! keeps no sentinel node: the root, the minimum and the maximum are cached in the tree itself,
//! so [`begin()`](RbTree::begin) and stepping back from [`end()`](RbTree::end) are O(1).

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod compare;
mod error;
mod key_of;
mod position;
mod raw;

pub mod rb_tree;

pub use compare::{Compare, Natural, Reverse};
pub use error::{Error, Result};
pub use key_of::{First, Identity, KeyOf};
pub use position::Position;
pub use rb_tree::RbTree;
