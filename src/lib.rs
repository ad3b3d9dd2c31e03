//! Arena-backed red-black trees for Rust.
//!
//! This crate provides [`RbTree`], a comparator-driven red-black tree whose nodes live in an
//! arena owned by the tree and are addressed through copyable [`Handle`]s. Callers allocate a
//! node for their payload, link it into the ordered structure with
//! [`insert`](RbTree::insert), unlink it again with [`delete`](RbTree::delete), and look nodes
//! up with exact or boundary searches:
//!
//! - [`find`](RbTree::find) - exact match
//! - [`find_less_or_equal`](RbTree::find_less_or_equal) - greatest node `<=` a probe
//! - [`find_greater_or_equal`](RbTree::find_greater_or_equal) - least node `>=` a probe
//! - [`first`](RbTree::first) / [`successor`](RbTree::successor) - ascending walks from any node
//!
//! # Example
//!
//! ```
//! use akai_tree::RbTree;
//!
//! let mut timers = RbTree::new(|a: &(u64, &str), b: &(u64, &str)| a.0.cmp(&b.0));
//! let flush = timers.push((250, "flush"));
//! timers.push((100, "ping"));
//! timers.push((900, "expire"));
//!
//! // The next timer due at or after t=200.
//! let due = timers.find_greater_or_equal_by(|timer| 200_u64.cmp(&timer.0)).unwrap();
//! assert_eq!(due, flush);
//!
//! // Unlink it; the payload stays addressable until it is removed.
//! timers.delete(flush);
//! assert!(!timers.is_linked(flush));
//! assert_eq!(timers.remove(flush), (250, "flush"));
//! assert_eq!(timers.len(), 2);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Intrusive-style lifecycle** - Nodes exist before insertion and after deletion
//! - **O(log n) boundary search** - Less-or-equal and greater-or-equal lookups in one descent
//! - **Duplicates allowed** - Equal nodes coexist; [`insert_unique`](RbTree::insert_unique)
//!   gives set semantics instead
//!
//! # Implementation
//!
//! Every tree owns a private sentinel node that terminates all leaf paths and acts as the
//! parent of the root. Rebalancing after insertion and deletion is iterative and follows the
//! classic case analysis; the deletion fixup caches each parent before rotating, since a
//! rotation may rewrite the sentinel's parent link while the sentinel is the fixup cursor.

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
mod raw;

pub mod rbtree;

pub use compare::{Comparator, NaturalOrder};
pub use error::{Error, InvariantViolation};
pub use raw::{Color, Handle};
pub use rbtree::RbTree;
