use core::fmt;

use crate::Handle;

/// Errors returned by the checked tree operations.
///
/// The unchecked operations ([`insert`](crate::RbTree::insert),
/// [`delete`](crate::RbTree::delete)) treat these conditions as contract violations instead.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The node is already linked into the tree.
    AlreadyLinked(Handle),
    /// The node is not linked into the tree.
    NotLinked(Handle),
    /// An equal node is already linked; carries the existing node.
    Duplicate(Handle),
    /// The handle does not refer to an allocated node of this tree.
    InvalidHandle(Handle),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AlreadyLinked(handle) => write!(f, "node {handle:?} is already linked"),
            Error::NotLinked(handle) => write!(f, "node {handle:?} is not linked"),
            Error::Duplicate(existing) => write!(f, "an equal node {existing:?} is already linked"),
            Error::InvalidHandle(handle) => write!(f, "{handle:?} does not refer to an allocated node"),
        }
    }
}

impl core::error::Error for Error {}

/// A broken red-black or ordering invariant, as reported by
/// [`RbTree::check_invariants`](crate::RbTree::check_invariants).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InvariantViolation {
    /// The sentinel is not black.
    RedSentinel,
    /// The root is red.
    RedRoot(Handle),
    /// The root's parent is not the sentinel.
    RootHasParent(Handle),
    /// A node reachable from the root is flagged as detached.
    Unlinked(Handle),
    /// `node`'s parent back-reference does not point at the node holding it.
    BrokenParentLink {
        /// The child with the wrong back-reference.
        node: Handle,
        /// The node that actually holds it.
        expected: Handle,
    },
    /// A red node has a red parent.
    RedRed {
        /// The red child.
        node: Handle,
        /// Its red parent.
        parent: Handle,
    },
    /// Two paths to the sentinel count a different number of black nodes.
    BlackHeight {
        /// The node whose missing child ends the offending path.
        node: Handle,
        /// Black count of the first path seen.
        expected: usize,
        /// Black count of the offending path.
        found: usize,
    },
    /// Two in-order neighbours compare in the wrong order.
    OutOfOrder {
        /// The earlier node in the in-order walk.
        prev: Handle,
        /// The node that should not precede it.
        next: Handle,
    },
    /// The number of reachable nodes differs from the tracked length.
    LenMismatch {
        /// The tracked length.
        expected: usize,
        /// The number of nodes reached.
        found: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::RedSentinel => f.write_str("the sentinel is red"),
            InvariantViolation::RedRoot(root) => write!(f, "the root {root:?} is red"),
            InvariantViolation::RootHasParent(root) => write!(f, "the root {root:?} has a parent"),
            InvariantViolation::Unlinked(node) => write!(f, "{node:?} is reachable but detached"),
            InvariantViolation::BrokenParentLink { node, expected } => {
                write!(f, "{node:?} does not point back at its parent {expected:?}")
            }
            InvariantViolation::RedRed { node, parent } => {
                write!(f, "red node {node:?} has red parent {parent:?}")
            }
            InvariantViolation::BlackHeight { node, expected, found } => {
                write!(f, "path ending below {node:?} has {found} black nodes, expected {expected}")
            }
            InvariantViolation::OutOfOrder { prev, next } => {
                write!(f, "{prev:?} orders after its successor {next:?}")
            }
            InvariantViolation::LenMismatch { expected, found } => {
                write!(f, "reached {found} nodes, expected {expected}")
            }
        }
    }
}

impl core::error::Error for InvariantViolation {}
