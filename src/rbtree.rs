use core::fmt;
use core::iter;

use log::{debug, trace};

use crate::compare::{Comparator, NaturalOrder};
use crate::error::{Error, InvariantViolation};
use crate::raw::{Color, Handle, RawRbTree, Side};

mod capacity;
mod drain;

pub use drain::Drain;

/// An ordered collection of caller-owned nodes, balanced as a red-black tree.
///
/// Nodes are allocated inside the tree with [`alloc`](RbTree::alloc) and are addressed by
/// [`Handle`]. A node only takes part in the ordering between [`insert`](RbTree::insert)
/// and [`delete`](RbTree::delete); outside that window it is detached, keeps its payload and
/// can be inserted again. [`remove`](RbTree::remove) releases the node and hands the payload
/// back.
///
/// The order is defined by the comparator `C` (see [`Comparator`]). Equal nodes may coexist:
/// a new node is placed after every node it compares equal to. Use
/// [`insert_unique`](RbTree::insert_unique) for set semantics.
///
/// It is a logic error for a linked payload to be modified in such a way that its ordering
/// relative to any other payload changes. The behavior resulting from such a logic error is
/// not specified, but will be encapsulated to the `RbTree` that observed it and not result in
/// undefined behavior. The same holds for passing a handle obtained from another tree.
///
/// All operations other than [`clear`](RbTree::clear) and [`drain`](RbTree::drain) take
/// O(log n) time or better.
///
/// # Examples
///
/// ```
/// use akai_tree::RbTree;
///
/// let mut tree: RbTree<i32> = RbTree::default();
/// let ten = tree.push(10);
/// let twenty = tree.push(20);
/// let thirty = tree.push(30);
///
/// assert_eq!(tree.find(&20), Some(twenty));
/// assert_eq!(tree.find_less_or_equal(&25), Some(twenty));
/// assert_eq!(tree.find_greater_or_equal(&25), Some(thirty));
/// assert_eq!(tree.find_less_or_equal(&5), None);
///
/// // Ascending walk from the smallest node.
/// let mut node = tree.first();
/// let mut seen = Vec::new();
/// while let Some(handle) = node {
///     seen.push(*tree.get(handle));
///     node = tree.successor(handle);
/// }
/// assert_eq!(seen, [10, 20, 30]);
///
/// tree.delete(ten);
/// assert_eq!(tree.first(), Some(twenty));
/// ```
pub struct RbTree<T, C = NaturalOrder> {
    raw: RawRbTree<T>,
    comparator: C,
}

impl<T, C> RbTree<T, C> {
    /// Creates an empty tree ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use akai_tree::RbTree;
    ///
    /// let tree: RbTree<i32, _> = RbTree::new(|a: &i32, b: &i32| b.cmp(a));
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub const fn new(comparator: C) -> Self {
        RbTree {
            raw: RawRbTree::new(),
            comparator,
        }
    }

    /// Returns the comparator that orders this tree.
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of linked nodes.
    ///
    /// Detached nodes still held by the tree are not counted.
    ///
    /// # Examples
    ///
    /// ```
    /// use akai_tree::RbTree;
    ///
    /// let mut tree: RbTree<i32> = RbTree::default();
    /// tree.push(1);
    /// let detached = tree.alloc(2);
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if no node is linked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Allocates a detached node holding `value`.
    ///
    /// The node does not take part in the ordering until it is inserted.
    ///
    /// # Panics
    ///
    /// Panics if the tree already holds the maximum number of nodes.
    pub fn alloc(&mut self, value: T) -> Handle {
        self.raw.alloc(value)
    }

    /// Returns the payload of `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    #[must_use]
    pub fn get(&self, handle: Handle) -> &T {
        self.raw.value(handle)
    }

    /// Returns the payload of `handle` mutably.
    ///
    /// Changing how a linked payload orders is a logic error; see [`RbTree`].
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    pub fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.raw.value_mut(handle)
    }

    /// Returns `true` if `handle` refers to an allocated node of this tree.
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.raw.contains_slot(handle)
    }

    /// Returns `true` if the node is currently linked into the tree.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    #[must_use]
    pub fn is_linked(&self, handle: Handle) -> bool {
        self.raw.is_linked(handle)
    }

    /// Unlinks a node from the tree and rebalances. The node stays allocated and detached.
    ///
    /// The node must be linked into this tree; this is only checked by debug assertions.
    /// Use [`try_delete`](RbTree::try_delete) for a checked version.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    pub fn delete(&mut self, handle: Handle) {
        trace!("delete {handle:?}");
        self.raw.delete(handle);
    }

    /// Unlinks a node, reporting misuse instead of relying on the caller's contract.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHandle`] if `handle` is not allocated in this tree and
    /// [`Error::NotLinked`] if the node is detached.
    ///
    /// # Examples
    ///
    /// ```
    /// use akai_tree::{Error, RbTree};
    ///
    /// let mut tree: RbTree<i32> = RbTree::default();
    /// let node = tree.push(7);
    /// assert_eq!(tree.try_delete(node), Ok(()));
    /// assert_eq!(tree.try_delete(node), Err(Error::NotLinked(node)));
    /// ```
    pub fn try_delete(&mut self, handle: Handle) -> Result<(), Error> {
        if !self.raw.contains_slot(handle) {
            return Err(Error::InvalidHandle(handle));
        }
        if !self.raw.is_linked(handle) {
            return Err(Error::NotLinked(handle));
        }

        self.delete(handle);
        Ok(())
    }

    /// Releases a node and returns its payload, deleting it first if it is linked.
    ///
    /// The handle becomes invalid and may be reused by a later allocation.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    ///
    /// # Examples
    ///
    /// ```
    /// use akai_tree::RbTree;
    ///
    /// let mut tree: RbTree<&str> = RbTree::default();
    /// let node = tree.push("job");
    /// assert_eq!(tree.remove(node), "job");
    /// assert!(tree.is_empty());
    /// assert!(!tree.contains(node));
    /// ```
    pub fn remove(&mut self, handle: Handle) -> T {
        if self.raw.is_linked(handle) {
            self.delete(handle);
        }
        self.raw.free(handle)
    }

    /// Returns the smallest linked node, or `None` if the tree is empty.
    #[must_use]
    pub fn first(&self) -> Option<Handle> {
        let root = self.raw.root();
        (!root.is_sentinel()).then(|| self.raw.minimum(root))
    }

    /// Returns the smallest node of the subtree rooted at `subtree`.
    ///
    /// `subtree` must be linked.
    ///
    /// # Panics
    ///
    /// Panics if `subtree` does not refer to an allocated node.
    #[must_use]
    pub fn minimum(&self, subtree: Handle) -> Handle {
        debug_assert!(self.raw.is_linked(subtree), "`RbTree::minimum()` - `subtree` is not linked!");
        self.raw.minimum(subtree)
    }

    /// Returns the node that follows `handle` in ascending order, or `None` for the last node.
    ///
    /// Together with [`first`](RbTree::first) or one of the searches this walks the tree in
    /// order. `handle` must be linked.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    #[must_use]
    pub fn successor(&self, handle: Handle) -> Option<Handle> {
        debug_assert!(self.raw.is_linked(handle), "`RbTree::successor()` - `handle` is not linked!");
        linked(self.raw.successor(handle))
    }

    /// Returns the root node, or `None` if the tree is empty.
    #[must_use]
    pub fn root(&self) -> Option<Handle> {
        linked(self.raw.root())
    }

    /// Returns the left child of a linked node.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    #[must_use]
    pub fn left(&self, handle: Handle) -> Option<Handle> {
        linked(self.raw.child(handle, Side::Left))
    }

    /// Returns the right child of a linked node.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    #[must_use]
    pub fn right(&self, handle: Handle) -> Option<Handle> {
        linked(self.raw.child(handle, Side::Right))
    }

    /// Returns the parent of a linked node, or `None` for the root.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    #[must_use]
    pub fn parent(&self, handle: Handle) -> Option<Handle> {
        linked(self.raw.parent(handle))
    }

    /// Returns the color of a linked node.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    #[must_use]
    pub fn color(&self, handle: Handle) -> Color {
        self.raw.color(handle)
    }

    /// Drops every node, linked or detached, and invalidates all handles.
    pub fn clear(&mut self) {
        debug!("clear: dropping {} nodes ({} linked)", self.raw.allocated(), self.raw.len());
        self.raw.clear();
    }

    /// Unlinks and releases every linked node, yielding the payloads.
    ///
    /// Nodes come out leaf-first (post-order) without any rebalancing, so tearing the whole
    /// tree down costs O(n). The tree is empty as soon as this returns, and dropping the
    /// iterator early releases the rest. Detached nodes are not touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use akai_tree::RbTree;
    ///
    /// let mut tree: RbTree<i32> = RbTree::default();
    /// for value in [3, 1, 2] {
    ///     tree.push(value);
    /// }
    ///
    /// let mut drained: Vec<_> = tree.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, [1, 2, 3]);
    /// assert!(tree.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        debug!("drain: releasing {} linked nodes", self.raw.len());
        Drain::new(&mut self.raw)
    }

    /// Searches with a closure that orders the probe against a stored payload.
    ///
    /// `probe(payload)` must return how the sought key orders relative to `payload`,
    /// consistently with the tree's comparator. Returns a node that compares equal, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use akai_tree::RbTree;
    ///
    /// let mut sessions = RbTree::new(|a: &(u32, &str), b: &(u32, &str)| a.0.cmp(&b.0));
    /// let alice = sessions.push((17, "alice"));
    /// sessions.push((4, "bob"));
    ///
    /// assert_eq!(sessions.find_by(|s| 17_u32.cmp(&s.0)), Some(alice));
    /// assert_eq!(sessions.find_by(|s| 5_u32.cmp(&s.0)), None);
    /// ```
    pub fn find_by<F>(&self, probe: F) -> Option<Handle>
    where
        F: FnMut(&T) -> core::cmp::Ordering,
    {
        self.raw.find_by(probe)
    }

    /// Like [`find_less_or_equal`](RbTree::find_less_or_equal), with a probe closure as in
    /// [`find_by`](RbTree::find_by).
    pub fn find_less_or_equal_by<F>(&self, probe: F) -> Option<Handle>
    where
        F: FnMut(&T) -> core::cmp::Ordering,
    {
        self.raw.find_less_or_equal_by(probe)
    }

    /// Like [`find_greater_or_equal`](RbTree::find_greater_or_equal), with a probe closure as
    /// in [`find_by`](RbTree::find_by).
    pub fn find_greater_or_equal_by<F>(&self, probe: F) -> Option<Handle>
    where
        F: FnMut(&T) -> core::cmp::Ordering,
    {
        self.raw.find_greater_or_equal_by(probe)
    }

    fn values(&self) -> impl Iterator<Item = &T> + '_ {
        iter::successors(self.first(), |&handle| self.successor(handle)).map(|handle| self.get(handle))
    }
}

impl<T, C: Comparator<T>> RbTree<T, C> {
    /// Links a detached node into the tree and rebalances.
    ///
    /// A node equal to existing nodes is placed after all of them. The node must be
    /// allocated in this tree and detached; this is only checked by debug assertions. Use
    /// [`try_insert`](RbTree::try_insert) for a checked version.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an allocated node.
    pub fn insert(&mut self, handle: Handle) {
        trace!("insert {handle:?}");
        let comparator = &self.comparator;
        self.raw.insert(handle, |a, b| comparator.compare(a, b));
    }

    /// Links a node, reporting misuse instead of relying on the caller's contract.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHandle`] if `handle` is not allocated in this tree and
    /// [`Error::AlreadyLinked`] if the node is already linked.
    pub fn try_insert(&mut self, handle: Handle) -> Result<(), Error> {
        self.check_detached(handle)?;
        self.insert(handle);
        Ok(())
    }

    /// Links a node unless an equal node is already linked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] with the existing node if an equal node is linked, and
    /// the errors of [`try_insert`](RbTree::try_insert) otherwise. The node stays detached on
    /// error.
    ///
    /// # Examples
    ///
    /// ```
    /// use akai_tree::{Error, RbTree};
    ///
    /// let mut tree: RbTree<i32> = RbTree::default();
    /// let first = tree.push(5);
    /// let second = tree.alloc(5);
    /// assert_eq!(tree.insert_unique(second), Err(Error::Duplicate(first)));
    /// assert!(!tree.is_linked(second));
    /// ```
    pub fn insert_unique(&mut self, handle: Handle) -> Result<(), Error> {
        self.check_detached(handle)?;

        let value = self.raw.value(handle);
        let comparator = &self.comparator;
        if let Some(existing) = self.raw.find_by(|other| comparator.compare(value, other)) {
            return Err(Error::Duplicate(existing));
        }

        self.insert(handle);
        Ok(())
    }

    /// Allocates a node for `value` and links it. Returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the tree already holds the maximum number of nodes.
    pub fn push(&mut self, value: T) -> Handle {
        let handle = self.alloc(value);
        self.insert(handle);
        handle
    }

    /// Returns a linked node equal to `probe`, or `None`.
    ///
    /// With duplicates, which of the equal nodes is returned is unspecified.
    #[must_use]
    pub fn find(&self, probe: &T) -> Option<Handle> {
        self.raw.find_by(|other| self.comparator.compare(probe, other))
    }

    /// Returns a node equal to `probe` if there is one, otherwise the greatest node
    /// ordered before `probe`, or `None`.
    #[must_use]
    pub fn find_less_or_equal(&self, probe: &T) -> Option<Handle> {
        self.raw.find_less_or_equal_by(|other| self.comparator.compare(probe, other))
    }

    /// Returns a node equal to `probe` if there is one, otherwise the least node ordered
    /// after `probe`, or `None`.
    #[must_use]
    pub fn find_greater_or_equal(&self, probe: &T) -> Option<Handle> {
        self.raw.find_greater_or_equal_by(|other| self.comparator.compare(probe, other))
    }

    /// Verifies the red-black and ordering invariants and returns the tree's black-height.
    ///
    /// This walks every node and is meant for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```
    /// use akai_tree::RbTree;
    ///
    /// let mut tree: RbTree<i32> = RbTree::default();
    /// for value in 0..100 {
    ///     tree.push(value);
    /// }
    /// assert!(tree.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        let comparator = &self.comparator;
        self.raw.check_invariants(|a, b| comparator.compare(a, b))
    }

    fn check_detached(&self, handle: Handle) -> Result<(), Error> {
        if !self.raw.contains_slot(handle) {
            return Err(Error::InvalidHandle(handle));
        }
        if self.raw.is_linked(handle) {
            return Err(Error::AlreadyLinked(handle));
        }
        Ok(())
    }
}

impl<T: Ord> Default for RbTree<T> {
    /// Creates an empty tree ordered by `T`'s [`Ord`] implementation.
    fn default() -> Self {
        RbTree::new(NaturalOrder)
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RbTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}

#[inline]
fn linked(handle: Handle) -> Option<Handle> {
    (!handle.is_sentinel()).then_some(handle)
}
