use core::cmp::Ordering;
use core::mem;

use log::trace;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Links, Side, Slot};

const NIL: Handle = Handle::SENTINEL;

/// The red-black engine backing `RbTree`.
///
/// Ordering is supplied per call: mutating and searching methods take a closure that orders
/// payloads, so the engine never needs to know how the caller compares them.
pub(crate) struct RawRbTree<T> {
    /// Arena storing every allocated node, linked or not.
    slots: Arena<Slot<T>>,
    /// This tree's private leaf/root-parent node. Always black.
    sentinel: Links,
    /// The root node, or `NIL` when no node is linked.
    root: Handle,
    /// Number of linked nodes.
    len: usize,
}

impl<T> RawRbTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            slots: Arena::new(),
            sentinel: Links::DETACHED,
            root: NIL,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Arena::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Returns the number of linked nodes.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no node is linked.
    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_sentinel()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Number of allocated nodes, linked or detached.
    pub(crate) const fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Drops every node and returns to the initial state.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.sentinel = Links::DETACHED;
        self.root = NIL;
        self.len = 0;
    }

    /// Allocates a detached node holding `value`.
    pub(crate) fn alloc(&mut self, value: T) -> Handle {
        self.slots.alloc(Slot::new(value))
    }

    /// Releases a detached node and returns its payload.
    pub(crate) fn free(&mut self, handle: Handle) -> T {
        let slot = self.slots.take(handle);
        debug_assert!(!slot.links.linked, "`RawRbTree::free()` - `handle` is still linked!");
        slot.value
    }

    pub(crate) fn contains_slot(&self, handle: Handle) -> bool {
        self.slots.try_get(handle).is_some()
    }

    pub(crate) fn is_linked(&self, handle: Handle) -> bool {
        self.slots.get(handle).links.linked
    }

    pub(crate) fn value(&self, handle: Handle) -> &T {
        &self.slots.get(handle).value
    }

    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut T {
        &mut self.slots.get_mut(handle).value
    }

    /// Returns the root, or `NIL`.
    #[inline]
    pub(crate) const fn root(&self) -> Handle {
        self.root
    }

    // ─── Link accessors; `NIL` resolves to the sentinel ─────────────────────────

    #[inline]
    pub(crate) fn links(&self, handle: Handle) -> &Links {
        if handle.is_sentinel() {
            &self.sentinel
        } else {
            &self.slots.get(handle).links
        }
    }

    #[inline]
    fn links_mut(&mut self, handle: Handle) -> &mut Links {
        if handle.is_sentinel() {
            &mut self.sentinel
        } else {
            &mut self.slots.get_mut(handle).links
        }
    }

    #[inline]
    pub(crate) fn color(&self, handle: Handle) -> Color {
        self.links(handle).color
    }

    #[inline]
    pub(super) fn set_color(&mut self, handle: Handle, color: Color) {
        self.links_mut(handle).color = color;
    }

    #[inline]
    pub(crate) fn child(&self, handle: Handle, side: Side) -> Handle {
        self.links(handle).child(side)
    }

    #[inline]
    fn set_child(&mut self, handle: Handle, side: Side, child: Handle) {
        self.links_mut(handle).set_child(side, child);
    }

    #[inline]
    pub(crate) fn parent(&self, handle: Handle) -> Handle {
        self.links(handle).parent
    }

    #[inline]
    fn set_parent(&mut self, handle: Handle, parent: Handle) {
        self.links_mut(handle).parent = parent;
    }

    /// Which side of `parent` holds `node`.
    #[inline]
    fn side_of(&self, node: Handle, parent: Handle) -> Side {
        if self.child(parent, Side::Left) == node {
            Side::Left
        } else {
            Side::Right
        }
    }

    // ─── Rotation & relink ──────────────────────────────────────────────────────

    /// Makes `subst` take over `node`'s position as seen from `node`'s parent.
    ///
    /// `subst` may be the sentinel, in which case the sentinel's parent is overwritten;
    /// the deletion fixup relies on that.
    fn relink(&mut self, subst: Handle, node: Handle) {
        let parent = self.parent(node);
        self.set_parent(subst, parent);

        if parent.is_sentinel() {
            self.root = subst;
        } else {
            let side = self.side_of(node, parent);
            self.set_child(parent, side, subst);
        }
    }

    /// Rotates `node` down towards `side`, promoting its child from the opposite side.
    ///
    /// `rotate(node, Side::Left)` is the classic left rotation. Colors are untouched.
    fn rotate(&mut self, node: Handle, side: Side) {
        let child = self.child(node, side.opposite());
        let inner = self.child(child, side);

        self.set_child(node, side.opposite(), inner);
        // `inner` may be the sentinel.
        self.set_parent(inner, node);
        self.set_child(child, side, node);

        self.relink(child, node);
        self.set_parent(node, child);
    }

    // ─── Search family ──────────────────────────────────────────────────────────

    /// Returns the leftmost node of the subtree rooted at `node`.
    pub(crate) fn minimum(&self, mut node: Handle) -> Handle {
        loop {
            let left = self.child(node, Side::Left);
            if left.is_sentinel() {
                return node;
            }
            node = left;
        }
    }

    /// Returns the in-order successor of `node`, or `NIL` if it is the last node.
    pub(crate) fn successor(&self, mut node: Handle) -> Handle {
        let right = self.child(node, Side::Right);
        if !right.is_sentinel() {
            return self.minimum(right);
        }

        loop {
            let parent = self.parent(node);
            if parent.is_sentinel() || self.child(parent, Side::Left) == node {
                return parent;
            }
            node = parent;
        }
    }

    /// Exact-match descent. `probe` orders the query against a stored payload.
    pub(crate) fn find_by<F>(&self, mut probe: F) -> Option<Handle>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut next = self.root;

        while !next.is_sentinel() {
            match probe(self.value(next)) {
                Ordering::Less => next = self.child(next, Side::Left),
                Ordering::Greater => next = self.child(next, Side::Right),
                Ordering::Equal => return Some(next),
            }
        }

        None
    }

    /// Returns an exact match, or the greatest node ordered before the probe.
    pub(crate) fn find_less_or_equal_by<F>(&self, mut probe: F) -> Option<Handle>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut found = None;
        let mut next = self.root;

        while !next.is_sentinel() {
            match probe(self.value(next)) {
                Ordering::Less => next = self.child(next, Side::Left),
                Ordering::Greater => {
                    found = Some(next);
                    next = self.child(next, Side::Right);
                }
                Ordering::Equal => return Some(next),
            }
        }

        found
    }

    /// Returns an exact match, or the least node ordered after the probe.
    pub(crate) fn find_greater_or_equal_by<F>(&self, mut probe: F) -> Option<Handle>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut found = None;
        let mut next = self.root;

        while !next.is_sentinel() {
            match probe(self.value(next)) {
                Ordering::Less => {
                    found = Some(next);
                    next = self.child(next, Side::Left);
                }
                Ordering::Greater => next = self.child(next, Side::Right),
                Ordering::Equal => return Some(next),
            }
        }

        found
    }

    // ─── Insertion ──────────────────────────────────────────────────────────────

    /// Links the detached node `node` into the tree. Equal nodes are placed to the right.
    pub(crate) fn insert<F>(&mut self, node: Handle, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        debug_assert!(!self.is_linked(node), "`RawRbTree::insert()` - `node` is already linked!");

        let mut parent = NIL;
        let mut side = Side::Left;
        let mut next = self.root;

        {
            let value = self.value(node);
            while !next.is_sentinel() {
                parent = next;
                side = if compare(value, self.value(next)) == Ordering::Less {
                    Side::Left
                } else {
                    Side::Right
                };
                next = self.child(next, side);
            }
        }

        self.slots.get_mut(node).links = Links::new_leaf(parent);
        if parent.is_sentinel() {
            self.root = node;
        } else {
            self.set_child(parent, side, node);
        }
        self.len += 1;

        self.insert_fixup(node);

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    fn insert_fixup(&mut self, mut node: Handle) {
        loop {
            let parent = self.parent(node);

            // The root's parent is the sentinel, which is black, so no root test is needed.
            if self.color(parent) == Color::Black {
                return;
            }

            // A red parent is never the root, so the grandparent is a real node.
            let grandparent = self.parent(parent);
            let side = self.side_of(parent, grandparent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                self.set_color(uncle, Color::Black);
                self.set_color(parent, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.child(parent, side.opposite()) == node {
                // Inner grandchild: turn it into an outer one first.
                node = parent;
                self.rotate(node, side);
            }

            let parent = self.parent(node);
            self.set_color(parent, Color::Black);

            let grandparent = self.parent(parent);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());

            trace!("insert fixup rotated at {grandparent:?}");
            return;
        }
    }

    // ─── Deletion ───────────────────────────────────────────────────────────────

    /// Unlinks `node` from the tree. The slot stays allocated and detached.
    pub(crate) fn delete(&mut self, node: Handle) {
        debug_assert!(self.is_linked(node), "`RawRbTree::delete()` - `node` is not linked!");

        let left = self.child(node, Side::Left);
        let right = self.child(node, Side::Right);

        let (subst, child) = if left.is_sentinel() {
            (node, right)
        } else if right.is_sentinel() {
            (node, left)
        } else {
            let subst = self.minimum(right);
            (subst, self.child(subst, Side::Right))
        };

        // `child` may be the sentinel; its parent now points at the vacated slot's parent.
        self.relink(child, subst);

        let color = self.color(subst);

        if subst != node {
            // Move the successor into the deleted node's position.
            let links = *self.links(node);
            self.set_color(subst, links.color);

            // Re-read the children: splicing `subst` out may have replaced `node`'s right child.
            let left = links.child(Side::Left);
            self.set_child(subst, Side::Left, left);
            self.set_parent(left, subst);

            let right = links.child(Side::Right);
            self.set_child(subst, Side::Right, right);
            self.set_parent(right, subst);

            self.relink(subst, node);
        }

        self.slots.get_mut(node).links = Links::DETACHED;
        self.len -= 1;

        if color == Color::Black {
            self.delete_fixup(child);
        }

        debug_assert_eq!(self.sentinel.color, Color::Black);
    }

    fn delete_fixup(&mut self, mut node: Handle) {
        while node != self.root && self.color(node) == Color::Black {
            // `node` may be the sentinel here. Rotations below can rewrite the sentinel's
            // parent, so `parent` is read once and never re-read from `node`.
            let parent = self.parent(node);
            let side = self.side_of(node, parent);
            let far = side.opposite();

            let mut sibling = self.child(parent, far);

            if self.color(sibling) == Color::Red {
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.child(parent, far);
            }

            if self.color(self.child(sibling, far)) == Color::Black {
                self.set_color(sibling, Color::Red);

                let near_nephew = self.child(sibling, side);
                if self.color(near_nephew) == Color::Black {
                    node = parent;
                    continue;
                }

                self.set_color(near_nephew, Color::Black);
                self.rotate(sibling, far);
                sibling = self.child(parent, far);
            }

            self.set_color(sibling, self.color(parent));
            self.set_color(parent, Color::Black);
            let far_nephew = self.child(sibling, far);
            self.set_color(far_nephew, Color::Black);
            self.rotate(parent, side);

            trace!("delete fixup rotated at {parent:?}");
            break;
        }

        self.set_color(node, Color::Black);
    }

    // ─── Teardown ───────────────────────────────────────────────────────────────

    /// Unlinks every node at once and returns the old root and linked count.
    ///
    /// The nodes keep their child links so [`detach_leaf`](Self::detach_leaf) can walk them,
    /// but the tree no longer reaches them and none of them counts as linked.
    pub(crate) fn take_all(&mut self) -> (Handle, usize) {
        for slot in self.slots.values_mut() {
            slot.links.linked = false;
        }
        self.sentinel = Links::DETACHED;
        let len = mem::replace(&mut self.len, 0);
        (mem::replace(&mut self.root, NIL), len)
    }

    /// Detaches the first leaf reachable from `from` in post-order without rebalancing.
    ///
    /// `from` must belong to a subtree released by [`take_all`](Self::take_all). Returns the
    /// detached node and the cursor for the next call (`NIL` once the subtree is gone), so
    /// feeding the cursor back in tears the subtree down in O(n).
    pub(crate) fn detach_leaf(&mut self, from: Handle) -> (Handle, Handle) {
        let mut node = from;

        loop {
            let left = self.child(node, Side::Left);
            if !left.is_sentinel() {
                node = left;
                continue;
            }

            let right = self.child(node, Side::Right);
            if !right.is_sentinel() {
                node = right;
                continue;
            }

            break;
        }

        let parent = self.parent(node);
        if !parent.is_sentinel() {
            let side = self.side_of(node, parent);
            self.set_child(parent, side, NIL);
        }
        self.slots.get_mut(node).links = Links::DETACHED;

        (node, parent)
    }
}
