use core::iter::FusedIterator;

use crate::raw::{Handle, RawRbTree};

/// A draining iterator over the linked payloads of an `RbTree`.
///
/// This `struct` is created by the [`drain`] method on [`RbTree`]. See its documentation
/// for more.
///
/// The tree is emptied when the iterator is created. Leaking the iterator (for example with
/// [`mem::forget`](core::mem::forget)) leaves the nodes it has not yielded allocated and
/// detached until [`clear`](crate::RbTree::clear).
///
/// [`drain`]: crate::RbTree::drain
/// [`RbTree`]: crate::RbTree
pub struct Drain<'a, T> {
    tree: &'a mut RawRbTree<T>,
    // Next subtree to strip a leaf from; the sentinel once everything is released.
    cursor: Handle,
    remaining: usize,
}

impl<'a, T> Drain<'a, T> {
    pub(super) fn new(tree: &'a mut RawRbTree<T>) -> Self {
        let (cursor, remaining) = tree.take_all();
        Drain { tree, cursor, remaining }
    }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.cursor.is_sentinel() {
            return None;
        }

        let (leaf, next) = self.tree.detach_leaf(self.cursor);
        self.cursor = next;
        self.remaining -= 1;
        Some(self.tree.free(leaf))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        self.for_each(drop);
    }
}
