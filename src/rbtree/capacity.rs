use super::RbTree;
use crate::raw::RawRbTree;

impl<T, C> RbTree<T, C> {
    /// Creates an empty tree ordered by `comparator`, with room for at least `capacity`
    /// nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use akai_tree::{NaturalOrder, RbTree};
    ///
    /// let tree: RbTree<i32> = RbTree::with_capacity(16, NaturalOrder);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize, comparator: C) -> Self {
        RbTree {
            raw: RawRbTree::with_capacity(capacity),
            comparator,
        }
    }

    /// Returns the number of nodes the tree can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use akai_tree::RbTree;
    ///
    /// let mut tree: RbTree<i32> = RbTree::default();
    /// tree.reserve(64);
    /// assert!(tree.capacity() >= 64);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }
}
