use core::fmt;
use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// A reference to a node slot inside one [`RbTree`](crate::RbTree).
///
/// Handles are returned by [`RbTree::alloc`](crate::RbTree::alloc) and stay valid until the
/// slot is released with [`RbTree::remove`](crate::RbTree::remove), [`RbTree::clear`] or
/// [`RbTree::drain`]. A handle is only meaningful for the tree that produced it; after its
/// slot is released the handle may be handed out again for a new node.
///
/// [`RbTree::clear`]: crate::RbTree::clear
/// [`RbTree::drain`]: crate::RbTree::drain
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Handle(NonZero<RawHandle>);

impl Handle {
    // The top value is reserved for the sentinel, so the last usable index is one lower.
    pub(crate) const MAX: usize = (RawHandle::MAX - 2) as usize;

    /// The per-tree leaf/root-parent node. Never handed out by an arena.
    pub(crate) const SENTINEL: Self = Self(NonZero::<RawHandle>::MAX);

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // Shifted by one so index 0 fits the niche; `index <= MAX` keeps it below the sentinel.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    #[inline]
    pub(crate) const fn is_sentinel(self) -> bool {
        self.0.get() == RawHandle::MAX
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            f.write_str("Handle(sentinel)")
        } else {
            f.debug_tuple("Handle").field(&self.to_index()).finish()
        }
    }
}
