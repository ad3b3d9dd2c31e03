use super::handle::Handle;

/// The color of a node in a red-black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    /// A red node; never the parent of another red node.
    Red,
    /// A black node; counted by the black-height.
    Black,
}

/// Which child slot of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// The structural part of a node. Every link points either at a real node or at the
// owning tree's sentinel.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Links {
    pub(crate) color: Color,
    pub(crate) children: [Handle; 2],
    // Non-owning back-reference, only read while rebalancing and walking upwards.
    pub(crate) parent: Handle,
    pub(crate) linked: bool,
}

impl Links {
    /// Links of a node that is not part of any tree.
    pub(crate) const DETACHED: Self = Self {
        color: Color::Black,
        children: [Handle::SENTINEL; 2],
        parent: Handle::SENTINEL,
        linked: false,
    };

    /// Links of a freshly inserted leaf hanging off `parent`.
    #[inline]
    pub(crate) const fn new_leaf(parent: Handle) -> Self {
        Self {
            color: Color::Red,
            children: [Handle::SENTINEL; 2],
            parent,
            linked: true,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Handle {
        self.children[side as usize]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Handle) {
        self.children[side as usize] = child;
    }
}

/// A node slot: tree links plus the caller's payload.
pub(crate) struct Slot<T> {
    pub(crate) links: Links,
    pub(crate) value: T,
}

impl<T> Slot<T> {
    pub(crate) const fn new(value: T) -> Self {
        Self {
            links: Links::DETACHED,
            value,
        }
    }
}
