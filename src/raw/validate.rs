use core::cmp::Ordering;

use smallvec::SmallVec;

use super::handle::Handle;
use super::node::{Color, Side};
use super::raw_rbtree::RawRbTree;
use crate::error::InvariantViolation;

// Red-black height is at most 2 * log2(n + 1), so this covers any tree with a u32 handle.
type Stack = SmallVec<[(Handle, usize); 64]>;

impl<T> RawRbTree<T> {
    /// Checks every structural invariant and returns the black-height of the root.
    ///
    /// The black-height counts the black nodes (sentinel excluded) on any path from the root
    /// to a leaf; an empty tree has black-height 0.
    pub(crate) fn check_invariants<F>(&self, mut compare: F) -> Result<usize, InvariantViolation>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let sentinel = Handle::SENTINEL;
        if self.color(sentinel) != Color::Black {
            return Err(InvariantViolation::RedSentinel);
        }

        let root = self.root();
        if root.is_sentinel() {
            // `is_empty` looks at the root, so the count is checked on its own.
            return match self.len() {
                0 => Ok(0),
                len => Err(InvariantViolation::LenMismatch { expected: len, found: 0 }),
            };
        }

        if !self.parent(root).is_sentinel() {
            return Err(InvariantViolation::RootHasParent(root));
        }
        if self.color(root) != Color::Black {
            return Err(InvariantViolation::RedRoot(root));
        }

        let black_height = self.check_structure(root)?;
        self.check_order(root, &mut compare)?;

        Ok(black_height)
    }

    // Depth-first walk carrying the black count of the path above each node.
    fn check_structure(&self, root: Handle) -> Result<usize, InvariantViolation> {
        let mut stack: Stack = SmallVec::new();
        let mut black_height: Option<usize> = None;
        stack.push((root, 0));

        while let Some((node, above)) = stack.pop() {
            let links = self.links(node);
            if !links.linked {
                return Err(InvariantViolation::Unlinked(node));
            }

            let blacks = above + usize::from(links.color == Color::Black);

            for side in [Side::Left, Side::Right] {
                let child = links.child(side);

                if child.is_sentinel() {
                    match black_height {
                        None => black_height = Some(blacks),
                        Some(expected) if expected != blacks => {
                            return Err(InvariantViolation::BlackHeight {
                                node,
                                expected,
                                found: blacks,
                            });
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                if self.parent(child) != node {
                    return Err(InvariantViolation::BrokenParentLink {
                        node: child,
                        expected: node,
                    });
                }
                if links.color == Color::Red && self.color(child) == Color::Red {
                    return Err(InvariantViolation::RedRed { node: child, parent: node });
                }

                stack.push((child, blacks));
            }
        }

        Ok(black_height.unwrap_or(0))
    }

    // In-order walk through `minimum`/`successor`, also counting the nodes.
    fn check_order<F>(&self, root: Handle, compare: &mut F) -> Result<(), InvariantViolation>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut count = 1;
        let mut prev = self.minimum(root);
        let mut next = self.successor(prev);

        while !next.is_sentinel() {
            if compare(self.value(prev), self.value(next)) == Ordering::Greater {
                return Err(InvariantViolation::OutOfOrder { prev, next });
            }
            count += 1;
            prev = next;
            next = self.successor(next);
        }

        if count == self.len() {
            Ok(())
        } else {
            Err(InvariantViolation::LenMismatch {
                expected: self.len(),
                found: count,
            })
        }
    }
}
