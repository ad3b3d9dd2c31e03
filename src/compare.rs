use core::cmp::Ordering;

/// A total order over the payloads stored in an [`RbTree`](crate::RbTree).
///
/// `compare(a, b)` returns [`Less`](Ordering::Less) if `a` orders before `b`,
/// [`Greater`](Ordering::Greater) if after, and [`Equal`](Ordering::Equal) if they are
/// equivalent. It is a logic error for the order of a linked node to change.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a comparator.
///
/// # Examples
///
/// ```
/// use akai_tree::RbTree;
///
/// // Order by length, longest first.
/// let mut words = RbTree::new(|a: &&str, b: &&str| b.len().cmp(&a.len()));
/// words.push("tree");
/// words.push("sentinel");
/// words.push("red");
///
/// let first = words.first().unwrap();
/// assert_eq!(*words.get(first), "sentinel");
/// ```
pub trait Comparator<T: ?Sized> {
    /// Orders `a` relative to `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// The comparator that uses the payload's own [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NaturalOrder;

impl<T: ?Sized + Ord> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}
