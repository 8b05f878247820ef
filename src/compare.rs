use core::cmp::Ordering;

/// A strict weak ordering over keys.
///
/// Implementations must be consistent: `compare(a, b)` and `compare(b, a)` are reverses of
/// each other and equivalence is transitive. Breaking this is a logic error; the tree stays
/// memory safe but lookups may miss elements.
///
/// Any `Fn(&K, &K) -> Ordering` closure or function is a comparator.
///
/// # Examples
///
/// ```
/// use redwood_tree::{Identity, RbTree};
///
/// let mut tree: RbTree<i32, Identity, _> = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// tree.insert_unique(1);
/// tree.insert_unique(3);
/// tree.insert_unique(2);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub trait Compare<K: ?Sized> {
    /// Returns how `a` orders relative to `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys by the reverse of their [`Ord`] implementation.
///
/// ```
/// use redwood_tree::{Identity, RbTree, Reverse};
///
/// let mut tree: RbTree<&str, Identity, Reverse> = RbTree::with_comparator(Reverse);
/// tree.insert_equal("a");
/// tree.insert_equal("c");
/// tree.insert_equal("b");
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), ["c", "b", "a"]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reverse;

impl<K: Ord + ?Sized> Compare<K> for Reverse {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
