use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Handle, RawRbTree};

/// An iterator over the elements of an `RbTree`, in ascending order.
///
/// This `struct` is created by the [`iter`] and [`iter_between`] methods on
/// [`RbTree`](crate::RbTree). See their documentation for more.
///
/// # Examples
///
/// ```
/// use redwood_tree::RbTree;
///
/// let tree = RbTree::<_>::from([3, 1, 2]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: crate::RbTree::iter
/// [`iter_between`]: crate::RbTree::iter_between
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    tree: &'a RawRbTree<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    /// `front` and `back` are the first and last nodes to yield; `len` counts them inclusively.
    pub(super) fn new(tree: &'a RawRbTree<T>, front: Option<Handle>, back: Option<Handle>, len: usize) -> Self {
        Iter {
            tree,
            front,
            back,
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.front?;
        self.remaining -= 1;
        self.front = self.tree.successor(h);
        Some(self.tree.value(h))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.back?;
        self.remaining -= 1;
        self.back = self.tree.predecessor(h);
        Some(self.tree.value(h))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the elements of an `RbTree`, in ascending order.
///
/// This `struct` is created by the `into_iter` method on [`RbTree`](crate::RbTree)
/// (provided by the [`IntoIterator`] trait).
///
/// # Examples
///
/// ```
/// use redwood_tree::RbTree;
///
/// let tree = RbTree::<_>::from([1, 2, 3]);
/// let mut iter = tree.into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.next(), Some(2));
/// ```
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(values: Vec<T>) -> Self {
        IntoIter {
            inner: values.into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("len", &self.inner.len()).finish()
    }
}

impl<T> Default for IntoIter<T> {
    /// Creates an empty `rb_tree::IntoIter`.
    ///
    /// ```
    /// # use redwood_tree::rb_tree;
    /// let iter: rb_tree::IntoIter<u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter::new(Vec::new())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::RbTree;
    use alloc::format;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn iter_meets_in_the_middle() {
        let tree: RbTree<u32> = (0..6).collect();
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.by_ref().collect::<Vec<_>>(), [&1, &2, &3]);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iter_debug_lists_the_remaining_elements() {
        let tree = RbTree::<_>::from([2, 1]);
        let mut iter = tree.iter();
        iter.next();
        assert_eq!(format!("{iter:?}"), "[2]");
    }

    proptest! {
        #[test]
        fn alternating_ends_visit_everything_once(values in prop::collection::vec(0u16..500, 0..200), pattern in any::<u64>()) {
            let tree: RbTree<u16> = values.iter().copied().collect();
            let mut sorted = values.clone();
            sorted.sort_unstable();

            let mut iter = tree.iter();
            let mut front = Vec::new();
            let mut back = Vec::new();
            let mut bit = 0;
            loop {
                let from_front = (pattern >> (bit % 64)) & 1 == 0;
                bit += 1;
                let item = if from_front { iter.next() } else { iter.next_back() };
                match item {
                    Some(&v) if from_front => front.push(v),
                    Some(&v) => back.push(v),
                    None => break,
                }
            }
            back.reverse();
            front.extend(back);
            prop_assert_eq!(front, sorted);
        }
    }
}
