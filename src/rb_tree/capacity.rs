use core::marker::PhantomData;

use super::RbTree;
use crate::compare::Natural;
use crate::error::Result;
use crate::raw::RawRbTree;

impl<T> RbTree<T> {
    /// Creates an empty tree with room for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let tree: RbTree<i32> = RbTree::with_capacity(16);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<T, X, C> RbTree<T, X, C> {
    /// Creates an empty tree ordered by `cmp` with room for at least `capacity` elements.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        RbTree {
            raw: RawRbTree::with_capacity(capacity),
            cmp,
            _key: PhantomData,
        }
    }

    /// Returns how many elements the tree can hold without allocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the memory cannot be obtained.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let mut tree = RbTree::<_>::from([1, 2]);
    /// tree.reserve(10);
    /// assert!(tree.capacity() >= 12);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            panic!("`RbTree::reserve()` - {err}");
        }
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the memory cannot be obtained. The tree is
    /// unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.raw.try_reserve(additional)
    }

    /// Releases unused node storage. Slots freed by erasures in the middle of the storage are
    /// kept so that positions stay valid.
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::{Error, Identity, RbTree, Reverse};

    #[test]
    fn capacity_round_trip() {
        let mut tree: RbTree<u64, Identity, Reverse> = RbTree::with_capacity_and_comparator(8, Reverse);
        assert!(tree.capacity() >= 8);
        tree.insert_unique_iter(0..8);
        let positions: alloc::vec::Vec<_> = (0..8).map(|v| tree.find(&v)).collect();

        tree.try_reserve(100).unwrap();
        assert!(tree.capacity() >= 108);

        for v in 4..8 {
            let pos = tree.find(&v);
            tree.erase(pos);
        }
        tree.shrink_to_fit();
        for (v, &pos) in (0..4).zip(&positions) {
            assert_eq!(tree.get(pos), Some(&v));
        }
        tree.validate().unwrap();
    }

    #[test]
    fn impossible_reservation_is_reported() {
        let mut tree: RbTree<u64> = RbTree::new();
        let err = tree.try_reserve(usize::MAX).unwrap_err();
        assert!(matches!(err, Error::Alloc(_)));
        assert_eq!(tree.capacity(), 0);
    }
}
