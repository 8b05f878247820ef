use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::compare::{Compare, Natural};
use crate::error::{Error, Result};
use crate::key_of::{Identity, KeyOf};
use crate::position::Position;
use crate::raw::{Handle, RawRbTree, Slot};

mod capacity;
mod iter;

pub use iter::{IntoIter, Iter};

/// An ordered collection backed by a red-black tree.
///
/// `RbTree` is the engine underneath set-like, multiset-like, map-like and multimap-like
/// containers. It stores values of type `T`, orders them by the key that `X` extracts (see
/// [`KeyOf`]) using the comparator `C` (see [`Compare`]), and lets the caller choose per
/// insertion whether equal keys are rejected ([`insert_unique`](Self::insert_unique)) or kept
/// ([`insert_equal`](Self::insert_equal)). Equal keys keep their insertion order.
///
/// Elements are addressed by [`Position`]s: copyable tokens that survive every insertion and
/// every erasure except that of the element they name. The past-the-end position
/// [`end()`](Self::end) is a first-class position.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to any
/// other key changes while it is in the tree. The behavior resulting from such a logic error is
/// not specified, but will be encapsulated to the `RbTree` that observed it and not result in
/// undefined behavior.
///
/// # Examples
///
/// ```
/// use redwood_tree::RbTree;
///
/// let mut tree = RbTree::new();
/// tree.insert_equal(3);
/// tree.insert_equal(1);
/// tree.insert_equal(3);
/// let (_, inserted) = tree.insert_unique(1);
/// assert!(!inserted);
///
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.count(&3), 2);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 3]);
/// ```
///
/// A tree with a known list of values can be initialized from an array:
///
/// ```
/// use redwood_tree::RbTree;
///
/// let tree = RbTree::<_>::from([2, 1, 2]);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 2]);
/// ```
pub struct RbTree<T, X = Identity, C = Natural> {
    raw: RawRbTree<T>,
    cmp: C,
    _key: PhantomData<fn() -> X>,
}

impl<T> RbTree<T> {
    /// Makes a new, empty tree ordered by `T`'s [`Ord`] implementation.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert_unique("a");
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, X, C> RbTree<T, X, C> {
    /// Makes a new, empty tree ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::{Identity, RbTree, Reverse};
    ///
    /// let mut tree: RbTree<i32, Identity, Reverse> = RbTree::with_comparator(Reverse);
    /// tree.insert_unique(1);
    /// tree.insert_unique(2);
    /// assert_eq!(tree.first(), Some(&2));
    /// ```
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        RbTree {
            raw: RawRbTree::new(),
            cmp,
            _key: PhantomData,
        }
    }

    /// Returns the comparator ordering this tree.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns the number of elements in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the largest number of elements a tree can hold.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        Handle::MAX
    }

    /// Returns the position of the smallest element, or [`end()`](Self::end) if the tree is
    /// empty.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn begin(&self) -> Position {
        Position(self.raw.leftmost())
    }

    /// Returns the past-the-end position.
    #[must_use]
    pub const fn end(&self) -> Position {
        Position::END
    }

    /// Returns the position following `pos` in ascending order. The position after the largest
    /// element is [`end()`](Self::end); advancing `end()` stays at `end()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let tree = RbTree::<_>::from([10, 20]);
    /// let first = tree.begin();
    /// let second = tree.next(first);
    /// assert_eq!(tree.get(second), Some(&20));
    /// assert_eq!(tree.next(second), tree.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// Amortized O(1), worst case O(log n).
    #[must_use]
    pub fn next(&self, pos: Position) -> Position {
        match self.live(pos) {
            Some(h) => Position(self.raw.successor(h)),
            None => Position::END,
        }
    }

    /// Returns the position preceding `pos` in ascending order. Stepping back from
    /// [`end()`](Self::end) yields the largest element; stepping back from
    /// [`begin()`](Self::begin) yields `end()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let tree = RbTree::<_>::from([10, 20]);
    /// let last = tree.prev(tree.end());
    /// assert_eq!(tree.get(last), Some(&20));
    /// assert_eq!(tree.get(tree.prev(last)), Some(&10));
    /// ```
    ///
    /// # Complexity
    ///
    /// Amortized O(1), worst case O(log n).
    #[must_use]
    pub fn prev(&self, pos: Position) -> Position {
        match self.live(pos) {
            Some(h) => Position(self.raw.predecessor(h)),
            None => Position(self.raw.rightmost()),
        }
    }

    /// Returns a reference to the element at `pos`, or `None` for [`end()`](Self::end).
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.live(pos).map(|h| self.raw.value(h))
    }

    /// Returns a mutable reference to the element at `pos`, or `None` for
    /// [`end()`](Self::end).
    ///
    /// Changing the part of the element that its key is extracted from is a logic error.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::{First, Natural, RbTree};
    ///
    /// let mut tree: RbTree<(u8, &str), First> = RbTree::with_comparator(Natural);
    /// let (pos, _) = tree.insert_unique((1, "one"));
    /// if let Some(entry) = tree.get_mut(pos) {
    ///     entry.1 = "uno";
    /// }
    /// assert_eq!(tree.get(pos), Some(&(1, "uno")));
    /// ```
    #[must_use]
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.live(pos).map(|h| self.raw.value_mut(h))
    }

    /// Returns the smallest element.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.leftmost().map(|h| self.raw.value(h))
    }

    /// Returns the largest element.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.rightmost().map(|h| self.raw.value(h))
    }

    /// Removes and returns the smallest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let mut tree = RbTree::<_>::from([2, 1]);
    /// assert_eq!(tree.pop_first(), Some(1));
    /// assert_eq!(tree.pop_first(), Some(2));
    /// assert_eq!(tree.pop_first(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.leftmost().map(|h| self.raw.erase(h))
    }

    /// Removes and returns the largest element.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<T> {
        self.raw.rightmost().map(|h| self.raw.erase(h))
    }

    /// Gets an iterator that visits the elements in ascending order. Use `.rev()` for
    /// descending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let tree = RbTree::<_>::from([3, 1, 2]);
    /// assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.raw, self.raw.leftmost(), self.raw.rightmost(), self.len())
    }

    /// Gets an iterator over the half-open position range `[first, last)`.
    ///
    /// # Panics
    ///
    /// Panics if `last` comes before `first`.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let tree = RbTree::<_>::from([1, 2, 3, 4, 5]);
    /// let from = tree.lower_bound(&2);
    /// let to = tree.upper_bound(&4);
    /// assert_eq!(tree.iter_between(from, to).copied().collect::<Vec<_>>(), [2, 3, 4]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(k) to set up, where k is the length of the range.
    pub fn iter_between(&self, first: Position, last: Position) -> Iter<'_, T> {
        let mut len = 0;
        let mut back = None;
        let mut current = self.live(first);
        let stop = self.live(last);
        while current != stop {
            let Some(h) = current else {
                panic!("`RbTree::iter_between()` - `last` precedes `first`!");
            };
            back = Some(h);
            len += 1;
            current = self.raw.successor(h);
        }
        Iter::new(&self.raw, self.live(first), back, len)
    }

    /// Removes the element at `pos` and returns the position that followed it.
    ///
    /// Positions to every other element stay valid.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is [`end()`](Self::end).
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let mut tree = RbTree::<_>::from([1, 2, 3]);
    /// let two = tree.find(&2);
    /// let three = tree.find(&3);
    /// assert_eq!(tree.erase(two), three);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn erase(&mut self, pos: Position) -> Position {
        let h = self.live(pos).unwrap_or_else(|| panic!("`RbTree::erase()` - cannot erase `end()`!"));
        let next = self.raw.successor(h);
        self.raw.erase(h);
        Position(next)
    }

    /// Removes the element at `pos` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is [`end()`](Self::end).
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, pos: Position) -> T {
        let h = self.live(pos).unwrap_or_else(|| panic!("`RbTree::remove()` - cannot remove `end()`!"));
        self.raw.erase(h)
    }

    /// Removes every element in the half-open range `[first, last)` and returns `last`.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let mut tree = RbTree::<_>::from([1, 2, 3, 4]);
    /// let from = tree.find(&2);
    /// let to = tree.find(&4);
    /// tree.erase_range(from, to);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 4]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(k log n) for k erased elements; O(n) when the range covers the whole tree.
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        if first == self.begin() && last.is_end() {
            log::debug!("erasing the whole range of {} elements", self.len());
            self.clear();
            return last;
        }

        let mut current = first;
        while current != last {
            current = self.erase(current);
        }
        last
    }

    /// Removes every element, keeping the comparator.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Exchanges the contents and comparators of two trees. Positions keep naming the same
    /// elements, which now live in the other tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Resolves a position to its node. The liveness check costs O(log n), so it only runs in
    /// debug builds.
    fn live(&self, pos: Position) -> Option<Handle> {
        let handle = pos.handle();
        if let Some(h) = handle {
            debug_assert!(self.raw.is_attached(h), "`RbTree` - position does not name an element of this tree!");
        }
        handle
    }
}

impl<T, X, C> RbTree<T, X, C>
where
    X: KeyOf<T>,
    C: Compare<X::Key>,
{
    /// Returns how a stored value orders relative to `key`.
    fn probe<'a>(&'a self, key: &'a X::Key) -> impl Fn(&T) -> Ordering {
        move |value: &T| self.cmp.compare(X::key_of(value), key)
    }

    /// Returns the key of the element at `pos`, or `None` for [`end()`](Self::end).
    #[must_use]
    pub fn key_at(&self, pos: Position) -> Option<&X::Key> {
        self.get(pos).map(X::key_of)
    }

    /// Returns the position of the first element whose key is equivalent to `key`, or
    /// [`end()`](Self::end) if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let tree = RbTree::<_>::from([1, 3]);
    /// assert_eq!(tree.get(tree.find(&3)), Some(&3));
    /// assert_eq!(tree.find(&2), tree.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn find(&self, key: &X::Key) -> Position {
        match self.raw.lower_bound(self.probe(key)) {
            Some(h) if self.cmp.compare(key, X::key_of(self.raw.value(h))) != Ordering::Less => Position(Some(h)),
            _ => Position::END,
        }
    }

    /// Returns the position of the first element whose key does not order before `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn lower_bound(&self, key: &X::Key) -> Position {
        Position(self.raw.lower_bound(self.probe(key)))
    }

    /// Returns the position of the first element whose key orders after `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn upper_bound(&self, key: &X::Key) -> Position {
        Position(self.raw.upper_bound(self.probe(key)))
    }

    /// Returns the half-open range of elements whose keys are equivalent to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let tree = RbTree::<_>::from([1, 2, 2, 3]);
    /// let (first, last) = tree.equal_range(&2);
    /// assert_eq!(tree.iter_between(first, last).count(), 2);
    /// assert_eq!(tree.get(last), Some(&3));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn equal_range(&self, key: &X::Key) -> (Position, Position) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Returns the number of elements whose keys are equivalent to `key`.
    ///
    /// # Complexity
    ///
    /// O(log n + k) for k matches.
    #[must_use]
    pub fn count(&self, key: &X::Key) -> usize {
        let (first, last) = self.equal_range(key);
        self.iter_between(first, last).len()
    }

    /// Returns `true` if an element with a key equivalent to `key` is present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains(&self, key: &X::Key) -> bool {
        !self.find(key).is_end()
    }

    /// Inserts `value` unless an element with an equivalent key is present.
    ///
    /// Returns the position of the new element and `true`, or the position of the existing
    /// element and `false`. If several equivalent elements were added with
    /// [`insert_equal`](Self::insert_equal), the last of them is reported. A rejected `value`
    /// is dropped.
    ///
    /// # Panics
    ///
    /// Panics if the node cannot be allocated. See
    /// [`try_insert_unique`](Self::try_insert_unique).
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// let (pos, inserted) = tree.insert_unique(7);
    /// assert!(inserted);
    /// assert_eq!(tree.insert_unique(7), (pos, false));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert_unique(&mut self, value: T) -> (Position, bool) {
        match self.try_insert_unique(value) {
            Ok(result) => result,
            Err(err) => panic!("`RbTree::insert_unique()` - {err}"),
        }
    }

    /// Like [`insert_unique`](Self::insert_unique), but reports allocation failure instead of
    /// panicking. On error the tree is unchanged and `value` is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] if memory for the node cannot be obtained, [`Error::CapacityExceeded`]
    /// if the tree already holds [`max_size()`](Self::max_size) elements.
    pub fn try_insert_unique(&mut self, value: T) -> Result<(Position, bool)> {
        let slot = self.raw.unique_slot(self.probe(X::key_of(&value)));
        self.link_unique(slot, value)
    }

    /// Inserts `value`, placing it after every element with an equivalent key.
    ///
    /// # Panics
    ///
    /// Panics if the node cannot be allocated. See
    /// [`try_insert_equal`](Self::try_insert_equal).
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::{First, Natural, RbTree};
    ///
    /// let mut tree: RbTree<(i32, char), First> = RbTree::with_comparator(Natural);
    /// tree.insert_equal((1, 'a'));
    /// tree.insert_equal((0, 'b'));
    /// tree.insert_equal((1, 'c'));
    /// assert_eq!(tree.iter().map(|e| e.1).collect::<String>(), "bac");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert_equal(&mut self, value: T) -> Position {
        match self.try_insert_equal(value) {
            Ok(pos) => pos,
            Err(err) => panic!("`RbTree::insert_equal()` - {err}"),
        }
    }

    /// Like [`insert_equal`](Self::insert_equal), but reports allocation failure instead of
    /// panicking. On error the tree is unchanged and `value` is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] if memory for the node cannot be obtained, [`Error::CapacityExceeded`]
    /// if the tree already holds [`max_size()`](Self::max_size) elements.
    pub fn try_insert_equal(&mut self, value: T) -> Result<Position> {
        let slot = self.raw.equal_slot(self.probe(X::key_of(&value)));
        Ok(Position(Some(self.raw.try_link(slot, value)?)))
    }

    /// Inserts `value` unless an equivalent key is present, trying first to place it
    /// immediately before `hint`. A correct hint saves the descent from the root; a wrong one
    /// costs only a comparison or two.
    ///
    /// # Panics
    ///
    /// Panics if the node cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// for v in 0..100 {
    ///     // Appending in order: `end()` is always the right hint.
    ///     tree.insert_unique_hint(tree.end(), v);
    /// }
    /// assert_eq!(tree.len(), 100);
    /// ```
    ///
    /// # Complexity
    ///
    /// Amortized O(1) with a correct hint, O(log n) otherwise.
    pub fn insert_unique_hint(&mut self, hint: Position, value: T) -> (Position, bool) {
        match self.try_insert_unique_hint(hint, value) {
            Ok(result) => result,
            Err(err) => panic!("`RbTree::insert_unique_hint()` - {err}"),
        }
    }

    /// Fallible form of [`insert_unique_hint`](Self::insert_unique_hint).
    ///
    /// # Errors
    ///
    /// As for [`try_insert_unique`](Self::try_insert_unique).
    pub fn try_insert_unique_hint(&mut self, hint: Position, value: T) -> Result<(Position, bool)> {
        let hint = self.live(hint);
        let slot = self.raw.unique_hint_slot(hint, self.probe(X::key_of(&value)));
        self.link_unique(slot, value)
    }

    /// Inserts `value` as close as possible before `hint` among the positions that keep the
    /// tree ordered.
    ///
    /// Unlike [`insert_equal`](Self::insert_equal), a hint can place a value before existing
    /// equivalent ones.
    ///
    /// # Panics
    ///
    /// Panics if the node cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::{First, Natural, RbTree};
    ///
    /// let mut tree: RbTree<(i32, char), First> = RbTree::with_comparator(Natural);
    /// let b = tree.insert_equal((1, 'b'));
    /// tree.insert_equal_hint(b, (1, 'a'));
    /// assert_eq!(tree.iter().map(|e| e.1).collect::<String>(), "ab");
    /// ```
    ///
    /// # Complexity
    ///
    /// Amortized O(1) with a correct hint, O(log n) otherwise.
    pub fn insert_equal_hint(&mut self, hint: Position, value: T) -> Position {
        match self.try_insert_equal_hint(hint, value) {
            Ok(pos) => pos,
            Err(err) => panic!("`RbTree::insert_equal_hint()` - {err}"),
        }
    }

    /// Fallible form of [`insert_equal_hint`](Self::insert_equal_hint).
    ///
    /// # Errors
    ///
    /// As for [`try_insert_equal`](Self::try_insert_equal).
    pub fn try_insert_equal_hint(&mut self, hint: Position, value: T) -> Result<Position> {
        let hint = self.live(hint);
        let slot = self.raw.equal_hint_slot(hint, self.probe(X::key_of(&value)));
        Ok(Position(Some(self.raw.try_link(slot, value)?)))
    }

    /// Inserts every value of `iter` with [`insert_unique`](Self::insert_unique) semantics and
    /// returns how many were inserted. Sorted input is appended without descents.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// assert_eq!(tree.insert_unique_iter([3, 1, 3, 2, 1]), 3);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// ```
    pub fn insert_unique_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) -> usize {
        let mut inserted = 0;
        for value in iter {
            if self.insert_unique_hint(Position::END, value).1 {
                inserted += 1;
            }
        }
        inserted
    }

    /// Inserts every value of `iter` with [`insert_equal`](Self::insert_equal) semantics.
    /// Equivalent values keep the order in which `iter` yields them.
    pub fn insert_equal_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert_equal_hint(Position::END, value);
        }
    }

    /// Removes every element whose key is equivalent to `key` and returns how many there were.
    ///
    /// # Examples
    ///
    /// ```
    /// use redwood_tree::RbTree;
    ///
    /// let mut tree = RbTree::<_>::from([1, 2, 2, 3]);
    /// assert_eq!(tree.erase_key(&2), 2);
    /// assert_eq!(tree.erase_key(&2), 0);
    /// assert_eq!(tree.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + k log n) for k matches.
    pub fn erase_key(&mut self, key: &X::Key) -> usize {
        let (first, last) = self.equal_range(key);
        let before = self.len();
        self.erase_range(first, last);
        before - self.len()
    }

    /// Checks every structural invariant of the tree: parent links, node colors, equal black
    /// height on every path, the cached extremes and the element count, and ascending key
    /// order.
    ///
    /// # Errors
    ///
    /// [`Error::Corrupted`] naming the first broken invariant.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn validate(&self) -> Result<()> {
        self.raw
            .validate(|a, b| self.cmp.compare(X::key_of(a), X::key_of(b)) != Ordering::Greater)
            .map_err(Error::Corrupted)
    }

    fn link_unique(&mut self, slot: core::result::Result<Slot, Handle>, value: T) -> Result<(Position, bool)> {
        match slot {
            Ok(slot) => Ok((Position(Some(self.raw.try_link(slot, value)?)), true)),
            Err(existing) => Ok((Position(Some(existing)), false)),
        }
    }
}

impl<T: Clone, X, C: Clone> Clone for RbTree<T, X, C> {
    fn clone(&self) -> Self {
        RbTree {
            raw: self.raw.clone(),
            cmp: self.cmp.clone(),
            _key: PhantomData,
        }
    }
}

impl<T, X, C: Default> Default for RbTree<T, X, C> {
    /// Creates an empty tree with the default comparator.
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: fmt::Debug, X, C> fmt::Debug for RbTree<T, X, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, X, C> PartialEq for RbTree<T, X, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, X, C> Eq for RbTree<T, X, C> {}

impl<T: PartialOrd, X, C> PartialOrd for RbTree<T, X, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, X, C> Ord for RbTree<T, X, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, X, C> Hash for RbTree<T, X, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T, X, C> FromIterator<T> for RbTree<T, X, C>
where
    X: KeyOf<T>,
    C: Compare<X::Key> + Default,
{
    /// Collects with [`insert_equal`](RbTree::insert_equal) semantics: nothing is dropped.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.insert_equal_iter(iter);
        tree
    }
}

impl<T, X, C> Extend<T> for RbTree<T, X, C>
where
    X: KeyOf<T>,
    C: Compare<X::Key>,
{
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_equal_iter(iter);
    }
}

impl<'a, T: Copy + 'a, X, C> Extend<&'a T> for RbTree<T, X, C>
where
    X: KeyOf<T>,
    C: Compare<X::Key>,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.insert_equal_iter(iter.into_iter().copied());
    }
}

impl<T, X, C, const N: usize> From<[T; N]> for RbTree<T, X, C>
where
    X: KeyOf<T>,
    C: Compare<X::Key> + Default,
{
    /// Builds a tree holding every element of `arr`, duplicates included.
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T, X, C> IntoIterator for &'a RbTree<T, X, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, X, C> IntoIterator for RbTree<T, X, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator over the elements in ascending order.
    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter::new(self.raw.drain_to_vec())
    }
}
