use crate::raw::Handle;

/// A stable reference to an element of an [`RbTree`](crate::RbTree), or the past-the-end
/// position [`end()`](crate::RbTree::end).
///
/// A position is a plain copyable token: it borrows nothing, so the tree can be mutated while
/// positions are held. It stays valid until the element it names is erased, no matter how
/// many other elements are inserted or erased in the meantime. Using a position after its
/// element was erased, or with a different tree, is a logic error.
///
/// # Examples
///
/// ```
/// use redwood_tree::RbTree;
///
/// let mut tree = RbTree::new();
/// let (two, _) = tree.insert_unique(2);
/// for v in [5, 1, 4, 3] {
///     tree.insert_unique(v);
/// }
/// assert_eq!(tree.get(two), Some(&2));
/// assert_eq!(tree.get(tree.next(two)), Some(&3));
/// assert!(tree.end().is_end());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position(pub(crate) Option<Handle>);

impl Position {
    /// The past-the-end position.
    pub(crate) const END: Position = Position(None);

    /// Returns true if this is the past-the-end position.
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0.is_none()
    }

    pub(crate) const fn handle(self) -> Option<Handle> {
        self.0
    }
}
