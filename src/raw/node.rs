use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A data node: color bit, three structural links and the payload.
///
/// A missing link is `None`; there is no sentinel node. The root's parent is `None`.
pub(crate) struct Node<T> {
    pub(crate) color: Color,
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) value: T,
}

impl<T> Node<T> {
    /// A freshly attached node: red, with no children.
    pub(crate) fn new_leaf(value: T, parent: Option<Handle>) -> Self {
        Self {
            color: Color::Red,
            parent,
            left: None,
            right: None,
            value,
        }
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// Returns the child on the requested side.
    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

/// Which child slot of a parent a node occupies (or will occupy).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
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

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_leaf_is_red_and_childless() {
        let parent = Handle::from_index(3);
        let node = Node::new_leaf('x', Some(parent));
        assert!(node.is_red());
        assert_eq!(node.parent, Some(parent));
        assert_eq!(node.child(Side::Left), None);
        assert_eq!(node.child(Side::Right), None);
    }

    #[test]
    fn set_child_by_side() {
        let mut node = Node::new_leaf(0u8, None);
        let a = Handle::from_index(1);
        let b = Handle::from_index(2);
        node.set_child(Side::Left, Some(a));
        node.set_child(Side::Left.opposite(), Some(b));
        assert_eq!(node.left, Some(a));
        assert_eq!(node.right, Some(b));
    }
}
