use super::handle::Handle;
use super::node::Side;
use super::raw_rb_tree::RawRbTree;

impl<T> RawRbTree<T> {
    /// Rotates the 2-node subtree at `x` so that `x` moves down toward `toward` and its
    /// child on the other side takes its place. In-order sequence is unchanged.
    ///
    /// `rotate(x, Side::Left)` is the classic left rotation.
    pub(super) fn rotate(&mut self, x: Handle, toward: Side) {
        let up = toward.opposite();
        let y = self.node(x).child(up).expect("`RawRbTree::rotate()` - no child to rotate up!");

        // y's inner subtree changes sides and becomes x's child.
        let inner = self.node(y).child(toward);
        self.node_mut(x).set_child(up, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }

        let parent = self.node(x).parent;
        self.node_mut(y).parent = parent;
        self.replace_child(parent, x, Some(y));

        self.node_mut(y).set_child(toward, Some(x));
        self.node_mut(x).parent = Some(y);
    }
}
