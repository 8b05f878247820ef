use super::handle::Handle;
use super::node::{Color, Side};
use super::raw_rb_tree::RawRbTree;

impl<T> RawRbTree<T> {
    /// Unlinks `z`, rebalances and returns its value.
    ///
    /// Values never move between nodes: when `z` has two children its in-order successor is
    /// spliced into `z`'s place (taking `z`'s color) and `z` itself is freed. Handles to every
    /// other node stay valid.
    pub(crate) fn erase(&mut self, z: Handle) -> T {
        debug_assert!(self.is_attached(z), "`RawRbTree::erase()` - `handle` is not in this tree!");

        let (z_parent, z_left, z_right, z_color) = {
            let node = self.node(z);
            (node.parent, node.left, node.right, node.color)
        };

        // The extremes have at most one child, so one step finds the new extreme.
        if self.leftmost == Some(z) {
            self.leftmost = match z_right {
                Some(right) => Some(self.minimum(right)),
                None => z_parent,
            };
        }
        if self.rightmost == Some(z) {
            self.rightmost = match z_left {
                Some(left) => Some(self.maximum(left)),
                None => z_parent,
            };
        }

        // `x` takes the place of the node physically removed from its position; `x_parent` is
        // tracked separately because `x` may be an empty link.
        let (x, x_parent, removed_color) = match (z_left, z_right) {
            (Some(left), Some(right)) => {
                let y = self.minimum(right);
                let y_color = self.node(y).color;
                let x = self.node(y).right;

                let x_parent = if y == right {
                    Some(y)
                } else {
                    let y_parent = self.node(y).parent;
                    self.transplant(y, x);
                    self.node_mut(y).right = Some(right);
                    self.node_mut(right).parent = Some(y);
                    y_parent
                };

                self.transplant(z, Some(y));
                self.node_mut(y).left = Some(left);
                self.node_mut(left).parent = Some(y);
                self.set_color(y, z_color);
                (x, x_parent, y_color)
            }
            (child, None) | (None, child) => {
                self.transplant(z, child);
                (child, z_parent, z_color)
            }
        };

        if removed_color == Color::Black {
            self.erase_fixup(x, x_parent);
        }

        self.len -= 1;
        self.nodes_mut().take(z).value
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v` in `u`'s parent.
    fn transplant(&mut self, u: Handle, v: Option<Handle>) {
        let parent = self.node(u).parent;
        self.replace_child(parent, u, v);
        if let Some(v) = v {
            self.node_mut(v).parent = parent;
        }
    }

    /// Restores the red-black invariants after a black node was removed above `x`.
    ///
    /// `x` carries an extra black; the loop pushes it up or absorbs it using the sibling `w`.
    fn erase_fixup(&mut self, mut x: Option<Handle>, mut x_parent: Option<Handle>) {
        while x != self.root && !self.is_red(x) {
            let parent = x_parent.expect("`RawRbTree::erase_fixup()` - non-root link without a parent!");
            // An empty `x` is on the side whose link is empty.
            let side = if self.node(parent).left == x {
                Side::Left
            } else {
                Side::Right
            };
            let far = side.opposite();
            let mut w = self.sibling(parent, far);

            if self.node(w).is_red() {
                // Red sibling: rotate it above the parent so the new sibling is black.
                self.set_color(w, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                w = self.sibling(parent, far);
            }

            let near_child = self.node(w).child(side);
            let far_child = self.node(w).child(far);

            if !self.is_red(near_child) && !self.is_red(far_child) {
                // Both nephews black: the sibling gives up a black and the deficit moves up.
                self.set_color(w, Color::Red);
                x = Some(parent);
                x_parent = self.node(parent).parent;
                continue;
            }

            if !self.is_red(far_child) {
                // Near nephew red, far black: rotate the red one into the far position.
                if let Some(near) = near_child {
                    self.set_color(near, Color::Black);
                }
                self.set_color(w, Color::Red);
                self.rotate(w, far);
                w = self.sibling(parent, far);
            }

            // Far nephew red: one rotation at the parent absorbs the extra black.
            let parent_color = self.node(parent).color;
            self.set_color(w, parent_color);
            self.set_color(parent, Color::Black);
            if let Some(far_child) = self.node(w).child(far) {
                self.set_color(far_child, Color::Black);
            }
            self.rotate(parent, side);
            x = self.root;
            break;
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }

    /// The child of `parent` on side `far`; a doubly-black link always has one.
    fn sibling(&self, parent: Handle, far: Side) -> Handle {
        self.node(parent).child(far).expect("`RawRbTree::erase_fixup()` - doubly-black link without a sibling!")
    }
}
