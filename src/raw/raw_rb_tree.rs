use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};

/// The red-black tree engine backing `RbTree`.
///
/// Knows nothing about keys or comparators: every ordered operation takes a probe closure
/// that reports how a stored value compares to the key being searched for.
pub(crate) struct RawRbTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    pub(super) root: Option<Handle>,
    /// Cached minimum node, for O(1) `begin()`.
    pub(super) leftmost: Option<Handle>,
    /// Cached maximum node, for O(1) stepping back from `end()`.
    pub(super) rightmost: Option<Handle>,
    /// Number of data nodes.
    pub(super) len: usize,
}

/// Tree height is at most `2 * log2(n + 1)`, so the walk stack stays inline for realistic trees.
type Stack = SmallVec<[(Handle, usize); 64]>;

impl<T> RawRbTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            leftmost: None,
            rightmost: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Returns the number of elements in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> crate::Result<()> {
        self.nodes.try_reserve(additional)
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn leftmost(&self) -> Option<Handle> {
        self.leftmost
    }

    pub(crate) fn rightmost(&self) -> Option<Handle> {
        self.rightmost
    }

    /// Drops every node and resets the anchor to the empty state.
    pub(crate) fn clear(&mut self) {
        if self.len > 0 {
            log::debug!("clearing tree of {} nodes", self.len);
        }
        self.nodes.clear();
        self.root = None;
        self.leftmost = None;
        self.rightmost = None;
        self.len = 0;
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &T {
        &self.nodes.get(handle).value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut T {
        &mut self.nodes.get_mut(handle).value
    }

    pub(super) fn nodes_mut(&mut self) -> &mut Arena<Node<T>> {
        &mut self.nodes
    }

    /// Empty links count as black.
    #[inline]
    pub(super) fn is_red(&self, link: Option<Handle>) -> bool {
        link.is_some_and(|h| self.node(h).is_red())
    }

    #[inline]
    pub(super) fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).color = color;
    }

    /// Points whichever link of `parent` held `old` at `new` instead; `None` means the root.
    pub(super) fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = self.node_mut(p);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    pub(crate) fn minimum(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.node(handle).left {
            handle = left;
        }
        handle
    }

    pub(crate) fn maximum(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.node(handle).right {
            handle = right;
        }
        handle
    }

    /// In-order successor, or `None` when `handle` is the maximum.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Side::Right)
    }

    /// In-order predecessor, or `None` when `handle` is the minimum.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Side::Left)
    }

    /// One in-order step toward `side`: into the subtree on that side when there is one,
    /// otherwise up past every ancestor reached from that side.
    fn step(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.node(handle).child(side) {
            return Some(match side {
                Side::Right => self.minimum(child),
                Side::Left => self.maximum(child),
            });
        }

        let mut current = handle;
        let mut parent = self.node(current).parent;
        while let Some(p) = parent {
            if self.node(p).child(side) != Some(current) {
                break;
            }
            current = p;
            parent = self.node(p).parent;
        }
        parent
    }

    /// Returns true if `handle` is a live node reachable from this tree's root.
    pub(crate) fn is_attached(&self, handle: Handle) -> bool {
        if !self.nodes.contains(handle) {
            return false;
        }
        let mut current = handle;
        while let Some(parent) = self.node(current).parent {
            if !self.nodes.contains(parent) {
                return false;
            }
            current = parent;
        }
        self.root == Some(current)
    }

    /// First node whose value does not compare less than the probe key.
    ///
    /// `probe(value)` returns how `value` orders relative to the key.
    pub(crate) fn lower_bound(&self, probe: impl Fn(&T) -> Ordering) -> Option<Handle> {
        let mut candidate = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            if probe(&node.value) == Ordering::Less {
                current = node.right;
            } else {
                candidate = Some(h);
                current = node.left;
            }
        }
        candidate
    }

    /// First node whose value compares greater than the probe key.
    pub(crate) fn upper_bound(&self, probe: impl Fn(&T) -> Ordering) -> Option<Handle> {
        let mut candidate = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            if probe(&node.value) == Ordering::Greater {
                candidate = Some(h);
                current = node.left;
            } else {
                current = node.right;
            }
        }
        candidate
    }

    /// Moves every value out in ascending order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<T> {
        let mut order = Vec::with_capacity(self.len);
        let mut current = self.leftmost;
        while let Some(h) = current {
            order.push(h);
            current = self.successor(h);
        }

        let values = order.into_iter().map(|h| self.nodes.take(h).value).collect();
        self.clear();
        values
    }

    /// Checks every structural invariant. `in_order(a, b)` must return true when `a` may
    /// precede `b` in ascending order.
    pub(crate) fn validate(&self, in_order: impl Fn(&T, &T) -> bool) -> Result<(), String> {
        let Some(root) = self.root else {
            if self.len != 0 || self.leftmost.is_some() || self.rightmost.is_some() {
                return Err(format!(
                    "empty tree has len={} leftmost={:?} rightmost={:?}",
                    self.len, self.leftmost, self.rightmost
                ));
            }
            return Ok(());
        };

        if self.node(root).parent.is_some() {
            return Err(format!("root {root:?} has a parent"));
        }
        if self.node(root).is_red() {
            return Err(format!("root {root:?} is red"));
        }

        // Depth-first walk checking links, colors and black-height.
        let mut black_height: Option<usize> = None;
        let mut count = 0usize;
        let mut stack: Stack = SmallVec::new();
        stack.push((root, 1));
        while let Some((h, blacks)) = stack.pop() {
            count += 1;
            let node = self.node(h);
            for child in [node.left, node.right] {
                match child {
                    Some(c) => {
                        let child_node = self.node(c);
                        if child_node.parent != Some(h) {
                            return Err(format!("{c:?} does not point back to parent {h:?}"));
                        }
                        if node.is_red() && child_node.is_red() {
                            return Err(format!("red node {h:?} has red child {c:?}"));
                        }
                        let below = blacks + usize::from(!child_node.is_red());
                        stack.push((c, below));
                    }
                    None => match black_height {
                        None => black_height = Some(blacks),
                        Some(expected) if expected != blacks => {
                            return Err(format!(
                                "black-height mismatch below {h:?}: expected {expected}, found {blacks}"
                            ));
                        }
                        Some(_) => {}
                    },
                }
            }
        }

        if count != self.len {
            return Err(format!("len={} but {} nodes are reachable", self.len, count));
        }
        if self.nodes.len() != self.len {
            return Err(format!("len={} but the arena holds {} nodes", self.len, self.nodes.len()));
        }
        if self.leftmost != Some(self.minimum(root)) {
            return Err(format!("leftmost={:?} is not the minimum {:?}", self.leftmost, self.minimum(root)));
        }
        if self.rightmost != Some(self.maximum(root)) {
            return Err(format!("rightmost={:?} is not the maximum {:?}", self.rightmost, self.maximum(root)));
        }

        // Ordered walk: every adjacent pair must be in order.
        let mut previous = self.leftmost;
        let mut walked = 0usize;
        while let Some(h) = previous {
            walked += 1;
            let next = self.successor(h);
            if let Some(n) = next
                && !in_order(self.value(h), self.value(n))
            {
                return Err(format!("{h:?} and its successor {n:?} are out of order"));
            }
            previous = next;
        }
        if walked != self.len {
            return Err(format!("in-order walk visited {walked} of {} nodes", self.len));
        }

        Ok(())
    }
}

impl<T: Clone> Clone for RawRbTree<T> {
    /// Structural deep clone: same shape, same colors, freshly packed arena.
    fn clone(&self) -> Self {
        fn clone_subtree<T: Clone>(
            old: &RawRbTree<T>,
            new_nodes: &mut Arena<Node<T>>,
            old_handle: Handle,
            parent: Option<Handle>,
        ) -> Handle {
            let old_node = old.node(old_handle);
            let handle = new_nodes.alloc(Node {
                color: old_node.color,
                parent,
                left: None,
                right: None,
                value: old_node.value.clone(),
            });

            // Recursion depth is bounded by the tree height.
            if let Some(left) = old_node.left {
                let new_left = clone_subtree(old, new_nodes, left, Some(handle));
                new_nodes.get_mut(handle).left = Some(new_left);
            }
            if let Some(right) = old_node.right {
                let new_right = clone_subtree(old, new_nodes, right, Some(handle));
                new_nodes.get_mut(handle).right = Some(new_right);
            }
            handle
        }

        let mut tree = RawRbTree::with_capacity(self.len);
        if let Some(root) = self.root {
            log::debug!("deep-cloning tree of {} nodes", self.len);
            let new_root = clone_subtree(self, &mut tree.nodes, root, None);
            tree.root = Some(new_root);
            tree.leftmost = Some(tree.minimum(new_root));
            tree.rightmost = Some(tree.maximum(new_root));
            tree.len = self.len;
        }
        tree
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub(crate) mod tests {
    use super::*;
    use crate::raw::insert::Slot;
    use proptest::prelude::*;

    impl<T: Ord> RawRbTree<T> {
        /// Panics with a descriptive message if any invariant is violated.
        pub(crate) fn validate_invariants(&self) {
            if let Err(reason) = self.validate(|a, b| a <= b) {
                panic!("Tree invariant violation: {reason}");
            }
        }

        pub(crate) fn insert_equal(&mut self, value: T) -> Handle {
            let slot = self.equal_slot(|v| v.cmp(&value));
            self.try_link(slot, value).unwrap()
        }

        pub(crate) fn insert_unique(&mut self, value: T) -> Result<Handle, Handle> {
            match self.unique_slot(|v| v.cmp(&value)) {
                Ok(slot) => Ok(self.try_link(slot, value).unwrap()),
                Err(existing) => Err(existing),
            }
        }

        pub(crate) fn find(&self, value: &T) -> Option<Handle> {
            self.lower_bound(|v| v.cmp(value)).filter(|&h| self.value(h) == value)
        }

        pub(crate) fn to_vec(&self) -> Vec<T>
        where
            T: Clone,
        {
            let mut out = Vec::with_capacity(self.len);
            let mut current = self.leftmost;
            while let Some(h) = current {
                out.push(self.value(h).clone());
                current = self.successor(h);
            }
            out
        }

        /// Length of the longest root-to-leaf path, in nodes.
        pub(crate) fn height(&self) -> usize {
            fn depth<T>(tree: &RawRbTree<T>, link: Option<Handle>) -> usize {
                link.map_or(0, |h| 1 + depth(tree, tree.node(h).left).max(depth(tree, tree.node(h).right)))
            }
            depth(self, self.root)
        }
    }

    fn ascending(n: i32) -> RawRbTree<i32> {
        let mut tree = RawRbTree::new();
        for i in 1..=n {
            tree.insert_unique(i).unwrap();
        }
        tree
    }

    #[test]
    fn empty_tree() {
        let tree: RawRbTree<i32> = RawRbTree::new();
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.leftmost(), None);
        assert_eq!(tree.rightmost(), None);
        assert_eq!(tree.lower_bound(|v| v.cmp(&0)), None);
    }

    #[test]
    fn successor_and_predecessor_walk_every_node() {
        let tree = ascending(100);
        tree.validate_invariants();

        let mut forward = Vec::new();
        let mut current = tree.leftmost();
        while let Some(h) = current {
            forward.push(*tree.value(h));
            current = tree.successor(h);
        }
        assert_eq!(forward, (1..=100).collect::<Vec<_>>());

        let mut backward = Vec::new();
        let mut current = tree.rightmost();
        while let Some(h) = current {
            backward.push(*tree.value(h));
            current = tree.predecessor(h);
        }
        assert_eq!(backward, (1..=100).rev().collect::<Vec<_>>());
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let n = 1 << 12;
        let tree = ascending(n);
        tree.validate_invariants();
        // Red-black height bound: 2 * log2(n + 1).
        assert!(tree.height() <= 2 * 13, "height {} too large", tree.height());
    }

    #[test]
    fn bounds_on_runs_of_equal_values() {
        let mut tree = RawRbTree::new();
        for v in [1, 3, 3, 3, 5, 7, 7] {
            tree.insert_equal(v);
        }
        tree.validate_invariants();

        let lo = tree.lower_bound(|v| v.cmp(&3)).unwrap();
        let hi = tree.upper_bound(|v| v.cmp(&3)).unwrap();
        assert_eq!(*tree.value(lo), 3);
        assert_eq!(*tree.value(hi), 5);
        assert_eq!(tree.predecessor(lo).map(|h| *tree.value(h)), Some(1));

        // Absent keys give an empty range.
        let lo = tree.lower_bound(|v| v.cmp(&4));
        let hi = tree.upper_bound(|v| v.cmp(&4));
        assert_eq!(lo, hi);
        assert_eq!(tree.upper_bound(|v| v.cmp(&7)), None);
        assert_eq!(tree.lower_bound(|v| v.cmp(&0)), tree.leftmost());
    }

    #[test]
    fn clone_is_structural_and_independent() {
        let mut tree = ascending(50);
        for v in (1..=50).step_by(3) {
            let h = tree.find(&v).unwrap();
            tree.erase(h);
        }
        let copy = tree.clone();
        copy.validate_invariants();
        assert_eq!(copy.to_vec(), tree.to_vec());
        assert_eq!(copy.height(), tree.height());

        // Same colors on the same shape.
        let root = tree.root().unwrap();
        let copy_root = copy.root().unwrap();
        assert_eq!(tree.node(root).color, copy.node(copy_root).color);

        let mut copy = copy;
        copy.insert_unique(1000).unwrap();
        assert!(!tree.to_vec().contains(&1000));
    }

    #[test]
    fn drain_leaves_tree_empty() {
        let mut tree = ascending(20);
        let drained = tree.drain_to_vec();
        assert_eq!(drained, (1..=20).collect::<Vec<_>>());
        tree.validate_invariants();
        assert!(tree.is_empty());
    }

    #[test]
    fn attached_handles() {
        let mut tree = ascending(10);
        let h = tree.find(&4).unwrap();
        assert!(tree.is_attached(h));
        tree.erase(h);
        assert!(!tree.is_attached(h));
    }

    #[test]
    fn validate_reports_broken_colors() {
        let mut tree = ascending(3);
        let root = tree.root().unwrap();
        tree.set_color(root, Color::Red);
        let err = tree.validate(|a, b| a <= b).unwrap_err();
        assert!(err.contains("is red"), "{err}");
    }

    #[test]
    fn validate_reports_out_of_order_values() {
        let mut tree = ascending(7);
        let h = tree.find(&2).unwrap();
        *tree.value_mut(h) = 100;
        let err = tree.validate(|a, b| a <= b).unwrap_err();
        assert!(err.contains("out of order"), "{err}");
    }

    #[test]
    fn linking_into_an_empty_slot() {
        let mut tree = RawRbTree::new();
        let h = tree
            .try_link(
                Slot {
                    parent: None,
                    side: Side::Left,
                },
                9,
            )
            .unwrap();
        assert_eq!(tree.root(), Some(h));
        assert_eq!(tree.leftmost(), Some(h));
        assert_eq!(tree.rightmost(), Some(h));
        tree.validate_invariants();
    }

    // Test operations enum for property testing
    #[derive(Clone, Debug)]
    pub(crate) enum Op {
        InsertUnique(i32),
        InsertEqual(i32),
        Erase(i32),
    }

    pub(crate) fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..200).prop_map(Op::InsertUnique),
            2 => (0i32..200).prop_map(Op::InsertEqual),
            3 => (0i32..200).prop_map(Op::Erase),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn tree_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawRbTree<i32> = RawRbTree::new();
            let mut model: Vec<i32> = Vec::new();

            for op in ops {
                match op {
                    Op::InsertUnique(v) => {
                        let inserted = tree.insert_unique(v).is_ok();
                        prop_assert_eq!(inserted, !model.contains(&v));
                        if inserted {
                            model.push(v);
                        }
                    }
                    Op::InsertEqual(v) => {
                        tree.insert_equal(v);
                        model.push(v);
                    }
                    Op::Erase(v) => {
                        let found = tree.find(&v);
                        let position = model.iter().position(|&m| m == v);
                        prop_assert_eq!(found.is_some(), position.is_some());
                        if let (Some(h), Some(i)) = (found, position) {
                            prop_assert_eq!(tree.erase(h), v);
                            model.swap_remove(i);
                        }
                    }
                }
                tree.validate_invariants();
                model.sort_unstable();
                prop_assert_eq!(tree.to_vec(), model.clone());
            }
        }

        #[test]
        fn erasing_everything_returns_to_empty(values in prop::collection::vec(0i32..1000, 0..300), seed in any::<u64>()) {
            let mut tree: RawRbTree<i32> = RawRbTree::new();
            let mut handles = Vec::new();
            for v in values {
                handles.push(tree.insert_equal(v));
            }

            // Deterministic shuffle of the erase order.
            let mut state = seed | 1;
            for i in (1..handles.len()).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                handles.swap(i, (state % (i as u64 + 1)) as usize);
            }

            for h in handles {
                tree.erase(h);
                tree.validate_invariants();
            }
            prop_assert!(tree.is_empty());
            prop_assert_eq!(tree.root(), None);
            prop_assert_eq!(tree.leftmost(), None);
            prop_assert_eq!(tree.rightmost(), None);
        }
    }
}
