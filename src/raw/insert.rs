use core::cmp::Ordering;

use super::handle::Handle;
use super::node::{Color, Node, Side};
use super::raw_rb_tree::RawRbTree;
use crate::error::Result;

/// Where a new node will be attached: the empty `side` link of `parent`, or the root when
/// `parent` is `None`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Slot {
    pub(crate) parent: Option<Handle>,
    pub(crate) side: Side,
}

impl Slot {
    const ROOT: Slot = Slot {
        parent: None,
        side: Side::Left,
    };
}

// Slot searches only read the tree and call `probe`; `try_link` is the only mutation. A
// panicking probe therefore leaves the tree untouched.
impl<T> RawRbTree<T> {
    /// Slot for a key that may duplicate existing ones. Ties descend right, so the new node
    /// follows every equal node already present.
    pub(crate) fn equal_slot(&self, probe: impl Fn(&T) -> Ordering) -> Slot {
        let mut slot = Slot::ROOT;
        let mut current = self.root();
        while let Some(h) = current {
            let node = self.node(h);
            let side = if probe(&node.value) == Ordering::Greater {
                Side::Left
            } else {
                Side::Right
            };
            slot = Slot {
                parent: Some(h),
                side,
            };
            current = node.child(side);
        }
        slot
    }

    /// Slot for a key that must not already be present, or `Err` with the equal node.
    ///
    /// The descent alone cannot see an equal node elsewhere in the tree. The only node that
    /// can equal the key is the in-order predecessor of the slot (the greatest node not
    /// greater than the key), so that one neighbour is checked.
    pub(crate) fn unique_slot(&self, probe: impl Fn(&T) -> Ordering) -> core::result::Result<Slot, Handle> {
        let slot = self.equal_slot(&probe);
        let Some(parent) = slot.parent else {
            return Ok(slot);
        };

        let neighbour = match slot.side {
            Side::Right => Some(parent),
            Side::Left => self.predecessor(parent),
        };
        match neighbour {
            Some(n) if probe(self.value(n)) != Ordering::Less => Err(n),
            _ => Ok(slot),
        }
    }

    /// Like [`unique_slot`](Self::unique_slot), but first tries to place the key right before
    /// `hint` (`None` meaning after the maximum), which costs no descent when it fits.
    pub(crate) fn unique_hint_slot(
        &self,
        hint: Option<Handle>,
        probe: impl Fn(&T) -> Ordering,
    ) -> core::result::Result<Slot, Handle> {
        match hint {
            None => {
                if let Some(max) = self.rightmost()
                    && probe(self.value(max)) == Ordering::Less
                {
                    return Ok(Slot {
                        parent: Some(max),
                        side: Side::Right,
                    });
                }
            }
            Some(h) => {
                if probe(self.value(h)) == Ordering::Greater {
                    match self.predecessor(h) {
                        None => {
                            return Ok(Slot {
                                parent: Some(h),
                                side: Side::Left,
                            });
                        }
                        Some(before) if probe(self.value(before)) == Ordering::Less => {
                            return Ok(self.slot_between(before, h));
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        self.unique_slot(probe)
    }

    /// Like [`equal_slot`](Self::equal_slot), but first tries to place the key right before
    /// `hint` (`None` meaning after the maximum).
    pub(crate) fn equal_hint_slot(&self, hint: Option<Handle>, probe: impl Fn(&T) -> Ordering) -> Slot {
        match hint {
            None => {
                if let Some(max) = self.rightmost()
                    && probe(self.value(max)) != Ordering::Greater
                {
                    return Slot {
                        parent: Some(max),
                        side: Side::Right,
                    };
                }
            }
            Some(h) => {
                if probe(self.value(h)) != Ordering::Less {
                    match self.predecessor(h) {
                        None => {
                            return Slot {
                                parent: Some(h),
                                side: Side::Left,
                            };
                        }
                        Some(before) if probe(self.value(before)) != Ordering::Greater => {
                            return self.slot_between(before, h);
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        self.equal_slot(probe)
    }

    /// The empty link between two in-order neighbours. Either `before` has no right child,
    /// or `after` is the leftmost node of that right subtree and has no left child.
    fn slot_between(&self, before: Handle, after: Handle) -> Slot {
        if self.node(before).right.is_none() {
            Slot {
                parent: Some(before),
                side: Side::Right,
            }
        } else {
            debug_assert!(self.node(after).left.is_none(), "`RawRbTree::slot_between()` - nodes are not adjacent!");
            Slot {
                parent: Some(after),
                side: Side::Left,
            }
        }
    }

    /// Allocates a red leaf for `value`, attaches it at `slot` and rebalances.
    ///
    /// If the node cannot be allocated the tree is left exactly as it was.
    pub(crate) fn try_link(&mut self, slot: Slot, value: T) -> Result<Handle> {
        let handle = self.nodes_mut().try_alloc(Node::new_leaf(value, slot.parent))?;

        match slot.parent {
            None => {
                debug_assert!(self.root.is_none(), "`RawRbTree::try_link()` - root slot is taken!");
                self.root = Some(handle);
                self.leftmost = Some(handle);
                self.rightmost = Some(handle);
            }
            Some(parent) => {
                debug_assert!(
                    self.node(parent).child(slot.side).is_none(),
                    "`RawRbTree::try_link()` - slot is taken!"
                );
                self.node_mut(parent).set_child(slot.side, Some(handle));
                match slot.side {
                    Side::Left if self.leftmost == Some(parent) => self.leftmost = Some(handle),
                    Side::Right if self.rightmost == Some(parent) => self.rightmost = Some(handle),
                    _ => {}
                }
            }
        }

        self.len += 1;
        self.insert_fixup(handle);
        Ok(handle)
    }

    /// Restores the red-black invariants after `x` was attached as a red leaf.
    fn insert_fixup(&mut self, mut x: Handle) {
        while let Some(mut parent) = self.node(x).parent
            && self.node(parent).is_red()
        {
            let grandparent = self.node(parent).parent.expect("`RawRbTree::insert_fixup()` - red root!");
            let side = if self.node(grandparent).left == Some(parent) {
                Side::Left
            } else {
                Side::Right
            };
            let uncle = self.node(grandparent).child(side.opposite());

            if let Some(uncle) = uncle
                && self.node(uncle).is_red()
            {
                // Push the red up and retry two levels higher.
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                x = grandparent;
                continue;
            }

            if self.node(parent).child(side.opposite()) == Some(x) {
                // Inner grandchild: turn the zig-zag into a straight line first.
                self.rotate(parent, side);
                x = parent;
                parent = self.node(x).parent.expect("`RawRbTree::insert_fixup()` - rotation lost the parent!");
            }

            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    /// Values tagged with an insertion sequence number; ordered by `key` only.
    fn tagged_order(tree: &RawRbTree<(i32, usize)>) -> Vec<(i32, usize)> {
        let mut out = Vec::new();
        let mut current = tree.leftmost();
        while let Some(h) = current {
            out.push(*tree.value(h));
            current = tree.successor(h);
        }
        out
    }

    fn insert_tagged(tree: &mut RawRbTree<(i32, usize)>, key: i32, seq: usize) -> Handle {
        let slot = tree.equal_slot(|v| v.0.cmp(&key));
        tree.try_link(slot, (key, seq)).unwrap()
    }

    #[test]
    fn equal_inserts_are_stable() {
        let mut tree = RawRbTree::new();
        for (seq, key) in [5, 3, 5, 1].into_iter().enumerate() {
            insert_tagged(&mut tree, key, seq);
        }
        tree.validate(|a, b| a.0 <= b.0).unwrap();
        assert_eq!(tagged_order(&tree), vec![(1, 3), (3, 1), (5, 0), (5, 2)]);
    }

    #[test]
    fn unique_insert_reports_existing_node() {
        let mut tree = RawRbTree::new();
        for v in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert_unique(v).unwrap();
        }
        let existing = tree.find(&3).unwrap();
        assert_eq!(tree.unique_slot(|v| v.cmp(&3)), Err(existing));
        assert_eq!(tree.len(), 7);

        // Neighbour checks on both sides of the descent's final slot.
        for v in 1..=7 {
            assert!(tree.unique_slot(|x| x.cmp(&v)).is_err(), "duplicate {v} admitted");
        }
        assert!(tree.unique_slot(|x| x.cmp(&0)).is_ok());
        assert!(tree.unique_slot(|x| x.cmp(&8)).is_ok());
    }

    #[test]
    fn extremes_follow_inserts() {
        let mut tree = RawRbTree::new();
        let five = tree.insert_unique(5).unwrap();
        assert_eq!((tree.leftmost(), tree.rightmost()), (Some(five), Some(five)));
        let one = tree.insert_unique(1).unwrap();
        let nine = tree.insert_unique(9).unwrap();
        tree.insert_unique(4).unwrap();
        assert_eq!(tree.leftmost(), Some(one));
        assert_eq!(tree.rightmost(), Some(nine));
    }

    #[test]
    fn hint_slots_skip_the_descent_when_they_fit() {
        let mut tree = RawRbTree::new();
        for v in [10, 20, 30, 40] {
            tree.insert_unique(v).unwrap();
        }
        let thirty = tree.find(&30).unwrap();
        let twenty = tree.find(&20).unwrap();
        let slot = tree.unique_hint_slot(Some(thirty), |v| v.cmp(&25)).unwrap();
        assert!(slot.parent == Some(twenty) || slot.parent == Some(thirty));
        tree.try_link(slot, 25).unwrap();

        let max = tree.rightmost().unwrap();
        let slot = tree.unique_hint_slot(None, |v| v.cmp(&50)).unwrap();
        assert_eq!(
            slot,
            Slot {
                parent: Some(max),
                side: Side::Right
            }
        );
        tree.try_link(slot, 50).unwrap();

        let min = tree.leftmost().unwrap();
        let slot = tree.unique_hint_slot(Some(min), |v| v.cmp(&5)).unwrap();
        assert_eq!(
            slot,
            Slot {
                parent: Some(min),
                side: Side::Left
            }
        );
        tree.try_link(slot, 5).unwrap();

        tree.validate_invariants();
        assert_eq!(tree.to_vec(), vec![5, 10, 20, 25, 30, 40, 50]);

        // A wrong hint falls back to the full search, which still finds duplicates.
        let ten = tree.find(&10).unwrap();
        assert_eq!(tree.unique_hint_slot(Some(ten), |v| v.cmp(&40)), Err(tree.find(&40).unwrap()));
    }

    #[test]
    fn equal_hint_places_before_the_hint() {
        let mut tree = RawRbTree::new();
        let a = insert_tagged(&mut tree, 7, 0);
        insert_tagged(&mut tree, 7, 1);
        let slot = tree.equal_hint_slot(Some(a), |v| v.0.cmp(&7));
        tree.try_link(slot, (7, 2)).unwrap();
        tree.validate(|x, y| x.0 <= y.0).unwrap();
        assert_eq!(tagged_order(&tree), vec![(7, 2), (7, 0), (7, 1)]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn equal_policy_matches_stable_sort(keys in prop::collection::vec(0i32..50, 0..300)) {
            let mut tree = RawRbTree::new();
            let mut model = Vec::new();
            for (seq, key) in keys.into_iter().enumerate() {
                insert_tagged(&mut tree, key, seq);
                model.push((key, seq));
            }
            tree.validate(|a, b| a.0 <= b.0).unwrap();
            model.sort_by_key(|&(key, _)| key);
            prop_assert_eq!(tagged_order(&tree), model);
        }

        #[test]
        fn hinted_inserts_keep_invariants(keys in prop::collection::vec(0i32..100, 0..200), hints in prop::collection::vec(any::<usize>(), 200)) {
            let mut tree: RawRbTree<i32> = RawRbTree::new();
            let mut live: Vec<Handle> = Vec::new();
            for (key, hint) in keys.into_iter().zip(hints) {
                let hint = if live.is_empty() || hint % 5 == 0 { None } else { Some(live[hint % live.len()]) };
                let slot = tree.equal_hint_slot(hint, |v| v.cmp(&key));
                live.push(tree.try_link(slot, key).unwrap());
                tree.validate_invariants();
            }
        }
    }
}
