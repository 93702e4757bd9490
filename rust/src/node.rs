//! Node implementation for the index tree.
//!
//! This module contains the recursive search, insert and remove algorithms
//! together with the rebalancing primitives they rely on: split on overflow,
//! and rotation or merge on underflow. A node never repairs itself; the parent
//! calls `fix_overflow_at` / `fix_underflow_at` on the child it just descended
//! into.

use crate::types::{Node, Position};
use std::mem;

impl<K: Ord> Node<K> {
    // ============================================================================
    // GET OPERATIONS
    // ============================================================================

    /// Find the position stored for `key` in this subtree.
    pub fn search(&self, key: &K) -> Option<Position> {
        match self.keys.binary_search(key) {
            Ok(index) => Some(self.values[index]),
            Err(_) if self.is_leaf() => None,
            Err(index) => self.children[index].search(key),
        }
    }

    /// Returns true if some key in this subtree maps to `position`.
    pub fn contains_position(&self, position: Position) -> bool {
        self.values.contains(&position)
            || self
                .children
                .iter()
                .any(|child| child.contains_position(position))
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Insert `key` into this subtree. Returns false, changing nothing, when
    /// the key is already present.
    ///
    /// This node may be left overflowing; its parent (or the tree, for the
    /// root) is responsible for splitting it.
    pub(crate) fn insert(&mut self, key: K, value: Position) -> bool {
        match self.keys.binary_search(&key) {
            Ok(_) => false,
            Err(index) if self.is_leaf() => {
                self.keys.insert(index, key);
                self.values.insert(index, value);
                true
            }
            Err(index) => {
                let inserted = self.children[index].insert(key, value);
                if inserted {
                    self.fix_overflow_at(index);
                }
                inserted
            }
        }
    }

    /// Split this node around its median. `self` keeps the lower half; the
    /// median pair and the upper half are returned for the parent to absorb.
    ///
    /// # Panics
    ///
    /// Panics if the node does not overflow.
    pub(crate) fn split(&mut self) -> (K, Position, Node<K>) {
        let median = self.max_branching / 2;

        let right_keys = self.keys.split_off(median + 1);
        let right_values = self.values.split_off(median + 1);
        let right_children = if self.is_leaf() {
            Vec::new()
        } else {
            self.children.split_off(median + 1)
        };

        // `split` is only reached on an overflowing node, which holds at least
        // `max_branching` > `median` keys.
        let median_key = self.keys.swap_remove(median);
        let median_value = self.values.swap_remove(median);

        let right = Node::from_parts(self.max_branching, right_keys, right_values, right_children);
        (median_key, median_value, right)
    }

    /// Split `children[child_index]` if it overflows, lifting its median into
    /// this node.
    pub(crate) fn fix_overflow_at(&mut self, child_index: usize) {
        if !self.children[child_index].overflow() {
            return;
        }

        let (median_key, median_value, right) = self.children[child_index].split();
        self.keys.insert(child_index, median_key);
        self.values.insert(child_index, median_value);
        self.children.insert(child_index + 1, right);
    }

    // ============================================================================
    // DELETE OPERATIONS
    // ============================================================================

    /// Remove `key` from this subtree and return its position.
    ///
    /// An internal key is replaced by its in-order predecessor, taken from the
    /// rightmost leaf of the subtree just below it. This node may be left
    /// underflowing for the parent to repair.
    pub(crate) fn remove(&mut self, key: &K) -> Option<Position> {
        match self.keys.binary_search(key) {
            Ok(index) if self.is_leaf() => {
                self.keys.remove(index);
                Some(self.values.remove(index))
            }
            Ok(index) => match self.children[index].pop_biggest() {
                Some((predecessor_key, predecessor_value)) => {
                    self.keys[index] = predecessor_key;
                    let removed = mem::replace(&mut self.values[index], predecessor_value);
                    self.fix_underflow_at(index);
                    Some(removed)
                }
                None => {
                    // Only with a branching factor of 2: the left subtree holds
                    // no keys at all, so the key and that subtree go together.
                    self.keys.remove(index);
                    self.children.remove(index);
                    Some(self.values.remove(index))
                }
            },
            Err(_) if self.is_leaf() => None,
            Err(index) => {
                let removed = self.children[index].remove(key);
                if removed.is_some() {
                    self.fix_underflow_at(index);
                }
                removed
            }
        }
    }

    /// Remove and return the largest entry of this subtree, repairing
    /// underflow along the rightmost path.
    fn pop_biggest(&mut self) -> Option<(K, Position)> {
        if self.is_leaf() {
            let key = self.keys.pop()?;
            let value = self.values.pop()?;
            return Some((key, value));
        }

        let last = self.children.len() - 1;
        if let Some(entry) = self.children[last].pop_biggest() {
            self.fix_underflow_at(last);
            return Some(entry);
        }

        // Rightmost subtree is empty (branching factor 2): this node's last
        // key is the biggest, and the empty subtree after it is dropped.
        let key = self.keys.pop()?;
        let value = self.values.pop()?;
        self.children.pop();
        Some((key, value))
    }

    /// Restore minimum fill of `children[child_index]` if it underflows.
    ///
    /// Tried in order: rotate from the left sibling, rotate from the right
    /// sibling, merge into the left sibling, merge with the right sibling.
    pub(crate) fn fix_underflow_at(&mut self, child_index: usize) {
        if !self.children[child_index].underflow() {
            return;
        }

        let has_left = child_index > 0;
        let has_right = child_index + 1 < self.children.len();

        if has_left && self.children[child_index - 1].can_donate() {
            self.rotate_from_left(child_index);
        } else if has_right && self.children[child_index + 1].can_donate() {
            self.rotate_from_right(child_index);
        } else if has_left {
            self.merge_with_left(child_index);
        } else if has_right {
            self.merge_with_right(child_index);
        }
    }

    /// Move the left sibling's last key up into the separator slot and the old
    /// separator down to the front of `children[child_index]`.
    fn rotate_from_left(&mut self, child_index: usize) {
        let (before, after) = self.children.split_at_mut(child_index);
        let sibling = &mut before[child_index - 1];
        let child = &mut after[0];

        let (Some(sibling_key), Some(sibling_value)) = (sibling.keys.pop(), sibling.values.pop())
        else {
            return;
        };
        let moved_child = if sibling.is_leaf() {
            None
        } else {
            sibling.children.pop()
        };

        let separator_key = mem::replace(&mut self.keys[child_index - 1], sibling_key);
        let separator_value = mem::replace(&mut self.values[child_index - 1], sibling_value);

        child.keys.insert(0, separator_key);
        child.values.insert(0, separator_value);
        if let Some(moved) = moved_child {
            child.children.insert(0, moved);
        }
    }

    /// Mirror image of `rotate_from_left`, taking the right sibling's first key.
    fn rotate_from_right(&mut self, child_index: usize) {
        let (before, after) = self.children.split_at_mut(child_index + 1);
        let child = &mut before[child_index];
        let sibling = &mut after[0];

        if sibling.keys.is_empty() {
            return;
        }
        let sibling_key = sibling.keys.remove(0);
        let sibling_value = sibling.values.remove(0);
        let moved_child = if sibling.is_leaf() {
            None
        } else {
            Some(sibling.children.remove(0))
        };

        let separator_key = mem::replace(&mut self.keys[child_index], sibling_key);
        let separator_value = mem::replace(&mut self.values[child_index], sibling_value);

        child.keys.push(separator_key);
        child.values.push(separator_value);
        if let Some(moved) = moved_child {
            child.children.push(moved);
        }
    }

    /// Fold the separator and `children[child_index]` into the left sibling.
    fn merge_with_left(&mut self, child_index: usize) {
        let child = self.children.remove(child_index);
        let separator_key = self.keys.remove(child_index - 1);
        let separator_value = self.values.remove(child_index - 1);

        self.children[child_index - 1].absorb(separator_key, separator_value, child);
    }

    /// Fold the separator and the right sibling into `children[child_index]`.
    fn merge_with_right(&mut self, child_index: usize) {
        let sibling = self.children.remove(child_index + 1);
        let separator_key = self.keys.remove(child_index);
        let separator_value = self.values.remove(child_index);

        self.children[child_index].absorb(separator_key, separator_value, sibling);
    }

    /// Append the separator and everything in `right` to this node.
    fn absorb(&mut self, separator_key: K, separator_value: Position, right: Node<K>) {
        self.keys.push(separator_key);
        self.values.push(separator_value);
        self.keys.extend(right.keys);
        self.values.extend(right.values);
        self.children.extend(right.children);
    }
}

impl<K> Node<K> {
    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Returns true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of keys held by this node alone.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this node holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Minimum number of keys a non-root node must keep.
    pub fn min_keys(&self) -> usize {
        self.max_branching.saturating_sub(1) / 2
    }

    /// Returns true if this node must be split.
    pub fn overflow(&self) -> bool {
        self.keys.len() >= self.max_branching
    }

    /// Returns true if this node has fallen below minimum fill.
    pub fn underflow(&self) -> bool {
        self.keys.len() < self.min_keys()
    }

    /// Returns true if this node sits exactly at minimum fill.
    pub fn has_minimum_fill(&self) -> bool {
        self.keys.len() == self.min_keys()
    }

    /// Returns true if this node can give a key to a sibling and stay legal.
    pub fn can_donate(&self) -> bool {
        self.keys.len() > self.min_keys()
    }

    /// Keys of this node, in order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Positions paired with `keys()`.
    pub fn values(&self) -> &[Position] {
        &self.values
    }

    /// Subtrees of this node; empty for leaves.
    pub fn children(&self) -> &[Node<K>] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(max_branching: usize, keys: &[u32]) -> Node<u32> {
        Node::from_parts(
            max_branching,
            keys.to_vec(),
            keys.iter().map(|k| *k as usize * 10).collect(),
            Vec::new(),
        )
    }

    fn branch(max_branching: usize, keys: &[u32], children: Vec<Node<u32>>) -> Node<u32> {
        Node::from_parts(
            max_branching,
            keys.to_vec(),
            keys.iter().map(|k| *k as usize * 10).collect(),
            children,
        )
    }

    #[test]
    fn fill_predicates_follow_branching_factor() {
        let node = leaf(5, &[1, 2]);
        assert_eq!(node.min_keys(), 2);
        assert!(node.has_minimum_fill());
        assert!(!node.underflow());
        assert!(!node.can_donate());
        assert!(!node.overflow());

        assert!(leaf(5, &[1]).underflow());
        assert!(leaf(5, &[1, 2, 3, 4, 5]).overflow());
        assert!(leaf(5, &[1, 2, 3]).can_donate());
    }

    #[test]
    fn search_descends_into_gap() {
        let node = branch(3, &[20], vec![leaf(3, &[10]), leaf(3, &[30, 40])]);
        assert_eq!(node.search(&20), Some(200));
        assert_eq!(node.search(&10), Some(100));
        assert_eq!(node.search(&40), Some(400));
        assert_eq!(node.search(&25), None);
    }

    #[test]
    fn split_leaf_odd_branching() {
        let mut node = leaf(3, &[1, 2, 3]);
        let (key, value, right) = node.split();
        assert_eq!((key, value), (2, 20));
        assert_eq!(node.keys(), &[1]);
        assert_eq!(right.keys(), &[3]);
        assert_eq!(right.values(), &[30]);
    }

    #[test]
    fn split_branch_divides_children() {
        let children = (0..5).map(|i| leaf(4, &[i * 10 + 5])).collect();
        let mut node = branch(4, &[10, 20, 30, 40], children);
        let (key, _, right) = node.split();
        assert_eq!(key, 30);
        assert_eq!(node.keys(), &[10, 20]);
        assert_eq!(node.children().len(), 3);
        assert_eq!(right.keys(), &[40]);
        assert_eq!(right.children().len(), 2);
        assert_eq!(right.children()[0].keys(), &[35]);
    }

    #[test]
    fn overflowing_child_is_split_into_parent() {
        let mut parent = branch(3, &[50], vec![leaf(3, &[10, 20]), leaf(3, &[60])]);
        assert!(parent.insert(30, 300));
        assert_eq!(parent.keys(), &[20, 50]);
        assert_eq!(parent.children().len(), 3);
        assert_eq!(parent.children()[0].keys(), &[10]);
        assert_eq!(parent.children()[1].keys(), &[30]);
    }

    #[test]
    fn duplicate_insert_keeps_first_value() {
        let mut node = leaf(4, &[1, 2]);
        assert!(!node.insert(2, 999));
        assert_eq!(node.search(&2), Some(20));
    }

    #[test]
    fn underflow_rotates_from_left_sibling() {
        let mut parent = branch(3, &[30], vec![leaf(3, &[10, 20]), leaf(3, &[40])]);
        assert_eq!(parent.remove(&40), Some(400));
        assert_eq!(parent.keys(), &[20]);
        assert_eq!(parent.children()[0].keys(), &[10]);
        assert_eq!(parent.children()[1].keys(), &[30]);
        assert_eq!(parent.children()[1].values(), &[300]);
    }

    #[test]
    fn underflow_rotates_from_right_sibling() {
        let mut parent = branch(3, &[20], vec![leaf(3, &[10]), leaf(3, &[30, 40])]);
        assert_eq!(parent.remove(&10), Some(100));
        assert_eq!(parent.keys(), &[30]);
        assert_eq!(parent.children()[0].keys(), &[20]);
        assert_eq!(parent.children()[1].keys(), &[40]);
    }

    #[test]
    fn underflow_merges_with_left_sibling() {
        let mut parent = branch(
            3,
            &[20, 40],
            vec![leaf(3, &[10]), leaf(3, &[30]), leaf(3, &[50])],
        );
        assert_eq!(parent.remove(&30), Some(300));
        assert_eq!(parent.keys(), &[40]);
        assert_eq!(parent.children()[0].keys(), &[10, 20]);
        assert_eq!(parent.children()[1].keys(), &[50]);
    }

    #[test]
    fn underflow_merges_with_right_sibling_when_leftmost() {
        let mut parent = branch(3, &[20, 40], vec![leaf(3, &[10]), leaf(3, &[30]), leaf(3, &[50])]);
        assert_eq!(parent.remove(&10), Some(100));
        assert_eq!(parent.keys(), &[40]);
        assert_eq!(parent.children()[0].keys(), &[20, 30]);
    }

    #[test]
    fn internal_key_is_replaced_by_predecessor() {
        let mut parent = branch(4, &[30], vec![leaf(4, &[10, 20]), leaf(4, &[40, 50])]);
        assert_eq!(parent.remove(&30), Some(300));
        assert_eq!(parent.keys(), &[20]);
        assert_eq!(parent.values(), &[200]);
        assert_eq!(parent.children()[0].keys(), &[10]);
    }

    #[test]
    fn rotation_carries_grandchild() {
        let left = branch(
            3,
            &[20, 40],
            vec![leaf(3, &[10]), leaf(3, &[30]), leaf(3, &[50])],
        );
        let right = branch(3, &[80], vec![leaf(3, &[70]), leaf(3, &[90])]);
        let mut root = branch(3, &[60], vec![left, right]);

        assert_eq!(root.remove(&90), Some(900));

        assert_eq!(root.keys(), &[40]);
        let right = &root.children()[1];
        assert_eq!(right.keys(), &[60]);
        assert_eq!(right.children()[0].keys(), &[50]);
        assert_eq!(right.children()[1].keys(), &[70, 80]);
    }

    #[test]
    fn contains_position_scans_whole_subtree() {
        let node = branch(3, &[20], vec![leaf(3, &[10]), leaf(3, &[30])]);
        assert!(node.contains_position(300));
        assert!(!node.contains_position(30));
    }
}
