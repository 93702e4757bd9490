//! Validation and debugging utilities for the tree and the store.
//!
//! Invariant breaches are internal defects; these checks exist for the test
//! suite and for rejecting corrupted snapshots on load. They are never part
//! of the normal operation path.

use crate::error::{StoreError, StoreResult};
use crate::types::{BTree, Node, SlotStore, MIN_BRANCHING};
use std::collections::HashSet;

// ============================================================================
// TREE VALIDATION
// ============================================================================

impl<K: Ord> BTree<K> {
    /// Check ordering, fill bounds, balance and the cached length.
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::BTree;
    ///
    /// let mut tree = BTree::new(4);
    /// for key in 0..100 {
    ///     tree.insert(key, key as usize);
    /// }
    /// assert!(tree.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> StoreResult<()> {
        if self.max_branching < MIN_BRANCHING {
            return Err(StoreError::corrupted_tree(
                "Tree",
                &format!(
                    "branching {} is below the minimum of {}",
                    self.max_branching, MIN_BRANCHING
                ),
            ));
        }

        let Some(root) = &self.root else {
            if self.len != 0 {
                return Err(StoreError::corrupted_tree(
                    "Tree",
                    &format!("no root but length is {}", self.len),
                ));
            }
            return Ok(());
        };

        let mut leaf_depth = None;
        let count = self.check_node(root, None, None, 0, &mut leaf_depth)?;

        if count != self.len {
            return Err(StoreError::corrupted_tree(
                "Tree",
                &format!("{} keys in nodes but length is {}", count, self.len),
            ));
        }
        Ok(())
    }

    /// Recursively check one node and its subtree; returns its key count.
    fn check_node(
        &self,
        node: &Node<K>,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> StoreResult<usize> {
        let is_root = depth == 0;

        if node.max_branching != self.max_branching {
            return Err(StoreError::corrupted_tree(
                "Node",
                &format!(
                    "branching {} at depth {} differs from tree branching {}",
                    node.max_branching, depth, self.max_branching
                ),
            ));
        }
        if node.keys.len() != node.values.len() {
            return Err(StoreError::corrupted_tree(
                "Node",
                &format!("{} keys but {} values", node.keys.len(), node.values.len()),
            ));
        }
        if !node.is_leaf() && node.children.len() != node.keys.len() + 1 {
            return Err(StoreError::corrupted_tree(
                "Node",
                &format!(
                    "{} keys but {} children",
                    node.keys.len(),
                    node.children.len()
                ),
            ));
        }
        if node.keys.len() > self.max_branching - 1 {
            return Err(StoreError::corrupted_tree(
                "Node",
                &format!("overflow with {} keys at depth {}", node.keys.len(), depth),
            ));
        }
        if !is_root && node.keys.len() < self.min_keys() {
            return Err(StoreError::corrupted_tree(
                "Node",
                &format!("underflow with {} keys at depth {}", node.keys.len(), depth),
            ));
        }
        if node.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(StoreError::corrupted_tree(
                "Node",
                &format!("keys out of order at depth {}", depth),
            ));
        }
        if let (Some(lower), Some(first)) = (lower, node.keys.first()) {
            if first <= lower {
                return Err(StoreError::corrupted_tree(
                    "Node",
                    &format!("key below separator at depth {}", depth),
                ));
            }
        }
        if let (Some(upper), Some(last)) = (upper, node.keys.last()) {
            if last >= upper {
                return Err(StoreError::corrupted_tree(
                    "Node",
                    &format!("key above separator at depth {}", depth),
                ));
            }
        }

        if node.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(StoreError::corrupted_tree(
                        "Balance",
                        &format!("leaf at depth {} but another at depth {}", depth, expected),
                    ));
                }
                Some(_) => {}
            }
            return Ok(node.keys.len());
        }

        let mut count = node.keys.len();
        for (i, child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { node.keys.get(i - 1) };
            let child_upper = if i == node.keys.len() {
                upper
            } else {
                node.keys.get(i)
            };
            count += self.check_node(child, child_lower, child_upper, depth + 1, leaf_depth)?;
        }
        Ok(count)
    }

    /// Sizes of all leaves, left to right (for testing/debugging).
    pub fn leaf_sizes(&self) -> Vec<usize> {
        fn collect<K>(node: &Node<K>, sizes: &mut Vec<usize>) {
            if node.is_leaf() {
                sizes.push(node.keys.len());
            }
            for child in &node.children {
                collect(child, sizes);
            }
        }
        let mut sizes = Vec::new();
        if let Some(root) = &self.root {
            collect(root, &mut sizes);
        }
        sizes
    }
}

// ============================================================================
// STORE VALIDATION
// ============================================================================

impl<R, K, F> SlotStore<R, K, F>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    /// Check that the index, the slots and the free list agree.
    ///
    /// Every occupied slot's key must lead back to that slot, the index must
    /// hold exactly one key per occupied slot, and the free list must name
    /// each hole exactly once.
    pub fn check_invariants(&self) -> StoreResult<()> {
        self.index.check_invariants()?;

        let mut occupied = 0;
        for (position, slot) in self.records.iter().enumerate() {
            let Some(record) = slot else {
                continue;
            };
            occupied += 1;
            let key = (self.key_of)(record);
            match self.index.search(&key) {
                Some(found) if found == position => {}
                Some(found) => {
                    return Err(StoreError::inconsistent_index(
                        position,
                        &format!("record key is indexed at slot {}", found),
                    ));
                }
                None => {
                    return Err(StoreError::inconsistent_index(
                        position,
                        "record key is missing from the index",
                    ));
                }
            }
        }

        if occupied != self.index.len() {
            return Err(StoreError::InconsistentIndex(format!(
                "{} occupied slots but {} indexed keys",
                occupied,
                self.index.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.free_slots.len());
        for &position in &self.free_slots {
            if !seen.insert(position) {
                return Err(StoreError::inconsistent_index(position, "listed twice as free"));
            }
            match self.records.get(position) {
                None => {
                    return Err(StoreError::inconsistent_index(position, "free slot out of range"));
                }
                Some(Some(_)) => {
                    return Err(StoreError::inconsistent_index(position, "free slot is occupied"));
                }
                Some(None) => {}
            }
            if self.index.contains_position(position) {
                return Err(StoreError::inconsistent_index(
                    position,
                    "free slot is still referenced by the index",
                ));
            }
        }

        if occupied + self.free_slots.len() != self.records.len() {
            return Err(StoreError::InconsistentIndex(format!(
                "{} slots but {} occupied and {} free",
                self.records.len(),
                occupied,
                self.free_slots.len()
            )));
        }
        Ok(())
    }
}
