//! INSERT operations for the index tree and the slot store.
//!
//! Tree insertion handles the one height-increasing event: when the root
//! itself overflows it is wrapped in a new root and split. Store insertion
//! picks a slot, reusing freed positions oldest first.

use crate::types::{BTree, Node, Position, SlotStore};
use log::{debug, trace};

impl<K: Ord> BTree<K> {
    /// Insert a key with its position.
    ///
    /// Keys are unique: inserting a key that is already present changes
    /// nothing and returns false.
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::BTree;
    ///
    /// let mut tree = BTree::new(3);
    /// assert!(tree.insert("a", 45));
    /// assert!(!tree.insert("a", 99));
    /// assert_eq!(tree.search(&"a"), Some(45));
    /// ```
    pub fn insert(&mut self, key: K, value: Position) -> bool {
        let max_branching = self.max_branching;
        let root = self.root.get_or_insert_with(|| Node::new(max_branching));

        if !root.insert(key, value) {
            return false;
        }
        self.len += 1;

        if root.overflow() {
            self.grow_root();
        }
        true
    }

    /// Put a new root above the overflowing one and split the old root into
    /// it.
    fn grow_root(&mut self) {
        let Some(old_root) = self.root.take() else {
            return;
        };
        let mut new_root = Node::from_parts(self.max_branching, Vec::new(), Vec::new(), vec![old_root]);
        new_root.fix_overflow_at(0);
        self.root = Some(new_root);
        debug!("index root split, height is now {}", self.height());
    }
}

impl<R, K, F> SlotStore<R, K, F>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    /// Store a record under its primary key.
    ///
    /// If a record with the same key is already stored, nothing changes and
    /// `None` is returned. Otherwise the record goes into the oldest free slot,
    /// or a new slot at the end when none is free, and that position is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::SlotStore;
    ///
    /// let mut store = SlotStore::new(|n: &u32| *n);
    /// assert_eq!(store.insert(10), Some(0));
    /// assert_eq!(store.insert(20), Some(1));
    /// assert_eq!(store.insert(10), None);
    ///
    /// store.remove(&10);
    /// assert_eq!(store.insert(30), Some(0));
    /// ```
    pub fn insert(&mut self, record: R) -> Option<Position> {
        let key = (self.key_of)(&record);
        if self.index.contains_key(&key) {
            trace!("duplicate key ignored");
            return None;
        }

        let position = match self.free_slots.pop_front() {
            Some(position) => {
                trace!("reusing free slot {}", position);
                self.records[position] = Some(record);
                position
            }
            None => {
                let position = self.records.len();
                trace!("appending slot {}", position);
                self.records.push(Some(record));
                position
            }
        };

        self.index.insert(key, position);
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_creates_leaf_root() {
        let mut tree = BTree::new(3);
        tree.insert(5, 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn root_overflow_grows_height() {
        let mut tree = BTree::new(3);
        tree.insert(1, 1);
        tree.insert(2, 2);
        assert_eq!(tree.height(), 1);
        tree.insert(3, 3);
        assert_eq!(tree.height(), 2);

        let root = tree.root.as_ref().unwrap();
        assert_eq!(root.keys(), &[2]);
        assert_eq!(root.children()[0].keys(), &[1]);
        assert_eq!(root.children()[1].keys(), &[3]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn duplicate_insert_does_not_count() {
        let mut tree = BTree::new(4);
        assert!(tree.insert("k", 1));
        assert!(!tree.insert("k", 2));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.search(&"k"), Some(1));
    }

    #[test]
    fn branching_two_still_indexes_everything() {
        let mut tree = BTree::new(2);
        for key in 0..50 {
            tree.insert(key, key as usize);
        }
        for key in 0..50 {
            assert_eq!(tree.search(&key), Some(key as usize));
        }
        tree.check_invariants().unwrap();
    }

    #[test]
    fn duplicate_record_leaves_original() {
        let mut store = SlotStore::new(|r: &(u8, &str)| r.0);
        assert_eq!(store.insert((1, "first")), Some(0));
        assert_eq!(store.insert((1, "second")), None);
        assert_eq!(store.find(&1), Some(&(1, "first")));
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn free_slots_reused_in_fifo_order() {
        let mut store = SlotStore::with_branching(3, |n: &u32| *n);
        for n in 0..5 {
            store.insert(n);
        }
        store.remove(&3);
        store.remove(&1);

        assert_eq!(store.insert(10), Some(3));
        assert_eq!(store.insert(11), Some(1));
        assert_eq!(store.insert(12), Some(5));
        store.check_invariants().unwrap();
    }
}
