//! DELETE operations for the index tree and the slot store.
//!
//! Tree removal shrinks the tree when a merge cascade empties the root.
//! Store removal clears the slot in place and queues its position for reuse.

use crate::types::{BTree, Position, SlotStore};
use log::{debug, trace};

impl<K: Ord> BTree<K> {
    /// Remove a key and return the position it mapped to.
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::BTree;
    ///
    /// let mut tree = BTree::new(3);
    /// tree.insert(7, 70);
    /// assert_eq!(tree.remove(&7), Some(70));
    /// assert_eq!(tree.remove(&7), None);
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<Position> {
        let removed = self.root.as_mut()?.remove(key)?;
        self.len -= 1;
        self.collapse_root();
        Some(removed)
    }

    /// Drop keyless roots: an internal root with no keys is replaced by its
    /// only child, and an empty leaf root leaves the tree without a root.
    fn collapse_root(&mut self) {
        let mut collapsed = false;
        while let Some(root) = self.root.as_mut() {
            if !root.is_empty() {
                break;
            }
            if root.is_leaf() {
                self.root = None;
                break;
            }
            self.root = root.children.pop();
            collapsed = true;
        }
        if collapsed {
            debug!("index root collapsed, height is now {}", self.height());
        }
    }
}

impl<R, K, F> SlotStore<R, K, F>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    /// Remove the record stored under a primary key and return it.
    ///
    /// The slot becomes a hole; no other record moves. Its position is queued
    /// at the back of the free list.
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::SlotStore;
    ///
    /// let mut store = SlotStore::new(|s: &&str| s.len());
    /// store.insert("trave");
    /// store.insert("ufabc!");
    /// assert_eq!(store.remove(&5), Some("trave"));
    /// assert_eq!(store.remove(&5), None);
    /// assert_eq!(store.records(), &[None, Some("ufabc!")]);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<R> {
        let position = self.index.search(key)?;
        let record = self.records.get_mut(position)?.take();
        self.index.remove(key);
        self.free_slots.push_back(position);
        trace!("freed slot {}", position);
        record
    }
}
