//! Iterator implementations for the index tree and the slot store.
//!
//! The tree is walked in key order with an explicit stack; the store can be
//! walked in slot order (skipping holes) or in key order through the index.

use crate::types::{BTree, Node, Position, SlotStore};
use std::iter::FusedIterator;

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// In-order iterator over `(key, position)` pairs of a tree.
pub struct Entries<'a, K> {
    /// Nodes on the path to the next entry, each with the index of the next
    /// key to yield from it.
    stack: Vec<(&'a Node<K>, usize)>,
    remaining: usize,
}

/// Iterator over the keys of a tree, in order.
pub struct Keys<'a, K> {
    entries: Entries<'a, K>,
}

/// Iterator over occupied slots as `(position, record)`, in slot order.
pub struct Records<'a, R> {
    slots: std::iter::Enumerate<std::slice::Iter<'a, Option<R>>>,
}

/// Iterator over records in primary-key order.
pub struct RecordsByKey<'a, R, K> {
    entries: Entries<'a, K>,
    records: &'a [Option<R>],
}

// ============================================================================
// TREE ITERATOR METHODS
// ============================================================================

impl<K> BTree<K> {
    /// Returns an iterator over all `(key, position)` pairs in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::BTree;
    ///
    /// let mut tree = BTree::new(3);
    /// for (position, key) in ["d", "a", "c", "b"].into_iter().enumerate() {
    ///     tree.insert(key, position);
    /// }
    /// let pairs: Vec<_> = tree.iter().collect();
    /// assert_eq!(pairs, [(&"a", 1), (&"b", 3), (&"c", 2), (&"d", 0)]);
    /// ```
    pub fn iter(&self) -> Entries<'_, K> {
        Entries::new(self.root.as_ref(), self.len)
    }

    /// Returns an iterator over all keys in order.
    pub fn keys(&self) -> Keys<'_, K> {
        Keys {
            entries: self.iter(),
        }
    }
}

impl<'a, K> IntoIterator for &'a BTree<K> {
    type Item = (&'a K, Position);
    type IntoIter = Entries<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// STORE ITERATOR METHODS
// ============================================================================

impl<R, K, F> SlotStore<R, K, F> {
    /// Returns an iterator over stored records with their positions, in slot
    /// order. Holes are skipped.
    pub fn iter(&self) -> Records<'_, R> {
        Records {
            slots: self.records.iter().enumerate(),
        }
    }

    /// Returns an iterator over stored records in primary-key order.
    pub fn iter_by_key(&self) -> RecordsByKey<'_, R, K> {
        RecordsByKey {
            entries: self.index.iter(),
            records: &self.records,
        }
    }
}

// ============================================================================
// ITERATOR IMPLEMENTATIONS
// ============================================================================

impl<'a, K> Entries<'a, K> {
    fn new(root: Option<&'a Node<K>>, remaining: usize) -> Self {
        let mut entries = Self {
            stack: Vec::new(),
            remaining,
        };
        if let Some(root) = root {
            entries.push_leftmost(root);
        }
        entries
    }

    /// Push `node` and every first child below it.
    fn push_leftmost(&mut self, mut node: &'a Node<K>) {
        loop {
            self.stack.push((node, 0));
            match node.children.first() {
                Some(child) => node = child,
                None => break,
            }
        }
    }
}

impl<'a, K> Iterator for Entries<'a, K> {
    type Item = (&'a K, Position);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, next_index) = self.stack.last_mut()?;
            let node: &'a Node<K> = *node;
            let index = *next_index;

            if index >= node.keys.len() {
                self.stack.pop();
                continue;
            }

            *next_index += 1;
            if let Some(child) = node.children.get(index + 1) {
                self.push_leftmost(child);
            }
            self.remaining = self.remaining.saturating_sub(1);
            return Some((&node.keys[index], node.values[index]));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Entries<'_, K> {}

impl<K> FusedIterator for Entries<'_, K> {}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<'a, R> Iterator for Records<'a, R> {
    type Item = (Position, &'a R);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .find_map(|(position, slot)| slot.as_ref().map(|record| (position, record)))
    }
}

impl<'a, R, K> Iterator for RecordsByKey<'a, R, K> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        let records = self.records;
        self.entries
            .find_map(|(_, position)| records.get(position).and_then(Option::as_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = BTree::<u8>::new(3);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().len(), 0);
    }

    #[test]
    fn iteration_is_sorted_across_levels() {
        let mut tree = BTree::new(3);
        let keys = [45, 2, 64, 4, 54, 52, 50, 14, 689, 1, 12];
        for (position, key) in keys.iter().enumerate() {
            tree.insert(*key, position);
        }
        assert!(tree.height() > 2);

        let mut sorted = keys.to_vec();
        sorted.sort();
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), sorted);
        assert_eq!(tree.iter().len(), keys.len());

        for (key, position) in &tree {
            assert_eq!(keys[position], *key);
        }
    }

    #[test]
    fn store_iterators_skip_holes() {
        let mut store = SlotStore::with_branching(3, |s: &&str| *s);
        for word in ["mouse", "bingo", "copo", "gif"] {
            store.insert(word);
        }
        store.remove(&"bingo");

        let by_slot: Vec<_> = store.iter().collect();
        assert_eq!(by_slot, [(0, &"mouse"), (2, &"copo"), (3, &"gif")]);

        let by_key: Vec<_> = store.iter_by_key().copied().collect();
        assert_eq!(by_key, ["copo", "gif", "mouse"]);
    }
}
