//! Tree structure management operations.
//!
//! This module contains tree-level queries and maintenance: size, height,
//! node counts, clearing, and a textual rendering of the node structure.

use crate::types::{BTree, Node};
use std::fmt;

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K> BTree<K> {
    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of children per node.
    pub fn max_branching(&self) -> usize {
        self.max_branching
    }

    /// Minimum number of keys every non-root node keeps.
    pub fn min_keys(&self) -> usize {
        self.max_branching.saturating_sub(1) / 2
    }

    /// Number of levels; 0 for a tree without a root.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root.as_ref();
        while let Some(current) = node {
            height += 1;
            node = current.children.first();
        }
        height
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        fn count<K>(node: &Node<K>) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.root.as_ref().map_or(0, count)
    }

    /// The root node, if any key was ever inserted and the tree is not empty.
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.as_ref()
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }
}

// ============================================================================
// DEBUG RENDERING
// ============================================================================

impl<K: fmt::Display> fmt::Display for BTree<K> {
    /// One line per node, indented by depth: `{ key=position ... }`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            None => write!(f, "{{ }}"),
            Some(root) => write_node(f, root, 0),
        }
    }
}

fn write_node<K: fmt::Display>(f: &mut fmt::Formatter<'_>, node: &Node<K>, depth: usize) -> fmt::Result {
    write!(f, "{}{{ ", "  ".repeat(depth))?;
    for (key, position) in node.keys.iter().zip(&node.values) {
        write!(f, "{}={} ", key, position)?;
    }
    writeln!(f, "}}")?;
    for child in &node.children {
        write_node(f, child, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_renders_braces() {
        assert_eq!(BTree::<i32>::new(3).to_string(), "{ }");
    }

    #[test]
    fn rendering_shows_levels() {
        let mut tree = BTree::new(3);
        tree.insert(1, 10);
        tree.insert(2, 20);
        tree.insert(3, 30);
        assert_eq!(tree.to_string(), "{ 2=20 }\n  { 1=10 }\n  { 3=30 }\n");
    }

    #[test]
    fn counts_track_structure() {
        let mut tree = BTree::new(3);
        assert_eq!((tree.height(), tree.node_count()), (0, 0));
        for key in 0..7 {
            tree.insert(key, 0);
        }
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.node_count(), 7);
    }

    #[test]
    fn clear_empties_tree() {
        let mut tree = BTree::new(5);
        for key in 0..20 {
            tree.insert(key, key as usize);
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.search(&3), None);
        assert!(tree.root().is_none());
    }
}
