//! Minimal record store with a B-tree primary-key index.
//!
//! [`BTree`] maps ordered keys to slot positions. [`SlotStore`] keeps records
//! in a slot array, indexes them by a caller-supplied key extractor, and
//! reuses freed slots in the order they were freed. A store can be written to
//! disk as a single snapshot and loaded back.
//!
//! # Examples
//!
//! ```
//! use minidb::SlotStore;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Keyword {
//!     word: String,
//!     articles: Vec<u32>,
//! }
//!
//! let mut store = SlotStore::with_branching(3, |k: &Keyword| k.word.clone());
//! store.insert(Keyword { word: "btree".into(), articles: vec![1] });
//! store.insert(Keyword { word: "slot".into(), articles: vec![2, 3] });
//!
//! store.find_mut(&"btree".to_string()).unwrap().articles.push(4);
//! assert_eq!(store.find(&"btree".to_string()).unwrap().articles, vec![1, 4]);
//!
//! store.remove(&"btree".to_string());
//! assert_eq!(store.get(0), None);
//! assert_eq!(store.next_position(), 0);
//! ```

mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod persistence;
mod tree_structure;
mod types;
mod validation;

pub use error::{InitResult, StoreError, StoreResult, StoreResultExt};
pub use iteration::{Entries, Keys, Records, RecordsByKey};
pub use types::{
    BTree, Node, Position, SlotStore, StoreSnapshot, DEFAULT_BRANCHING, MIN_BRANCHING,
    SNAPSHOT_FORMAT_VERSION,
};
