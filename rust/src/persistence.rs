//! Snapshot persistence for the slot store.
//!
//! The whole store state (slots with their holes, the free list and the index
//! tree) is written as one bincode blob. Writes go to a temporary file in the
//! destination directory which is then renamed over the old snapshot, so an
//! interrupted save never damages the previous file.

use crate::error::{InitResult, StoreError, StoreResult, StoreResultExt};
use crate::types::{BTree, Position, SlotStore, StoreSnapshot, SNAPSHOT_FORMAT_VERSION};
use bincode::config::{AllowTrailing, FixintEncoding, WithOtherIntEncoding, WithOtherTrailing};
use bincode::{DefaultOptions, Options};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

type SnapshotCodec =
    WithOtherIntEncoding<WithOtherTrailing<DefaultOptions, AllowTrailing>, FixintEncoding>;

/// Fixed-width integers with trailing bytes allowed, the same layout as
/// `bincode::serialize`.
fn codec() -> SnapshotCodec {
    bincode::DefaultOptions::new()
        .allow_trailing_bytes()
        .with_fixint_encoding()
}

/// Borrowed view of a store, encoded exactly like `StoreSnapshot`.
#[derive(Serialize)]
struct SnapshotRef<'a, R, K> {
    format_version: u32,
    records: &'a [Option<R>],
    free_slots: &'a VecDeque<Position>,
    index: &'a BTree<K>,
}

// ============================================================================
// SNAPSHOT CONVERSION
// ============================================================================

impl<R, K, F> SlotStore<R, K, F>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    /// Copy the current state into an owned snapshot.
    pub fn snapshot(&self) -> StoreSnapshot<R, K>
    where
        R: Clone,
        K: Clone,
    {
        StoreSnapshot::new(
            self.records.clone(),
            self.free_slots.clone(),
            self.index.clone(),
        )
    }

    /// Consume the store and hand back its state.
    pub fn into_snapshot(self) -> StoreSnapshot<R, K> {
        StoreSnapshot::new(self.records, self.free_slots, self.index)
    }

    /// Rebuild a store from a snapshot and the key extractor it was built with.
    ///
    /// The snapshot is validated before it is accepted; a version mismatch or
    /// any disagreement between slots, free list and index is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::SlotStore;
    ///
    /// let mut store = SlotStore::new(|n: &u64| *n);
    /// store.insert(4);
    /// store.insert(9);
    /// store.remove(&4);
    ///
    /// let restored = SlotStore::from_snapshot(store.snapshot(), |n: &u64| *n).unwrap();
    /// assert_eq!(restored.records(), store.records());
    /// assert_eq!(restored.next_position(), 0);
    /// ```
    pub fn from_snapshot(snapshot: StoreSnapshot<R, K>, key_of: F) -> InitResult<Self> {
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(StoreError::IncompatibleSnapshot {
                found: snapshot.format_version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }

        let store = Self {
            records: snapshot.records,
            free_slots: snapshot.free_slots,
            index: snapshot.index,
            key_of,
        };
        store.check_invariants().with_context("validating snapshot")?;
        Ok(store)
    }
}

// ============================================================================
// FILE PERSISTENCE
// ============================================================================

impl<R, K, F> SlotStore<R, K, F>
where
    R: Serialize + DeserializeOwned,
    K: Ord + Serialize + DeserializeOwned,
    F: Fn(&R) -> K,
{
    /// Write the store to `path`, replacing any previous snapshot atomically.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> StoreResult<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let snapshot = SnapshotRef {
            format_version: SNAPSHOT_FORMAT_VERSION,
            records: &self.records,
            free_slots: &self.free_slots,
            index: &self.index,
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            codec().serialize_into(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path)
            .map_err(|err| StoreError::from(err.error))
            .with_context("replacing snapshot")?;

        debug!("saved {} records to {}", self.len(), path.display());
        Ok(())
    }

    /// Load a store previously written with `save`.
    ///
    /// Decoding never reads past the file size, so a corrupted length prefix
    /// is a `Serialization` error rather than a huge allocation.
    pub fn open<P: AsRef<Path>>(path: P, key_of: F) -> InitResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(StoreError::from)
            .with_context(&format!("opening {}", path.display()))?;
        let file_len = file.metadata()?.len();
        let snapshot: StoreSnapshot<R, K> = codec()
            .with_limit(file_len)
            .deserialize_from(BufReader::new(file))?;

        let store = Self::from_snapshot(snapshot, key_of)?;
        debug!("loaded {} records from {}", store.len(), path.display());
        Ok(store)
    }

    /// Load the store at `path`, or start an empty one if no file exists yet.
    pub fn open_or_create<P: AsRef<Path>>(path: P, key_of: F) -> InitResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path, key_of)
        } else {
            debug!("no snapshot at {}, starting empty", path.display());
            Ok(Self::new(key_of))
        }
    }
}
