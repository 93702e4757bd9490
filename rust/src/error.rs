//! Error handling and result types for store operations.
//!
//! The core operations (search, insert, remove, find) never fail: absence is
//! `None` and duplicate keys are ignored. Errors only come out of invariant
//! validation and snapshot persistence.

use log::warn;

/// Error type for store validation and persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A tree invariant (ordering, fill, balance) does not hold.
    CorruptedTree(String),
    /// The record slots, the free list and the index disagree.
    InconsistentIndex(String),
    /// Reading or writing a snapshot file failed.
    Io(String),
    /// Encoding or decoding a snapshot failed.
    Serialization(String),
    /// The snapshot was written by an incompatible format version.
    IncompatibleSnapshot { found: u32, expected: u32 },
}

impl StoreError {
    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Create an InconsistentIndex error with context
    pub fn inconsistent_index(position: usize, details: &str) -> Self {
        Self::InconsistentIndex(format!("slot {}: {}", position, details))
    }

    /// Create an Io error with context
    pub fn io(operation: &str, details: &str) -> Self {
        Self::Io(format!("{} failed: {}", operation, details))
    }

    /// Check if this error was detected by invariant validation
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, Self::CorruptedTree(_) | Self::InconsistentIndex(_))
    }

    /// Check if this error came from the file system or the codec
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Serialization(_) | Self::IncompatibleSnapshot { .. }
        )
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
            StoreError::InconsistentIndex(msg) => write!(f, "Inconsistent index: {}", msg),
            StoreError::Io(msg) => write!(f, "I/O error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StoreError::IncompatibleSnapshot { found, expected } => write!(
                f,
                "Incompatible snapshot: format version {} (expected {})",
                found, expected
            ),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Public result type for validation and persistence
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for store construction from a snapshot
pub type InitResult<T> = Result<T, StoreError>;

/// Result extension trait for improved error handling
pub trait StoreResultExt<T> {
    /// Prefix the error message with additional context
    fn with_context(self, context: &str) -> StoreResult<T>;

    /// Log error and continue with default value
    fn or_default_with_log(self) -> T
    where
        T: Default;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn with_context(self, context: &str) -> StoreResult<T> {
        self.map_err(|e| match e {
            StoreError::CorruptedTree(msg) => {
                StoreError::CorruptedTree(format!("{}: {}", context, msg))
            }
            StoreError::InconsistentIndex(msg) => {
                StoreError::InconsistentIndex(format!("{}: {}", context, msg))
            }
            StoreError::Io(msg) => StoreError::io(context, &msg),
            StoreError::Serialization(msg) => {
                StoreError::Serialization(format!("{}: {}", context, msg))
            }
            other @ StoreError::IncompatibleSnapshot { .. } => other,
        })
    }

    fn or_default_with_log(self) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(e) => {
                warn!("store operation failed, using default: {}", e);
                T::default()
            }
        }
    }
}
