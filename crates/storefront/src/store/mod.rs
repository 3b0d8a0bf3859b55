//! Durable key/value slots.
//!
//! The cart and the catalog snapshot each live in a single slot holding a
//! whole serialized value. Writes replace the value atomically; there is no
//! partial update.
//!
//! - [`FileStore`] - one JSON file per key under a data directory
//! - [`MemoryStore`] - process-local store for tests and ephemeral sessions

mod file;
mod memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a slot store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized for storage.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Atomic rename of the temporary file failed.
    #[error("failed to persist slot: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// The store refuses writes (e.g., storage quota exhausted).
    #[error("store is read-only")]
    ReadOnly,

    /// A previous writer panicked while holding the store.
    #[error("store lock poisoned")]
    Poisoned,
}

/// A durable key/value slot store.
pub trait SlotStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the slot exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the slot. Deleting an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the slot exists but cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: SlotStore + ?Sized> SlotStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
