//! In-memory slot store.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{SlotStore, StoreError};

/// A slot store held in process memory.
///
/// Can be switched to read-only to simulate a full or unavailable backing
/// store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
    read_only: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one slot.
    #[must_use]
    pub fn with_slot(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut slots) = store.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// Make subsequent writes fail with `StoreError::ReadOnly`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

impl SlotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let slots = self.slots.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut slots = self.slots.lock().map_err(|_| StoreError::Poisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut slots = self.slots.lock().map_err(|_| StoreError::Poisoned)?;
        slots.remove(key);
        Ok(())
    }
}
