//! Key-value slot storage for the persisted cart snapshot.
//!
//! Mirrors browser local storage: byte-string slots keyed by name, scoped to
//! the session. Writes are best-effort; the cart swallows failures and keeps
//! operating in-memory.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Errors that can occur when writing a storage slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store rejected the write for lack of space.
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// The backing store is not usable at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value byte-string storage consumed by the cart store.
///
/// Reads report absence as `None` rather than an error: a missing slot is an
/// expected state on first load. Writes may fail and callers are expected to
/// treat that as non-fatal.
pub trait SlotStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn read_slot(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing store cannot complete the
    /// write (e.g., quota exceeded).
    fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory slot storage.
///
/// The default storage used in tests and simulations; survives for the life
/// of the process only.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a single slot.
    #[must_use]
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        let mut slots = storage.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.into(), value.into());
        drop(slots);
        storage
    }
}

impl SlotStorage for MemoryStorage {
    fn read_slot(&self, key: &str) -> Option<String> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Slot storage whose writes always fail.
///
/// Simulates a full or disabled browser storage so the cart's
/// swallow-and-continue path can be exercised.
#[derive(Debug, Default)]
pub struct FailingStorage;

impl SlotStorage for FailingStorage {
    fn read_slot(&self, _key: &str) -> Option<String> {
        None
    }

    fn write_slot(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded)
    }
}
