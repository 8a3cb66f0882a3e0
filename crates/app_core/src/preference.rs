//! Validated scalar preferences persisted in key-value storage

use crate::error::Result;
use app_storage::KeyValueStore;
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;

/// A closed set of values persisted under one storage key.
///
/// Stored strings outside the set are never surfaced: they read as absent.
pub trait Preference: Copy + Eq + Debug + Send + Sync + 'static {
    /// Storage key the value is persisted under
    const STORAGE_KEY: &'static str;

    /// Every allowed value
    const ALL: &'static [Self];

    /// Value used when nothing valid is stored
    const DEFAULT: Self;

    /// Wire form of the value
    fn as_str(self) -> &'static str;

    /// Parse the wire form; `None` for anything outside the allowed set
    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|value| value.as_str() == raw)
    }
}

/// Owns the in-memory copy of one preference and mirrors it to storage
pub struct PreferenceStore<T: Preference> {
    storage: Arc<dyn KeyValueStore>,
    current: RwLock<T>,
}

impl<T: Preference> PreferenceStore<T> {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            current: RwLock::new(T::DEFAULT),
        }
    }

    /// Current in-memory value
    pub fn get(&self) -> T {
        *self.current.read()
    }

    /// Update the value and write it through to storage
    pub fn set(&self, value: T) -> Result<()> {
        let mut current = self.current.write();
        *current = value;
        self.storage.set_item(T::STORAGE_KEY, value.as_str())?;
        tracing::debug!(key = T::STORAGE_KEY, value = value.as_str(), "Preference updated");
        Ok(())
    }

    /// Untyped setter; values outside the allowed set are ignored.
    ///
    /// Returns whether the value was accepted.
    pub fn set_raw(&self, raw: &str) -> Result<bool> {
        match T::parse(raw) {
            Some(value) => {
                self.set(value)?;
                Ok(true)
            }
            None => {
                tracing::debug!(key = T::STORAGE_KEY, raw, "Ignoring value outside allowed set");
                Ok(false)
            }
        }
    }

    /// The persisted value, if present and valid
    pub fn stored(&self) -> Option<T> {
        let raw = match self.storage.get_item(T::STORAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = T::STORAGE_KEY, "Preference read failed: {}", e);
                return None;
            }
        };

        let value = T::parse(&raw);
        if value.is_none() {
            tracing::debug!(key = T::STORAGE_KEY, raw = %raw, "Discarding invalid stored preference");
        }
        value
    }

    /// Adopt the persisted value, or persist the default
    pub fn init(&self) -> Result<T> {
        let value = self.stored().unwrap_or(T::DEFAULT);
        self.set(value)?;
        Ok(value)
    }
}
