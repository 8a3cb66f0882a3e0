//! Session-scoped gallery cache

use crate::error::Result;
use app_storage::KeyValueStore;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session storage key of the gallery snapshot
pub const GALLERY_STORAGE_KEY: &str = "portfolio-gallery-images";

/// One cached result; the cache does not look inside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GalleryItem(serde_json::Value);

impl GalleryItem {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Capture any serializable record
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self> {
        Ok(Self(serde_json::to_value(record)?))
    }

    /// Read the item back as a typed record, if it has that shape
    pub fn to_record<T: DeserializeOwned>(&self) -> Option<T> {
        T::deserialize(&self.0).ok()
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for GalleryItem {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// In-memory gallery list mirrored to session storage as a full snapshot
pub struct GalleryCache {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    items: RwLock<Arc<Vec<GalleryItem>>>,
}

impl GalleryCache {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            items: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Rehydrate from the persisted snapshot.
    ///
    /// Absent, unreadable or malformed data leaves the cache empty.
    pub fn load(&self) {
        let items = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<GalleryItem>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(key = %self.key, "Discarding malformed gallery snapshot: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, "Gallery snapshot unreadable: {}", e);
                Vec::new()
            }
        };

        tracing::debug!(count = items.len(), "Gallery cache loaded");
        *self.items.write() = Arc::new(items);
    }

    /// Replace the whole list and persist the new snapshot
    pub fn replace(&self, items: Vec<GalleryItem>) -> Result<()> {
        let snapshot = serde_json::to_string(&items)?;
        let count = items.len();

        *self.items.write() = Arc::new(items);
        self.storage.set_item(&self.key, &snapshot)?;

        tracing::debug!(count, "Gallery cache replaced");
        Ok(())
    }

    /// Current snapshot; later replacements do not affect it
    pub fn items(&self) -> Arc<Vec<GalleryItem>> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}
