//! In-memory session storage

use crate::{KeyValueStore, Result};
use dashmap::DashMap;

/// Session-scoped storage; contents vanish when the store is dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.items.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set_item("portfolio-gallery-images", "[]").unwrap();
        store.set_item("portfolio-gallery-images", "[1]").unwrap();
        assert_eq!(
            store.get_item("portfolio-gallery-images").unwrap().as_deref(),
            Some("[1]")
        );
        assert_eq!(store.len(), 1);

        store.remove_item("portfolio-gallery-images").unwrap();
        assert_eq!(store.get_item("portfolio-gallery-images").unwrap(), None);

        store.set_item("a", "1").unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
