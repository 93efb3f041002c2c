//! Key-value storage collaborator.
//!
//! The engine persists plain JSON values under fixed keys and treats every
//! load and save as atomic. How and where they are kept is up to the
//! implementation.

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, StorageError>;

/// Synchronous key-value store.
pub trait Storage: Send {
    /// Value stored under `key`, or `None` if nothing was ever saved.
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing what was there.
    fn save(&mut self, key: &str, value: &Value) -> Result<()>;
}

/// Load and deserialize the value under `key`.
pub fn load_as<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>> {
    match storage.load(key)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serialize `value` and store it under `key`.
pub fn save_as<T: Serialize + ?Sized>(storage: &mut dyn Storage, key: &str, value: &T) -> Result<()> {
    let value = serde_json::to_value(value)?;
    storage.save(key, &value)
}

/// Storage that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        self.values.insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Card, Prompt};
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_key_loads_none() {
        let storage = MemoryStorage::new();
        let loaded: Option<Vec<Card>> = load_as(&storage, "times.cards").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn typed_save_and_load() {
        let mut storage = MemoryStorage::new();
        let cards = vec![Card::new(Prompt::product(8, 7))];
        save_as(&mut storage, "times.cards", &cards).unwrap();
        let loaded: Option<Vec<Card>> = load_as(&storage, "times.cards").unwrap();
        assert_eq!(loaded, Some(cards));
    }

    #[test]
    fn mismatched_shape_is_a_serialization_error() {
        let mut storage = MemoryStorage::new();
        storage.save("times.cards", &Value::String("garbage".into())).unwrap();
        let loaded = load_as::<Vec<Card>>(&storage, "times.cards");
        assert!(matches!(loaded, Err(StorageError::Serialization(_))));
    }
}
