use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::*;

/// Key-value persistence provider holding serialized JSON.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> core::result::Result<(), StorageError>;
}

/// Reads `key`, falling back to `default` when it is missing or cannot be decoded.
pub fn load_or<T: DeserializeOwned>(storage: &impl Storage, key: &str, default: T) -> T {
    match try_load(storage, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(err) => {
            log::warn!("{err}, using default");
            default
        }
    }
}

pub fn try_load<T: DeserializeOwned>(
    storage: &impl Storage,
    key: &str,
) -> core::result::Result<Option<T>, StorageError> {
    let Some(raw) = storage.get(key) else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StorageError::Decode {
            key: key.to_string(),
            message: format!("{err}"),
        })
}

pub fn save<T: Serialize>(
    storage: &mut impl Storage,
    key: &str,
    value: &T,
) -> core::result::Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|err| StorageError::Encode {
        key: key.to_string(),
        message: format!("{err}"),
    })?;
    storage.set(key, raw)
}

/// In-process storage, survives as long as the value does.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> core::result::Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage that remembers nothing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NoStorage;

impl Storage for NoStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: String) -> core::result::Result<(), StorageError> {
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> core::result::Result<(), StorageError> {
        (**self).set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_yields_default() {
        let storage = MemoryStorage::new();

        assert_eq!(load_or(&storage, "status", 5u8), 5);
    }

    #[test]
    fn saved_value_is_loaded_back() {
        let mut storage = MemoryStorage::new();
        save(&mut storage, "status", &GameStatus::Lost).unwrap();

        assert_eq!(storage.get("status").as_deref(), Some("\"Lost\""));
        assert_eq!(load_or(&storage, "status", GameStatus::Playing), GameStatus::Lost);
    }

    #[test]
    fn garbage_falls_back_to_default() {
        let mut storage = MemoryStorage::new();
        storage.set("status", "not json".into()).unwrap();

        assert!(matches!(
            try_load::<GameStatus>(&storage, "status"),
            Err(StorageError::Decode { .. })
        ));
        assert_eq!(load_or(&storage, "status", GameStatus::Won), GameStatus::Won);
    }

    #[test]
    fn memory_storage_removes_entries() {
        let mut storage = MemoryStorage::new();
        save(&mut storage, "a", &1u8).unwrap();
        save(&mut storage, "b", &2u8).unwrap();

        assert_eq!(storage.len(), 2);
        assert_eq!(storage.remove("a").as_deref(), Some("1"));
        assert_eq!(storage.remove("a"), None);
        assert_eq!(storage.len(), 1);
        assert!(!storage.is_empty());
    }

    #[test]
    fn no_storage_drops_writes() {
        let mut storage = NoStorage;
        save(&mut storage, "key", &1u8).unwrap();

        assert_eq!(storage.get("key"), None);
    }
}
