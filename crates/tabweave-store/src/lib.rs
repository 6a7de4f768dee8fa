mod error;
mod json_file;
mod memory;

pub mod keys;

pub use error::{Error, Result};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Durable, byte-quota-bounded key-value storage.
///
/// The engine treats this as an external collaborator: writes are awaited
/// before a command reports success, and the whole document can be
/// exported or replaced wholesale (no schema migration on import).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn put(&self, key: &str, value: Value) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Serializes the entire store as one JSON document.
    fn export(&self) -> Result<Value>;

    /// Replaces the entire store with the given document.
    fn import(&self, document: Value) -> Result<()>;
}

/// Reads a key and deserializes it into a concrete type.
pub fn get_typed<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serializes a value and writes it under the given key.
pub fn put_typed<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    store.put(key, serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_round_trip() {
        let store = MemoryStore::new();
        put_typed(&store, "numbers", &vec![1u32, 2, 3]).unwrap();

        let back: Option<Vec<u32>> = get_typed(&store, "numbers").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_typed_missing_key_is_none() {
        let store = MemoryStore::new();
        let value: Option<Vec<u32>> = get_typed(&store, "absent").unwrap();
        assert!(value.is_none());
    }
}
