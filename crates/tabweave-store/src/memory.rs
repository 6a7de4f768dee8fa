use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::{Error, KeyValueStore, Result};

/// Volatile store used by tests and fixtures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let doc = self.doc.lock().unwrap();
        Ok(doc.get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        let mut doc = self.doc.lock().unwrap();
        doc.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut doc = self.doc.lock().unwrap();
        doc.remove(key);
        Ok(())
    }

    fn export(&self) -> Result<Value> {
        let doc = self.doc.lock().unwrap();
        Ok(Value::Object(doc.clone()))
    }

    fn import(&self, document: Value) -> Result<()> {
        let Value::Object(map) = document else {
            return Err(Error::InvalidDocument(
                "expected a JSON object at the top level".to_string(),
            ));
        };
        let mut doc = self.doc.lock().unwrap();
        *doc = map;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_get_remove() {
        let store = MemoryStore::new();
        store.put("a", json!(1)).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(json!(1)));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_import_replaces_wholesale() {
        let store = MemoryStore::new();
        store.put("stale", json!("value")).unwrap();

        store.import(json!({"fresh": true})).unwrap();
        assert_eq!(store.get("stale").unwrap(), None);
        assert_eq!(store.get("fresh").unwrap(), Some(json!(true)));
    }

    #[test]
    fn test_import_rejects_non_object() {
        let store = MemoryStore::new();
        assert!(store.import(json!([1, 2, 3])).is_err());
    }
}
