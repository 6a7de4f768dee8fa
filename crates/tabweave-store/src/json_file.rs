use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::{Error, KeyValueStore, Result};

/// Store backed by a single JSON document on disk.
///
/// The whole document is rewritten on every mutation; callers observe a
/// write as durable once the mutating call returns. A missing file opens
/// as an empty document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = Self::read_document(&path)?;
        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(path: &Path) -> Result<Map<String, Value>> {
        if !path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::InvalidDocument(format!(
                "{} does not contain a JSON object",
                path.display()
            ))),
        }
    }

    fn write_document(&self, doc: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(doc.clone()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let doc = self.doc.lock().unwrap();
        Ok(doc.get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        let mut doc = self.doc.lock().unwrap();
        doc.insert(key.to_string(), value);
        self.write_document(&doc)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut doc = self.doc.lock().unwrap();
        doc.remove(key);
        self.write_document(&doc)
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
        self.write_document(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("state.json")).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_writes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.put("settings", json!({"maxSessions": 5})).unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("settings").unwrap(),
            Some(json!({"maxSessions": 5}))
        );
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("state.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.put("k", json!(1)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_import_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("a.json")).unwrap();
        store.put("groups", json!([])).unwrap();
        store.put("activeGroupId", json!("3")).unwrap();

        let exported = store.export().unwrap();

        let other = JsonFileStore::open(dir.path().join("b.json")).unwrap();
        other.put("leftover", json!(true)).unwrap();
        other.import(exported).unwrap();

        assert_eq!(other.get("leftover").unwrap(), None);
        assert_eq!(other.get("activeGroupId").unwrap(), Some(json!("3")));
    }

    #[test]
    fn test_open_rejects_non_object_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(JsonFileStore::open(&path).is_err());
    }
}
