//! Key-value stores backing the run configuration providers.
//!
//! Records are grouped by namespace (one per configuration type) and keyed
//! by configuration name. Values are kept as JSON so that a store does not
//! need to know about configuration types. `FileMetaStore` percent-encodes
//! namespaces into file names, so any non-empty type tag survives a reopen.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::StoreError;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

type Namespaces = BTreeMap<String, BTreeMap<String, Value>>;

/// Namespaced key-value store for configuration records
pub trait MetaStore: Send + Sync {
    /// Human-readable store name, used in log messages
    fn name(&self) -> &str;

    /// Insert or replace a record
    fn put(&self, namespace: &str, key: &str, value: Value) -> StoreResult<()>;

    /// Fetch one record
    fn get(&self, namespace: &str, key: &str) -> StoreResult<Option<Value>>;

    /// All records of a namespace, ordered by key
    fn list(&self, namespace: &str) -> StoreResult<Vec<(String, Value)>>;

    /// Remove a record, returning whether it existed
    fn remove(&self, namespace: &str, key: &str) -> StoreResult<bool>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryMetaStore {
    namespaces: RwLock<Namespaces>,
}

impl MemoryMetaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetaStore for MemoryMetaStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn put(&self, namespace: &str, key: &str, value: Value) -> StoreResult<()> {
        self.namespaces
            .write()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, namespace: &str, key: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .namespaces
            .read()
            .get(namespace)
            .and_then(|records| records.get(key))
            .cloned())
    }

    fn list(&self, namespace: &str) -> StoreResult<Vec<(String, Value)>> {
        Ok(self
            .namespaces
            .read()
            .get(namespace)
            .map(|records| {
                records
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn remove(&self, namespace: &str, key: &str) -> StoreResult<bool> {
        Ok(self
            .namespaces
            .write()
            .get_mut(namespace)
            .map(|records| records.remove(key).is_some())
            .unwrap_or(false))
    }
}

/// Directory-backed store with one JSON document per namespace.
///
/// Documents are loaded when the store is opened and every change is
/// written through to disk before it becomes visible in memory.
///
/// # Example
///
/// ```ignore
/// use run_configuration::FileMetaStore;
///
/// let store = FileMetaStore::open(".kettle/run-configurations")?;
/// store.put("Spark", "cluster", serde_json::json!({ "url": "spark:53000" }))?;
/// ```
#[derive(Debug)]
pub struct FileMetaStore {
    namespaces: RwLock<Namespaces>,
    persist_path: PathBuf,
}

impl FileMetaStore {
    /// Open a store rooted at `path`, loading any namespace documents found.
    ///
    /// The directory is created on first write if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let store = Self {
            namespaces: RwLock::new(BTreeMap::new()),
            persist_path: path.as_ref().to_path_buf(),
        };
        let count = store.load_from_disk()?;
        log::debug!(
            "Opened run configuration store at {:?} ({} namespaces)",
            store.persist_path,
            count
        );
        Ok(store)
    }

    /// Directory the store persists into
    pub fn path(&self) -> &Path {
        &self.persist_path
    }

    fn load_from_disk(&self) -> StoreResult<usize> {
        if !self.persist_path.exists() {
            return Ok(0);
        }

        let mut loaded = BTreeMap::new();
        for entry in std::fs::read_dir(&self.persist_path)? {
            let file_path = entry?.path();
            if file_path.extension().map_or(true, |e| e != "json") {
                continue;
            }
            let Some(namespace) = file_path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(decode_namespace)
            else {
                log::warn!("Ignoring {:?}: not a run configuration namespace file", file_path);
                continue;
            };

            let content = match std::fs::read_to_string(&file_path) {
                Ok(content) => content,
                Err(e) => {
                    log::warn!("Failed to read run configurations from {:?}: {}", file_path, e);
                    continue;
                }
            };
            match serde_json::from_str::<BTreeMap<String, Value>>(&content) {
                Ok(records) => {
                    log::info!(
                        "Loaded {} run configurations of type '{}' from {:?}",
                        records.len(),
                        namespace,
                        file_path
                    );
                    loaded.insert(namespace, records);
                }
                Err(e) => {
                    log::warn!("Failed to parse run configurations from {:?}: {}", file_path, e);
                }
            }
        }

        let count = loaded.len();
        *self.namespaces.write() = loaded;
        Ok(count)
    }

    fn namespace_file(&self, namespace: &str) -> PathBuf {
        self.persist_path
            .join(format!("{}.json", encode_namespace(namespace)))
    }

    fn save_namespace(&self, namespace: &str, records: &BTreeMap<String, Value>) -> StoreResult<()> {
        std::fs::create_dir_all(&self.persist_path)?;
        let file_path = self.namespace_file(namespace);
        let content = serde_json::to_string_pretty(records)?;
        std::fs::write(&file_path, content)?;
        log::debug!("Saved run configurations of type '{}' to {:?}", namespace, file_path);
        Ok(())
    }
}

impl MetaStore for FileMetaStore {
    fn name(&self) -> &str {
        "file"
    }

    fn put(&self, namespace: &str, key: &str, value: Value) -> StoreResult<()> {
        if namespace.is_empty() {
            return Err(StoreError::Backend(
                "empty namespace cannot be stored on disk".to_string(),
            ));
        }
        let mut namespaces = self.namespaces.write();
        let mut records = namespaces.get(namespace).cloned().unwrap_or_default();
        records.insert(key.to_string(), value);
        self.save_namespace(namespace, &records)?;
        namespaces.insert(namespace.to_string(), records);
        Ok(())
    }

    fn get(&self, namespace: &str, key: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .namespaces
            .read()
            .get(namespace)
            .and_then(|records| records.get(key))
            .cloned())
    }

    fn list(&self, namespace: &str) -> StoreResult<Vec<(String, Value)>> {
        Ok(self
            .namespaces
            .read()
            .get(namespace)
            .map(|records| {
                records
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn remove(&self, namespace: &str, key: &str) -> StoreResult<bool> {
        let mut namespaces = self.namespaces.write();
        let Some(existing) = namespaces.get(namespace) else {
            return Ok(false);
        };
        if !existing.contains_key(key) {
            return Ok(false);
        }

        let mut records = existing.clone();
        records.remove(key);
        self.save_namespace(namespace, &records)?;
        namespaces.insert(namespace.to_string(), records);
        log::debug!("Deleted run configuration '{}' of type '{}'", key, namespace);
        Ok(true)
    }
}

fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

/// File stem for a namespace: `[A-Za-z0-9_-]` kept, every other byte as `%XX`
fn encode_namespace(namespace: &str) -> String {
    let mut encoded = String::with_capacity(namespace.len());
    for byte in namespace.bytes() {
        if is_plain(byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// Inverse of `encode_namespace`; `None` for stems it cannot have produced
fn decode_namespace(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = stem.get(i + 1..i + 3)?;
                let byte = u8::from_str_radix(hex, 16).ok()?;
                if is_plain(byte) {
                    return None;
                }
                decoded.push(byte);
                i += 3;
            }
            byte if is_plain(byte) => {
                decoded.push(byte);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(decoded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_basic_operations() {
        let store = MemoryMetaStore::new();
        store.put("Spark", "b", json!({ "url": "b" })).unwrap();
        store.put("Spark", "a", json!({ "url": "a" })).unwrap();
        store.put("Pentaho", "a", json!({})).unwrap();

        let keys: Vec<_> = store
            .list("Spark")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(store.get("Spark", "b").unwrap(), Some(json!({ "url": "b" })));

        assert!(store.remove("Spark", "a").unwrap());
        assert!(!store.remove("Spark", "a").unwrap());
        assert!(!store.remove("Unknown", "a").unwrap());
        assert!(store.get("Pentaho", "a").unwrap().is_some());
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileMetaStore::open(dir.path()).unwrap();
            store.put("Spark", "cluster", json!({ "url": "spark:53000" })).unwrap();
            store.put("Spark", "other", json!({ "url": "other" })).unwrap();
            assert!(store.remove("Spark", "other").unwrap());
        }

        assert!(dir.path().join("Spark.json").exists());

        let reopened = FileMetaStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("Spark", "cluster").unwrap(),
            Some(json!({ "url": "spark:53000" }))
        );
        assert!(reopened.get("Spark", "other").unwrap().is_none());
    }

    #[test]
    fn test_file_store_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileMetaStore::open(dir.path().join("not-yet")).unwrap();
        assert!(store.list("Spark").unwrap().is_empty());

        store.put("Spark", "x", json!({})).unwrap();
        assert!(dir.path().join("not-yet").join("Spark.json").exists());
    }

    #[test]
    fn test_file_store_skips_malformed_documents() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Spark.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("Pentaho.json"), r#"{ "remote": {} }"#).unwrap();
        std::fs::write(dir.path().join("README.txt"), "ignored").unwrap();

        let store = FileMetaStore::open(dir.path()).unwrap();
        assert!(store.list("Spark").unwrap().is_empty());
        assert_eq!(store.list("Pentaho").unwrap().len(), 1);
    }

    #[test]
    fn test_namespaces_with_special_characters_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileMetaStore::open(dir.path()).unwrap();
            store.put("spark.v2", "cfg", json!({ "url": "h" })).unwrap();
            store.put("a b", "x", json!(1)).unwrap();
            store.put("a_b", "x", json!(2)).unwrap();
            store.put("a/b%", "x", json!(3)).unwrap();
        }
        assert!(dir.path().join("spark%2Ev2.json").exists());

        let reopened = FileMetaStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("spark.v2", "cfg").unwrap(),
            Some(json!({ "url": "h" }))
        );
        assert_eq!(reopened.get("a b", "x").unwrap(), Some(json!(1)));
        assert_eq!(reopened.get("a_b", "x").unwrap(), Some(json!(2)));
        assert_eq!(reopened.get("a/b%", "x").unwrap(), Some(json!(3)));
        assert!(matches!(
            reopened.put("", "x", json!(4)),
            Err(StoreError::Backend(_))
        ));
    }

    #[test]
    fn test_namespace_encoding() {
        assert_eq!(encode_namespace("Spark"), "Spark");
        assert_eq!(encode_namespace("a b"), "a%20b");
        assert_eq!(decode_namespace("a%20b").as_deref(), Some("a b"));
        assert_eq!(decode_namespace("caf%C3%A9").as_deref(), Some("café"));
        assert!(decode_namespace("a b").is_none());
        assert!(decode_namespace("%2").is_none());
        assert!(decode_namespace("%41").is_none());
    }

    #[test]
    fn test_file_store_skips_unreadable_documents() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Spark.json"), [0xff, 0xfe, 0x00]).unwrap();
        std::fs::write(dir.path().join("Pentaho.json"), r#"{ "local": {} }"#).unwrap();

        let store = FileMetaStore::open(dir.path()).unwrap();
        assert!(store.list("Spark").unwrap().is_empty());
        assert_eq!(store.list("Pentaho").unwrap().len(), 1);
    }
}
