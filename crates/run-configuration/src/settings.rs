//! Registry settings storage
//!
//! Decides where configurations are persisted and which providers are
//! registered at startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{FileMetaStore, MemoryMetaStore, MetaStore};

/// Settings for building a `RunConfigurationManager`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrySettings {
    /// Directory for persisted configurations; in-memory when unset
    pub store_dir: Option<PathBuf>,
    /// Register the Spark provider
    pub spark_enabled: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            store_dir: None,
            spark_enabled: true,
        }
    }
}

impl RegistrySettings {
    /// Load settings from a JSON file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Run configuration settings saved to {:?}", path);
        Ok(())
    }

    /// Open the store these settings point at
    pub fn open_store(&self) -> Result<Arc<dyn MetaStore>> {
        let store: Arc<dyn MetaStore> = match &self.store_dir {
            Some(dir) => Arc::new(FileMetaStore::open(dir)?),
            None => Arc::new(MemoryMetaStore::new()),
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = RegistrySettings::load(dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, RegistrySettings::default());
        assert!(settings.spark_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = RegistrySettings {
            store_dir: Some(dir.path().join("store")),
            spark_enabled: false,
        };
        settings.save(&path).unwrap();

        assert_eq!(RegistrySettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "storeDir": "/tmp/runconfigs" }"#).unwrap();

        let settings = RegistrySettings::load(&path).unwrap();
        assert_eq!(settings.store_dir, Some(PathBuf::from("/tmp/runconfigs")));
        assert!(settings.spark_enabled);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "sparkEnabled = false").unwrap();
        assert!(RegistrySettings::load(&path).is_err());
    }
}
