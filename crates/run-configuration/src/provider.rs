//! Run configuration providers
//!
//! A provider owns every configuration of one type: it persists them, lists
//! them and hands out the executor that knows how to apply them.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::configuration::{RunConfiguration, TypedRunConfiguration};
use crate::error::Result;
use crate::executor::RunConfigurationExecutor;
use crate::store::MetaStore;

/// Owner of all run configurations of one type
pub trait RunConfigurationProvider: Send + Sync {
    /// Type tag of the configurations this provider owns
    fn config_type(&self) -> &str;

    /// Canonical instance of this provider's type, used as an editing template
    fn configuration(&self) -> Result<RunConfiguration>;

    /// Persist a configuration, replacing any with the same name
    fn save(&self, configuration: &RunConfiguration) -> Result<()>;

    /// All configurations this provider owns
    fn load(&self) -> Result<Vec<RunConfiguration>>;

    /// The configuration with this name, if this provider owns one
    fn load_by_name(&self, name: &str) -> Result<Option<RunConfiguration>>;

    /// Remove a configuration, returning whether it existed
    ///
    /// Removes the stored record even when it no longer decodes.
    fn delete(&self, name: &str) -> Result<bool>;

    /// Names of all configurations this provider owns
    fn names(&self) -> Result<Vec<String>> {
        Ok(self.load()?.into_iter().map(|c| c.name).collect())
    }

    /// Executor applying this provider's configurations
    fn executor(&self) -> Arc<dyn RunConfigurationExecutor>;
}

/// Provider persisting typed configurations into a `MetaStore` namespace
/// named after the type tag
pub struct MetaStoreProvider<T: TypedRunConfiguration> {
    store: Arc<dyn MetaStore>,
    executor: Arc<dyn RunConfigurationExecutor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: TypedRunConfiguration> MetaStoreProvider<T> {
    pub fn new(store: Arc<dyn MetaStore>, executor: Arc<dyn RunConfigurationExecutor>) -> Self {
        Self {
            store,
            executor,
            _marker: PhantomData,
        }
    }

    /// The backing store
    pub fn store(&self) -> &Arc<dyn MetaStore> {
        &self.store
    }

    /// All stored configurations, decoded
    ///
    /// Records that no longer decode into `T` are skipped.
    pub fn load_typed(&self) -> Result<Vec<T>> {
        Ok(self
            .store
            .list(T::TYPE)?
            .into_iter()
            .filter_map(|(key, value)| self.decode(key, value))
            .collect())
    }

    /// One stored configuration, decoded
    ///
    /// A record that no longer decodes into `T` reads as absent.
    pub fn load_typed_by_name(&self, name: &str) -> Result<Option<T>> {
        Ok(self
            .store
            .get(T::TYPE, name)?
            .and_then(|value| self.decode(name.to_string(), value)))
    }

    fn decode(&self, key: String, value: serde_json::Value) -> Option<T> {
        match serde_json::from_value::<T>(value) {
            Ok(mut typed) => {
                typed.set_name(key);
                Some(typed)
            }
            Err(e) => {
                log::warn!(
                    "Skipping unreadable run configuration '{}' of type '{}' in {} store: {}",
                    key,
                    T::TYPE,
                    self.store.name(),
                    e
                );
                None
            }
        }
    }

    /// Persist a typed configuration under its name
    pub fn save_typed(&self, typed: &T) -> Result<()> {
        let value = serde_json::to_value(typed)?;
        self.store.put(T::TYPE, typed.name(), value)?;
        log::debug!("Saved run configuration '{}' of type '{}'", typed.name(), T::TYPE);
        Ok(())
    }
}

impl<T: TypedRunConfiguration> RunConfigurationProvider for MetaStoreProvider<T> {
    fn config_type(&self) -> &str {
        T::TYPE
    }

    fn configuration(&self) -> Result<RunConfiguration> {
        RunConfiguration::from_typed(&T::default())
    }

    fn save(&self, configuration: &RunConfiguration) -> Result<()> {
        let typed: T = configuration.to_typed()?;
        self.save_typed(&typed)
    }

    fn load(&self) -> Result<Vec<RunConfiguration>> {
        self.load_typed()?
            .iter()
            .map(RunConfiguration::from_typed)
            .collect()
    }

    fn load_by_name(&self, name: &str) -> Result<Option<RunConfiguration>> {
        self.load_typed_by_name(name)?
            .as_ref()
            .map(RunConfiguration::from_typed)
            .transpose()
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let removed = self.store.remove(T::TYPE, name)?;
        if removed {
            log::debug!("Deleted run configuration '{}' of type '{}'", name, T::TYPE);
        }
        Ok(removed)
    }

    fn executor(&self) -> Arc<dyn RunConfigurationExecutor> {
        Arc::clone(&self.executor)
    }
}
