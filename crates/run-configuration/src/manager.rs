//! Run configuration registry
//!
//! Maps type tags to providers and routes every operation to the provider
//! owning the configuration involved. One default provider is always
//! registered.
//!
//! # Ordering
//!
//! Listings (`load`, `get_names`, `get_types`) put the default provider
//! first, then the other providers in registration order. Lookups by name
//! (`load_by_name`, `delete`) check the other providers in registration
//! order and the default provider last.
//!
//! # Usage
//!
//! ```ignore
//! use run_configuration::{RegistrySettings, RunConfigurationManager};
//!
//! let manager = RunConfigurationManager::from_settings(&RegistrySettings::default())?;
//! for name in manager.get_names()? {
//!     println!("{}", name);
//! }
//! ```

use std::sync::Arc;

use crate::configuration::RunConfiguration;
use crate::error::{Result, RunConfigurationError};
use crate::executor::{ExecutionConfiguration, RunConfigurationExecutor};
use crate::pentaho::DefaultRunConfigurationProvider;
use crate::provider::RunConfigurationProvider;
use crate::settings::RegistrySettings;
use crate::spark::{SparkRunConfigurationExecutor, SparkRunConfigurationProvider};

/// Registry of run configuration providers
///
/// Reads take `&self` and are safe to share across threads once the
/// registry is built. Saves and deletes need external serialization when
/// several callers mutate configurations concurrently.
pub struct RunConfigurationManager {
    default_provider: Arc<dyn RunConfigurationProvider>,
    providers: Vec<Arc<dyn RunConfigurationProvider>>,
}

impl RunConfigurationManager {
    /// Create a registry holding only the default provider
    pub fn new(default_provider: Arc<dyn RunConfigurationProvider>) -> Self {
        Self {
            default_provider,
            providers: Vec::new(),
        }
    }

    /// Create a registry with a default provider and additional providers
    pub fn with_providers(
        default_provider: Arc<dyn RunConfigurationProvider>,
        providers: Vec<Arc<dyn RunConfigurationProvider>>,
    ) -> Self {
        let mut manager = Self::new(default_provider);
        for provider in providers {
            manager.register_provider(provider);
        }
        manager
    }

    /// Build the standard registry described by `settings`
    pub fn from_settings(settings: &RegistrySettings) -> Result<Self> {
        let store = settings.open_store()?;
        let mut manager = Self::new(Arc::new(DefaultRunConfigurationProvider::new(Arc::clone(
            &store,
        ))));
        if settings.spark_enabled {
            manager.register_provider(Arc::new(SparkRunConfigurationProvider::new(
                store,
                Arc::new(SparkRunConfigurationExecutor::new()),
            )));
        }
        log::info!(
            "Run configuration registry ready with types {:?}",
            manager.get_types()
        );
        Ok(manager)
    }

    /// Register a provider, replacing any provider of the same type
    ///
    /// A provider of the default provider's type replaces the default.
    pub fn register_provider(&mut self, provider: Arc<dyn RunConfigurationProvider>) {
        let config_type = provider.config_type().to_string();
        if config_type == self.default_provider.config_type() {
            log::debug!("Replacing default run configuration provider '{}'", config_type);
            self.default_provider = provider;
            return;
        }

        match self
            .providers
            .iter_mut()
            .find(|p| p.config_type() == config_type)
        {
            Some(existing) => {
                log::debug!("Replacing run configuration provider '{}'", config_type);
                *existing = provider;
            }
            None => {
                log::debug!("Registered run configuration provider '{}'", config_type);
                self.providers.push(provider);
            }
        }
    }

    /// The default provider
    pub fn default_provider(&self) -> &Arc<dyn RunConfigurationProvider> {
        &self.default_provider
    }

    /// All providers, default first
    pub fn providers(&self) -> Vec<Arc<dyn RunConfigurationProvider>> {
        self.listing_order().cloned().collect()
    }

    /// The provider owning a type
    pub fn get_provider(&self, config_type: &str) -> Option<&Arc<dyn RunConfigurationProvider>> {
        self.listing_order()
            .find(|provider| provider.config_type() == config_type)
    }

    fn listing_order(&self) -> impl Iterator<Item = &Arc<dyn RunConfigurationProvider>> {
        std::iter::once(&self.default_provider).chain(self.providers.iter())
    }

    fn lookup_order(&self) -> impl Iterator<Item = &Arc<dyn RunConfigurationProvider>> {
        self.providers
            .iter()
            .chain(std::iter::once(&self.default_provider))
    }

    /// Persist a configuration through the provider owning its type
    pub fn save(&self, configuration: &RunConfiguration) -> Result<()> {
        let provider = self.get_provider(&configuration.config_type).ok_or_else(|| {
            RunConfigurationError::ProviderNotRegistered(configuration.config_type.clone())
        })?;
        provider.save(configuration)
    }

    /// Every configuration of every provider, default first
    pub fn load(&self) -> Result<Vec<RunConfiguration>> {
        let mut configurations = Vec::new();
        for provider in self.listing_order() {
            configurations.extend(provider.load()?);
        }
        Ok(configurations)
    }

    /// The configuration with this name, if any provider owns one
    pub fn load_by_name(&self, name: &str) -> Result<Option<RunConfiguration>> {
        for provider in self.lookup_order() {
            if let Some(configuration) = provider.load_by_name(name)? {
                return Ok(Some(configuration));
            }
        }
        Ok(None)
    }

    /// Delete the configuration with this name
    ///
    /// The first provider in lookup order holding the name removes it.
    /// Returns whether a configuration was removed; unknown names are a no-op.
    pub fn delete(&self, name: &str) -> Result<bool> {
        for provider in self.lookup_order() {
            if provider.delete(name)? {
                return Ok(true);
            }
        }
        log::debug!("No run configuration named '{}' to delete", name);
        Ok(false)
    }

    /// Type tags of all providers, default first
    pub fn get_types(&self) -> Vec<String> {
        self.listing_order()
            .map(|provider| provider.config_type().to_string())
            .collect()
    }

    /// Names of every configuration of every provider, default first
    pub fn get_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for provider in self.listing_order() {
            names.extend(provider.names()?);
        }
        Ok(names)
    }

    /// The canonical configuration of a type
    pub fn get_run_configuration_by_type(
        &self,
        config_type: &str,
    ) -> Result<Option<RunConfiguration>> {
        self.get_provider(config_type)
            .map(|provider| provider.configuration())
            .transpose()
    }

    /// The executor for a type
    pub fn get_executor(&self, config_type: &str) -> Result<Arc<dyn RunConfigurationExecutor>> {
        self.get_provider(config_type)
            .map(|provider| provider.executor())
            .ok_or_else(|| RunConfigurationError::ExecutorNotRegistered(config_type.to_string()))
    }

    /// Apply the named configuration to `execution` through its type's executor
    ///
    /// Returns `Ok(false)` when no configuration has that name.
    pub fn prepare_execution(
        &self,
        name: &str,
        execution: &mut ExecutionConfiguration,
    ) -> Result<bool> {
        let Some(configuration) = self.load_by_name(name)? else {
            return Ok(false);
        };
        self.get_executor(&configuration.config_type)?
            .execute(&configuration, execution)?;
        Ok(true)
    }
}
