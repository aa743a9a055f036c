//! Run Configuration - registry of named execution profiles
//!
//! A run configuration describes where and how a job executes. Every
//! configuration type is owned by one provider, which persists it and
//! supplies the executor that applies it. This crate provides:
//!
//! - `RunConfigurationManager`, the registry routing by type and name
//! - The default "Pentaho" type with its built-in local configuration
//! - The "Spark" type, pointing jobs at a remote engine
//! - In-memory and directory-backed configuration stores
//!
//! # Example
//!
//! ```ignore
//! use run_configuration::{RegistrySettings, RunConfigurationManager, SparkRunConfiguration};
//!
//! let manager = RunConfigurationManager::from_settings(&RegistrySettings::load("settings.json")?)?;
//! manager.save(&RunConfiguration::from_typed(&SparkRunConfiguration::new("cluster", "spark:53000"))?)?;
//! ```

pub mod configuration;
pub mod error;
pub mod executor;
pub mod manager;
pub mod pentaho;
pub mod provider;
pub mod settings;
pub mod spark;
pub mod store;

// Re-export key types
pub use configuration::{RunConfiguration, TypedRunConfiguration};
pub use error::{Result, RunConfigurationError, StoreError};
pub use executor::{ExecutionConfiguration, RunConfigurationExecutor};
pub use manager::RunConfigurationManager;
pub use pentaho::{
    DefaultRunConfiguration, DefaultRunConfigurationExecutor, DefaultRunConfigurationProvider,
    DEFAULT_CONFIG_NAME,
};
pub use provider::{MetaStoreProvider, RunConfigurationProvider};
pub use settings::RegistrySettings;
pub use spark::{
    EngineAddress, SparkRunConfiguration, SparkRunConfigurationExecutor,
    SparkRunConfigurationProvider, DEFAULT_SPARK_PORT,
};
pub use store::{FileMetaStore, MemoryMetaStore, MetaStore, StoreResult};
