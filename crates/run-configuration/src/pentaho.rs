//! The default ("Pentaho") run configuration type
//!
//! Its provider always lists a built-in local configuration that cannot be
//! overwritten or deleted.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::configuration::{RunConfiguration, TypedRunConfiguration};
use crate::error::{Result, RunConfigurationError};
use crate::executor::{ExecutionConfiguration, RunConfigurationExecutor};
use crate::provider::{MetaStoreProvider, RunConfigurationProvider};
use crate::store::MetaStore;

/// Name of the built-in local configuration
pub const DEFAULT_CONFIG_NAME: &str = "Pentaho local";

const DEFAULT_CONFIG_DESCRIPTION: &str = "Runs your transformations and jobs locally";

/// Run on this host, on a slave server, or on a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultRunConfiguration {
    pub name: String,
    pub description: String,
    pub local: bool,
    pub remote: bool,
    /// Slave server name, required when `remote` is set
    pub server: Option<String>,
    pub clustered: bool,
    pub send_resources: bool,
    pub log_remote_execution_locally: bool,
    pub show_transformations: bool,
}

impl Default for DefaultRunConfiguration {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            local: true,
            remote: false,
            server: None,
            clustered: false,
            send_resources: false,
            log_remote_execution_locally: false,
            show_transformations: false,
        }
    }
}

impl DefaultRunConfiguration {
    /// The built-in local configuration
    pub fn builtin() -> Self {
        Self {
            name: DEFAULT_CONFIG_NAME.to_string(),
            description: DEFAULT_CONFIG_DESCRIPTION.to_string(),
            ..Self::default()
        }
    }

    /// A configuration running on the named slave server
    pub fn remote(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: false,
            remote: true,
            server: Some(server.into()),
            ..Self::default()
        }
    }
}

impl TypedRunConfiguration for DefaultRunConfiguration {
    const TYPE: &'static str = "Pentaho";

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Executor for `DefaultRunConfiguration`
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRunConfigurationExecutor;

impl DefaultRunConfigurationExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl RunConfigurationExecutor for DefaultRunConfigurationExecutor {
    fn execute(
        &self,
        configuration: &RunConfiguration,
        execution: &mut ExecutionConfiguration,
    ) -> Result<()> {
        let typed: DefaultRunConfiguration = configuration.to_typed()?;
        let remote_server = if typed.remote {
            let server = typed
                .server
                .as_deref()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    RunConfigurationError::invalid(&typed.name, "remote execution needs a server")
                })?;
            Some(server.to_string())
        } else {
            None
        };

        execution.run_configuration = Some(typed.name.clone());
        execution.execute_locally = typed.local;
        execution.execute_remotely = typed.remote;
        execution.clustered = typed.clustered;
        execution.pass_export = remote_server.is_some() && typed.send_resources;
        execution.remote_server = remote_server;
        execution.log_remote_execution_locally = false;
        execution.show_transformations = false;

        if typed.clustered {
            execution.execute_locally = false;
            execution.pass_export = typed.send_resources;
            execution.log_remote_execution_locally = typed.log_remote_execution_locally;
            execution.show_transformations = typed.show_transformations;
        }

        log::debug!(
            "Applied run configuration '{}' (local: {}, remote: {}, clustered: {})",
            typed.name,
            execution.execute_locally,
            execution.execute_remotely,
            execution.clustered
        );
        Ok(())
    }
}

/// Provider of "Pentaho" configurations, including the built-in local one
pub struct DefaultRunConfigurationProvider {
    inner: MetaStoreProvider<DefaultRunConfiguration>,
}

impl DefaultRunConfigurationProvider {
    pub fn new(store: Arc<dyn MetaStore>) -> Self {
        Self::with_executor(store, Arc::new(DefaultRunConfigurationExecutor::new()))
    }

    pub fn with_executor(
        store: Arc<dyn MetaStore>,
        executor: Arc<dyn RunConfigurationExecutor>,
    ) -> Self {
        Self {
            inner: MetaStoreProvider::new(store, executor),
        }
    }

    fn builtin() -> Result<RunConfiguration> {
        RunConfiguration::from_typed(&DefaultRunConfiguration::builtin())
    }
}

impl RunConfigurationProvider for DefaultRunConfigurationProvider {
    fn config_type(&self) -> &str {
        DefaultRunConfiguration::TYPE
    }

    fn configuration(&self) -> Result<RunConfiguration> {
        self.inner.configuration()
    }

    fn save(&self, configuration: &RunConfiguration) -> Result<()> {
        if configuration.name == DEFAULT_CONFIG_NAME {
            log::debug!("Ignoring save of built-in run configuration '{}'", DEFAULT_CONFIG_NAME);
            return Ok(());
        }
        self.inner.save(configuration)
    }

    fn load(&self) -> Result<Vec<RunConfiguration>> {
        let mut configurations = vec![Self::builtin()?];
        configurations.extend(
            self.inner
                .load()?
                .into_iter()
                .filter(|c| c.name != DEFAULT_CONFIG_NAME),
        );
        Ok(configurations)
    }

    fn load_by_name(&self, name: &str) -> Result<Option<RunConfiguration>> {
        if name == DEFAULT_CONFIG_NAME {
            return Self::builtin().map(Some);
        }
        self.inner.load_by_name(name)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        if name == DEFAULT_CONFIG_NAME {
            log::debug!("Ignoring delete of built-in run configuration '{}'", DEFAULT_CONFIG_NAME);
            return Ok(false);
        }
        self.inner.delete(name)
    }

    fn names(&self) -> Result<Vec<String>> {
        let mut names = vec![DEFAULT_CONFIG_NAME.to_string()];
        names.extend(
            self.inner
                .names()?
                .into_iter()
                .filter(|n| n != DEFAULT_CONFIG_NAME),
        );
        Ok(names)
    }

    fn executor(&self) -> Arc<dyn RunConfigurationExecutor> {
        self.inner.executor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryMetaStore;

    fn provider() -> DefaultRunConfigurationProvider {
        DefaultRunConfigurationProvider::new(Arc::new(MemoryMetaStore::new()))
    }

    #[test]
    fn test_builtin_is_always_listed_first() {
        let provider = provider();
        assert_eq!(provider.names().unwrap(), vec![DEFAULT_CONFIG_NAME]);

        let stored = DefaultRunConfiguration::remote("remote box", "slave-1");
        provider
            .save(&RunConfiguration::from_typed(&stored).unwrap())
            .unwrap();

        let loaded = provider.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, DEFAULT_CONFIG_NAME);
        assert_eq!(loaded[1].name, "remote box");
    }

    #[test]
    fn test_builtin_cannot_be_overwritten_or_deleted() {
        let provider = provider();
        let mut hijack = DefaultRunConfiguration::remote(DEFAULT_CONFIG_NAME, "elsewhere");
        hijack.description = "changed".to_string();
        provider
            .save(&RunConfiguration::from_typed(&hijack).unwrap())
            .unwrap();

        let builtin: DefaultRunConfiguration = provider
            .load_by_name(DEFAULT_CONFIG_NAME)
            .unwrap()
            .unwrap()
            .to_typed()
            .unwrap();
        assert!(builtin.local);
        assert!(builtin.server.is_none());

        assert!(!provider.delete(DEFAULT_CONFIG_NAME).unwrap());
        assert_eq!(provider.load().unwrap().len(), 1);
    }

    #[test]
    fn test_execute_local() {
        let config = RunConfiguration::from_typed(&DefaultRunConfiguration::builtin()).unwrap();
        let mut execution = ExecutionConfiguration::new();
        DefaultRunConfigurationExecutor::new()
            .execute(&config, &mut execution)
            .unwrap();

        assert!(execution.execute_locally);
        assert!(!execution.execute_remotely);
        assert_eq!(execution.run_configuration.as_deref(), Some(DEFAULT_CONFIG_NAME));
    }

    #[test]
    fn test_execute_remote() {
        let mut remote = DefaultRunConfiguration::remote("remote box", "slave-1");
        remote.send_resources = true;
        let config = RunConfiguration::from_typed(&remote).unwrap();

        let mut execution = ExecutionConfiguration::new();
        DefaultRunConfigurationExecutor::new()
            .execute(&config, &mut execution)
            .unwrap();

        assert!(!execution.execute_locally);
        assert!(execution.execute_remotely);
        assert_eq!(execution.remote_server.as_deref(), Some("slave-1"));
        assert!(execution.pass_export);
    }

    #[test]
    fn test_execute_clustered() {
        let clustered = DefaultRunConfiguration {
            name: "cluster".to_string(),
            clustered: true,
            show_transformations: true,
            ..DefaultRunConfiguration::default()
        };
        let config = RunConfiguration::from_typed(&clustered).unwrap();

        let mut execution = ExecutionConfiguration::new();
        DefaultRunConfigurationExecutor::new()
            .execute(&config, &mut execution)
            .unwrap();

        assert!(execution.clustered);
        assert!(!execution.execute_locally);
        assert!(execution.show_transformations);
    }

    #[test]
    fn test_execute_remote_without_server_fails() {
        let mut remote = DefaultRunConfiguration::remote("nowhere", "");
        remote.server = None;
        let config = RunConfiguration::from_typed(&remote).unwrap();

        let mut execution = ExecutionConfiguration::new();
        execution.set_variable("kept", "yes");
        let before = execution.clone();

        let err = DefaultRunConfigurationExecutor::new()
            .execute(&config, &mut execution)
            .unwrap_err();
        assert!(matches!(err, RunConfigurationError::InvalidConfiguration { .. }));
        assert_eq!(execution, before);
    }
}
