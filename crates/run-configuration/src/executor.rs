//! Executors that turn a run configuration into execution settings

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::configuration::RunConfiguration;
use crate::error::Result;

/// Settings an execution front end assembles before launching a job or
/// transformation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionConfiguration {
    /// Name of the run configuration applied last
    pub run_configuration: Option<String>,
    pub execute_locally: bool,
    pub execute_remotely: bool,
    pub clustered: bool,
    /// Slave server used for remote execution
    pub remote_server: Option<String>,
    /// Ship the job and its resources to the remote server
    pub pass_export: bool,
    pub log_remote_execution_locally: bool,
    pub show_transformations: bool,
    /// Variables handed to the running job
    pub variables: BTreeMap<String, String>,
}

impl Default for ExecutionConfiguration {
    fn default() -> Self {
        Self {
            run_configuration: None,
            execute_locally: true,
            execute_remotely: false,
            clustered: false,
            remote_server: None,
            pass_export: false,
            log_remote_execution_locally: false,
            show_transformations: false,
            variables: BTreeMap::new(),
        }
    }
}

impl ExecutionConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one variable, replacing any previous value
    pub fn set_variable(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn variable(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// Applies configurations of one type to an execution
pub trait RunConfigurationExecutor: Send + Sync {
    /// Fill `execution` from `configuration`
    ///
    /// Fails when the configuration is of a type this executor does not
    /// handle, or cannot be executed as it stands.
    fn execute(
        &self,
        configuration: &RunConfiguration,
        execution: &mut ExecutionConfiguration,
    ) -> Result<()>;
}
