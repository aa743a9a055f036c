//! The "Spark" run configuration type

use serde::{Deserialize, Serialize};

use crate::configuration::{RunConfiguration, TypedRunConfiguration};
use crate::error::{Result, RunConfigurationError};
use crate::executor::{ExecutionConfiguration, RunConfigurationExecutor};
use crate::provider::MetaStoreProvider;

/// Port of the remote engine when the url does not name one
pub const DEFAULT_SPARK_PORT: u16 = 53000;

const DEFAULT_SCHEME: &str = "http";

/// Run on a remote Spark engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SparkRunConfiguration {
    pub name: String,
    pub description: String,
    /// Engine address, `[scheme://]host[:port]`
    pub url: String,
}

impl SparkRunConfiguration {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            url: url.into(),
        }
    }
}

impl TypedRunConfiguration for SparkRunConfiguration {
    const TYPE: &'static str = "Spark";

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

/// Provider of "Spark" configurations
pub type SparkRunConfigurationProvider = MetaStoreProvider<SparkRunConfiguration>;

/// Parsed engine address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineAddress {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl EngineAddress {
    /// Parse `[scheme://]host[:port]`, ignoring any trailing path
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        let (scheme, rest) = match url.split_once("://") {
            Some((scheme, rest)) if !scheme.is_empty() => (scheme, rest),
            Some(_) => return None,
            None => (DEFAULT_SCHEME, url),
        };
        let authority = rest.split('/').next().unwrap_or_default();
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (host, port.parse().ok()?),
            None => (authority, DEFAULT_SPARK_PORT),
        };
        if host.is_empty() {
            return None;
        }
        Some(Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port,
        })
    }
}

/// Executor for `SparkRunConfiguration`
///
/// Runs the job locally and points its transformations at the remote engine
/// through variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct SparkRunConfigurationExecutor;

impl SparkRunConfigurationExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl RunConfigurationExecutor for SparkRunConfigurationExecutor {
    fn execute(
        &self,
        configuration: &RunConfiguration,
        execution: &mut ExecutionConfiguration,
    ) -> Result<()> {
        let typed: SparkRunConfiguration = configuration.to_typed()?;
        let address = EngineAddress::parse(&typed.url).ok_or_else(|| {
            RunConfigurationError::invalid(
                &typed.name,
                format!("cannot parse engine url '{}'", typed.url),
            )
        })?;

        execution.run_configuration = Some(typed.name.clone());
        execution.execute_locally = true;
        execution.execute_remotely = false;
        execution.clustered = false;

        execution.set_variable("engine", "remote");
        execution.set_variable("engine.remote", "spark");
        execution.set_variable("engine.scheme", address.scheme.as_str());
        execution.set_variable("engine.url", typed.url.trim());
        execution.set_variable("engine.host", address.host.as_str());
        execution.set_variable("engine.port", address.port.to_string());

        log::debug!(
            "Applied spark run configuration '{}' ({}://{}:{})",
            typed.name,
            address.scheme,
            address.host,
            address.port
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_engine_address() {
        assert_eq!(
            EngineAddress::parse("127.0.0.1"),
            Some(EngineAddress {
                scheme: "http".to_string(),
                host: "127.0.0.1".to_string(),
                port: DEFAULT_SPARK_PORT,
            })
        );
        assert_eq!(
            EngineAddress::parse("https://spark.example.com:8443/engine"),
            Some(EngineAddress {
                scheme: "https".to_string(),
                host: "spark.example.com".to_string(),
                port: 8443,
            })
        );
        assert!(EngineAddress::parse("").is_none());
        assert!(EngineAddress::parse("host:notaport").is_none());
        assert!(EngineAddress::parse("://host").is_none());
    }

    #[test]
    fn test_execute_sets_engine_variables() {
        let config =
            RunConfiguration::from_typed(&SparkRunConfiguration::new("cluster", "10.0.0.5:9000"))
                .unwrap();
        let mut execution = ExecutionConfiguration::new();
        execution.execute_remotely = true;

        SparkRunConfigurationExecutor::new()
            .execute(&config, &mut execution)
            .unwrap();

        assert!(execution.execute_locally);
        assert!(!execution.execute_remotely);
        assert_eq!(execution.variable("engine"), Some("remote"));
        assert_eq!(execution.variable("engine.remote"), Some("spark"));
        assert_eq!(execution.variable("engine.scheme"), Some("http"));
        assert_eq!(execution.variable("engine.host"), Some("10.0.0.5"));
        assert_eq!(execution.variable("engine.port"), Some("9000"));
        assert_eq!(execution.variable("engine.url"), Some("10.0.0.5:9000"));
    }

    #[test]
    fn test_execute_rejects_bad_url() {
        let config =
            RunConfiguration::from_typed(&SparkRunConfiguration::new("broken", "")).unwrap();
        let err = SparkRunConfigurationExecutor::new()
            .execute(&config, &mut ExecutionConfiguration::new())
            .unwrap_err();
        assert!(matches!(err, RunConfigurationError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_execute_rejects_other_types() {
        let config = RunConfiguration::new("local", "Pentaho");
        let err = SparkRunConfigurationExecutor::new()
            .execute(&config, &mut ExecutionConfiguration::new())
            .unwrap_err();
        assert!(matches!(err, RunConfigurationError::TypeMismatch { .. }));
    }
}
