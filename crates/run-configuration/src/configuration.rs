//! Run configuration records
//!
//! The registry moves configurations around as `RunConfiguration`: a name,
//! a type tag and an open map of type-specific settings. Each provider
//! works with its own strongly typed struct and converts at the boundary.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RunConfigurationError};

/// A named execution profile of some type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfiguration {
    /// Unique name across all providers
    pub name: String,
    /// Type tag of the owning provider
    #[serde(rename = "type")]
    pub config_type: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Type-specific fields
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

/// A strongly typed run configuration owned by one provider
pub trait TypedRunConfiguration:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// Type tag shared by every configuration of this kind
    const TYPE: &'static str;

    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);

    fn description(&self) -> &str;
}

impl RunConfiguration {
    /// Create an empty configuration of the given type
    pub fn new(name: impl Into<String>, config_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_type: config_type.into(),
            description: String::new(),
            settings: serde_json::Map::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set one type-specific field
    pub fn with_setting(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Whether this configuration is of type `T`
    pub fn is<T: TypedRunConfiguration>(&self) -> bool {
        self.config_type == T::TYPE
    }

    /// Convert a typed configuration into a registry record
    pub fn from_typed<T: TypedRunConfiguration>(typed: &T) -> Result<Self> {
        let mut settings = match serde_json::to_value(typed)? {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(RunConfigurationError::invalid(
                    typed.name(),
                    format!("expected an object, serialized to {}", other),
                ))
            }
        };
        settings.remove("name");
        settings.remove("description");

        Ok(Self {
            name: typed.name().to_string(),
            config_type: T::TYPE.to_string(),
            description: typed.description().to_string(),
            settings,
        })
    }

    /// Convert this record into the typed configuration `T`
    ///
    /// Fails with `TypeMismatch` when the record belongs to another type.
    pub fn to_typed<T: TypedRunConfiguration>(&self) -> Result<T> {
        if !self.is::<T>() {
            return Err(RunConfigurationError::TypeMismatch {
                name: self.name.clone(),
                expected: T::TYPE.to_string(),
                actual: self.config_type.clone(),
            });
        }
        let mut object = self.settings.clone();
        object.insert("name".to_string(), self.name.clone().into());
        object.insert("description".to_string(), self.description.clone().into());
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pentaho::DefaultRunConfiguration;
    use crate::spark::SparkRunConfiguration;

    #[test]
    fn test_typed_round_trip_keeps_fields() {
        let spark = SparkRunConfiguration {
            name: "Spark Configuration".to_string(),
            description: "Spark Configuration Description".to_string(),
            url: "127.0.0.1".to_string(),
        };

        let record = RunConfiguration::from_typed(&spark).unwrap();
        assert_eq!(record.config_type, "Spark");
        assert_eq!(record.settings["url"], "127.0.0.1");
        assert!(!record.settings.contains_key("name"));

        let back: SparkRunConfiguration = record.to_typed().unwrap();
        assert_eq!(back.url, "127.0.0.1");
        assert_eq!(back.description, "Spark Configuration Description");
    }

    #[test]
    fn test_type_mismatch() {
        let record = RunConfiguration::new("cluster", SparkRunConfiguration::TYPE);
        let err = record.to_typed::<DefaultRunConfiguration>().unwrap_err();
        assert!(matches!(err, RunConfigurationError::TypeMismatch { .. }));
    }

    #[test]
    fn test_missing_settings_take_defaults() {
        let record = RunConfiguration::new("bare", DefaultRunConfiguration::TYPE)
            .with_description("no settings at all");
        let typed: DefaultRunConfiguration = record.to_typed().unwrap();
        assert!(typed.local);
        assert!(!typed.remote);
        assert_eq!(typed.description, "no settings at all");
    }

    #[test]
    fn test_record_serialization_uses_type_key() {
        let record = RunConfiguration::new("a", "Spark")
            .with_setting("url", serde_json::json!("http://spark:53000"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Spark");
        assert_eq!(json["settings"]["url"], "http://spark:53000");
    }
}
