//! Analyzer configuration
//!
//! Loaded from JSON; every section falls back to its defaults when omitted.

use crate::registration::RegistrationApiConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use singleton_audit_core::{ConfigError, ImmutabilityConfig};
use std::path::Path;
use thiserror::Error;

/// Invalid section of an [`AnalyzerConfig`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzerConfigError {
    #[error("invalid immutability policy: {0}")]
    Immutability(#[source] ConfigError),

    #[error("invalid registration API description: {0}")]
    Registration(#[source] ConfigError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub immutability: ImmutabilityConfig,
    pub registration: RegistrationApiConfig,
}

impl AnalyzerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("failed to parse analyzer configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), AnalyzerConfigError> {
        self.immutability
            .validate()
            .map_err(AnalyzerConfigError::Immutability)?;
        self.registration
            .validate()
            .map_err(AnalyzerConfigError::Registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::ObjectScope;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config = AnalyzerConfig::from_json("{}").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
    }

    #[test]
    fn test_partial_registration_section() {
        let config = AnalyzerConfig::from_json(
            r#"{
                "registration": {
                    "object_scope_type": "Container.Lifetime",
                    "scope_members": { "Shared": "Singleton", "PerCall": "Transient" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.registration.object_scope_type, "Container.Lifetime");
        assert_eq!(config.registration.scope_members.get("Shared"), Some(&ObjectScope::Singleton));
        assert_eq!(
            config.registration.registry_types,
            RegistrationApiConfig::default().registry_types
        );
        assert_eq!(config.immutability, ImmutabilityConfig::default());
    }

    #[test]
    fn test_validation_names_the_section() {
        let mut config = AnalyzerConfig::default();
        config.registration.registry_types.push(" ".to_string());
        assert_eq!(
            config.validate(),
            Err(AnalyzerConfigError::Registration(ConfigError::MalformedTypeName(" ".to_string())))
        );

        let err = AnalyzerConfig::from_json(r#"{ "immutability": { "mutable_collections": [""] } }"#).unwrap_err();
        assert!(err.to_string().contains("invalid immutability policy"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = AnalyzerConfig::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
