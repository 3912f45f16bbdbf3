//! # Configuration Module
//!
//! Router configuration: which strategy to start with and how to log.
//!
//! ## Key Features
//! - YAML/JSON configuration parsing with serde
//! - Environment variable override support (`ROUTER_*`)
//! - Validation with detailed error messages

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::RouterResult;
use crate::load_balancing::strategies::StrategyKind;
use crate::observability::config::{LogConfig, LogFormat, LOG_LEVELS};

/// Environment variable overriding `strategy`
pub const ENV_STRATEGY: &str = "ROUTER_STRATEGY";
/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "ROUTER_LOG_LEVEL";
/// Environment variable overriding `logging.format`
pub const ENV_LOG_FORMAT: &str = "ROUTER_LOG_FORMAT";

/// Main router configuration structure
///
/// Every field has a default, so an empty document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Strategy installed when the router is created
    pub strategy: StrategyKind,

    /// Logging settings
    pub logging: LogConfig,
}

impl RouterConfig {
    /// Load configuration from a YAML file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> RouterResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;

        Self::from_yaml_str(&content)
    }

    /// Load configuration from a JSON file
    pub async fn load_from_json<P: AsRef<Path>>(path: P) -> RouterResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;

        Self::from_json_str(&content)
    }

    /// Load from either format, picked by file extension
    pub async fn load<P: AsRef<Path>>(path: P) -> RouterResult<Self> {
        if path.as_ref().extension().and_then(|s| s.to_str()) == Some("json") {
            Self::load_from_json(path).await
        } else {
            Self::load_from_file(path).await
        }
    }

    /// Parse YAML, apply environment overrides and validate
    pub fn from_yaml_str(content: &str) -> RouterResult<Self> {
        let mut config: RouterConfig = if content.trim().is_empty() {
            RouterConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON, apply environment overrides and validate
    pub fn from_json_str(content: &str) -> RouterResult<Self> {
        let mut config: RouterConfig = serde_json::from_str(content)?;

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    ///
    /// Variables follow the pattern `ROUTER_<FIELD>`, for example
    /// `ROUTER_STRATEGY=least_connections`.
    pub fn apply_env_overrides(&mut self) -> RouterResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides<F>(&mut self, lookup: F) -> RouterResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(strategy) = lookup(ENV_STRATEGY) {
            self.strategy = strategy
                .parse()
                .map_err(|e| crate::config_error!("Invalid {}: {}", ENV_STRATEGY, e))?;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "text" => LogFormat::Text,
                other => {
                    return Err(crate::config_error!("Invalid {}: {}", ENV_LOG_FORMAT, other))
                }
            };
        }

        Ok(())
    }

    /// Configuration validation with detailed error messages
    pub fn validate(&self) -> RouterResult<()> {
        let mut errors = Vec::new();

        if !self.logging.has_valid_level() {
            errors.push(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            ));
        }

        if !errors.is_empty() {
            return Err(crate::config_error!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.strategy, StrategyKind::RoundRobin);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let config: RouterConfig = serde_yaml::from_str(
            "strategy: weighted_round_robin\nlogging:\n  level: debug\n  format: text\n",
        )
        .unwrap();

        assert_eq!(config.strategy, StrategyKind::WeightedRoundRobin);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: RouterConfig = serde_json::from_str(r#"{"strategy":"random"}"#).unwrap();
        assert_eq!(config.strategy, StrategyKind::Random);
        assert_eq!(config.logging, LogConfig::default());
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        assert!(serde_yaml::from_str::<RouterConfig>("strategy: fastest\n").is_err());
    }

    #[test]
    fn test_malformed_documents_report_their_format() {
        let err = RouterConfig::from_yaml_str("strategy: [round_robin\n").unwrap_err();
        assert_eq!(err.error_type(), "yaml_error");

        let err = RouterConfig::from_json_str(r#"{"strategy": "#).unwrap_err();
        assert_eq!(err.error_type(), "json_error");

        let err = RouterConfig::from_yaml_str("strategy: fastest\n").unwrap_err();
        assert_eq!(err.error_type(), "yaml_error");
    }

    #[test]
    fn test_overrides() {
        let mut config = RouterConfig::default();
        config
            .apply_overrides(lookup(&[
                (ENV_STRATEGY, "least-connections"),
                (ENV_LOG_LEVEL, "warn"),
                (ENV_LOG_FORMAT, "TEXT"),
            ]))
            .unwrap();

        assert_eq!(config.strategy, StrategyKind::LeastConnections);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_invalid_overrides() {
        let mut config = RouterConfig::default();
        assert!(config
            .apply_overrides(lookup(&[(ENV_STRATEGY, "fastest")]))
            .is_err());
        assert!(config
            .apply_overrides(lookup(&[(ENV_LOG_FORMAT, "xml")]))
            .is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_level() {
        let config = RouterConfig {
            logging: LogConfig {
                level: "chatty".to_string(),
                format: LogFormat::Json,
            },
            ..RouterConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chatty"));
    }
}
