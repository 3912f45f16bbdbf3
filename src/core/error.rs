//! # Error Handling Module
//!
//! This module defines the error types used by the endpoint router using the
//! `thiserror` crate.
//!
//! Selection itself never fails outward: `Router::choose` contains every
//! strategy failure and degrades to the first candidate. The error type exists
//! for the boundaries that genuinely can fail (configuration loading, request
//! target derivation) and as the explicit failure channel between a strategy
//! and the router. Reading and parsing configuration files surfaces the
//! underlying `Io`/`Yaml`/`Json` error through `?`.

use thiserror::Error;

/// Main result type used throughout the router
pub type RouterResult<T> = Result<T, RouterError>;

/// Error types for the endpoint router
///
/// The `#[error("...")]` attribute from `thiserror` implements `Display`
/// with the given message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// Configuration-related errors (invalid config, missing files, unknown strategy)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A selection strategy could not produce a result
    #[error("Selection failed ({strategy}): {message}")]
    Selection { strategy: String, message: String },

    /// An endpoint record cannot be turned into a request target
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Internal errors for unexpected failures
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// I/O errors (reading configuration files)
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Malformed JSON configuration
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Malformed YAML configuration
    #[error("YAML error: {message}")]
    Yaml { message: String },
}

impl RouterError {
    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a selection error attributed to a strategy
    pub fn selection<S: Into<String>, M: Into<String>>(strategy: S, message: M) -> Self {
        Self::Selection {
            strategy: strategy.into(),
            message: message.into(),
        }
    }

    /// Create an invalid endpoint error
    pub fn invalid_endpoint<S: Into<String>, R: Into<String>>(endpoint: S, reason: R) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error with a custom message
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get a string representation of the error type for logs and metrics labels
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration_error",
            Self::Selection { .. } => "selection_error",
            Self::InvalidEndpoint { .. } => "invalid_endpoint",
            Self::Internal { .. } => "internal_error",
            Self::Io { .. } => "io_error",
            Self::Json { .. } => "json_error",
            Self::Yaml { .. } => "yaml_error",
        }
    }
}

impl From<std::io::Error> for RouterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for RouterError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml {
            message: err.to_string(),
        }
    }
}

/// Convenience macro for creating configuration errors
///
/// Usage: `config_error!("Unknown strategy: {}", name)`
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::core::error::RouterError::config(format!($($arg)*))
    };
}
