//! # Core Types Module
//!
//! The endpoint record consumed by every selection strategy. Endpoints are
//! produced by a discovery collaborator, handed to the router as a slice, and
//! never mutated by selection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use url::Url;

use crate::core::error::{RouterError, RouterResult};

/// Metadata key holding the static weight used by weighted round-robin
pub const WEIGHT_KEY: &str = "weight";

/// Metadata key holding the number of in-flight connections
pub const ACTIVE_CONNECTIONS_KEY: &str = "activeConnections";

/// Metadata key holding the average response time in milliseconds
pub const AVG_RESPONSE_TIME_KEY: &str = "avgResponseTime";

/// A candidate service instance
///
/// Metadata is sparse: any key may be absent, which is the normal case and
/// never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Unique instance identifier
    pub id: String,

    /// Host name or IP literal
    pub host: String,

    /// Port the instance listens on
    pub port: u16,

    /// Whether the instance expects TLS
    #[serde(default)]
    pub secure: bool,

    /// Free-form metadata published by discovery
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Endpoint {
    /// Create a plain-text endpoint with no metadata
    pub fn new<I: Into<String>, H: Into<String>>(id: I, host: H, port: u16) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            port,
            secure: false,
            metadata: HashMap::new(),
        }
    }

    /// Set the secure flag
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Add a metadata entry
    pub fn with_metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Look up a raw metadata value
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// URL scheme implied by the secure flag
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// `host:port`, bracketing IPv6 literals
    pub fn authority(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Build the request target for `path` on this endpoint
    ///
    /// `path` may carry a query string; a missing leading slash is tolerated.
    pub fn request_url(&self, path: &str) -> RouterResult<Url> {
        let base = Url::parse(&format!("{}://{}/", self.scheme(), self.authority()))
            .map_err(|e| RouterError::invalid_endpoint(&self.id, e.to_string()))?;

        base.join(path.trim_start_matches('/'))
            .map_err(|e| RouterError::invalid_endpoint(&self.id, e.to_string()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}://{}", self.id, self.scheme(), self.authority())
    }
}
