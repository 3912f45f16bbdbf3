//! # Selection Diagnostics
//!
//! Strategies and the router never log through a global directly. They report
//! through an injected [`SelectionObserver`], so the selection core can be
//! exercised in tests with a recording observer or with no output at all.
//!
//! [`TracingObserver`] is the production implementation: `tracing` events plus
//! `metrics` counters. Counters are no-ops until the embedding process installs
//! a metrics recorder.

use metrics::counter;
use tracing::{debug, error, warn};

use crate::core::error::RouterError;
use crate::core::types::Endpoint;

/// Receiver for everything noteworthy that happens during selection
///
/// Every method has an empty default body; implementors override only the
/// events they care about.
pub trait SelectionObserver: Send + Sync {
    /// A strategy picked `endpoint` through its primary algorithm
    fn selected(&self, _strategy: &str, _endpoint: &Endpoint) {}

    /// Selection was requested over an empty or absent candidate list
    ///
    /// Reported before any strategy is consulted.
    fn no_candidates(&self) {}

    /// A metadata value could not be parsed and `default` was used instead
    fn malformed_metadata(&self, _endpoint: &Endpoint, _key: &str, _raw: &str, _default: u64) {}

    /// The active strategy failed and the router fell back to `fallback`
    fn strategy_failed(&self, _strategy: &str, _error: &RouterError, _fallback: &Endpoint) {}
}

/// Observer that emits `tracing` events and `metrics` counters
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SelectionObserver for TracingObserver {
    fn selected(&self, strategy: &str, endpoint: &Endpoint) {
        counter!("router_selections_total", "strategy" => strategy.to_string()).increment(1);

        debug!(
            endpoint_id = %endpoint.id,
            endpoint_host = %endpoint.host,
            endpoint_port = endpoint.port,
            algorithm = strategy,
            "Selected endpoint"
        );
    }

    fn no_candidates(&self) {
        counter!("router_empty_selections_total").increment(1);

        debug!("No candidate endpoints available");
    }

    fn malformed_metadata(&self, endpoint: &Endpoint, key: &str, raw: &str, default: u64) {
        counter!("router_malformed_metadata_total", "key" => key.to_string()).increment(1);

        warn!(
            endpoint_id = %endpoint.id,
            key = key,
            raw_value = raw,
            default = default,
            "Unparseable endpoint metadata, using default"
        );
    }

    fn strategy_failed(&self, strategy: &str, err: &RouterError, fallback: &Endpoint) {
        counter!("router_fallback_selections_total", "strategy" => strategy.to_string())
            .increment(1);

        error!(
            algorithm = strategy,
            error = %err,
            error_type = err.error_type(),
            fallback_endpoint = %fallback.id,
            "Selection strategy failed, falling back to first candidate"
        );
    }
}

/// Observer that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {}
