//! Metadata parsing with graceful defaults.
//!
//! An absent key yields the default silently. A present but unparseable value
//! yields the default and is reported to the observer.

use crate::core::types::{Endpoint, ACTIVE_CONNECTIONS_KEY, AVG_RESPONSE_TIME_KEY, WEIGHT_KEY};
use crate::observability::SelectionObserver;

pub const DEFAULT_WEIGHT: u64 = 1;
pub const DEFAULT_ACTIVE_CONNECTIONS: u64 = 0;
pub const DEFAULT_AVG_RESPONSE_TIME_MS: u64 = 100;

/// Static weight of `endpoint`
pub fn weight(endpoint: &Endpoint, observer: &dyn SelectionObserver) -> u64 {
    parse_unsigned(endpoint, WEIGHT_KEY, DEFAULT_WEIGHT, observer)
}

/// In-flight connection count of `endpoint`
pub fn active_connections(endpoint: &Endpoint, observer: &dyn SelectionObserver) -> u64 {
    parse_unsigned(endpoint, ACTIVE_CONNECTIONS_KEY, DEFAULT_ACTIVE_CONNECTIONS, observer)
}

/// Average response time of `endpoint` in milliseconds, never below 1
pub fn avg_response_time(endpoint: &Endpoint, observer: &dyn SelectionObserver) -> u64 {
    let Some(raw) = endpoint.metadata_value(AVG_RESPONSE_TIME_KEY) else {
        return DEFAULT_AVG_RESPONSE_TIME_MS;
    };

    match raw.trim().parse::<i64>() {
        Ok(ms) if ms <= 0 => 1,
        Ok(ms) => ms as u64,
        Err(_) => {
            observer.malformed_metadata(
                endpoint,
                AVG_RESPONSE_TIME_KEY,
                raw,
                DEFAULT_AVG_RESPONSE_TIME_MS,
            );
            DEFAULT_AVG_RESPONSE_TIME_MS
        }
    }
}

fn parse_unsigned(
    endpoint: &Endpoint,
    key: &str,
    default: u64,
    observer: &dyn SelectionObserver,
) -> u64 {
    match endpoint.metadata_value(key) {
        None => default,
        Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
            observer.malformed_metadata(endpoint, key, raw, default);
            default
        }),
    }
}
