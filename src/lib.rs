//! # Endpoint Router
//!
//! Client-side instance selection: given the candidate endpoints a discovery
//! collaborator produced for one request, pick exactly one of them according
//! to a pluggable strategy.
//!
//! ## Strategies
//! - Random
//! - Round robin
//! - Weighted round robin (`weight` metadata)
//! - Least connections (`activeConnections` metadata)
//! - Response time weighted (`avgResponseTime` metadata)
//!
//! Missing or malformed metadata never fails a selection; documented defaults
//! are substituted and the problem is reported to the injected
//! [`SelectionObserver`]. The [`Router`] additionally contains any failure of
//! the active strategy and falls back to the first candidate, so a non-empty
//! candidate list always yields an endpoint.
//!
//! ```
//! use endpoint_router::{Endpoint, Router};
//!
//! let router = Router::weighted_round_robin();
//! let candidates = vec![
//!     Endpoint::new("a", "10.0.0.1", 8080).with_metadata("weight", "1"),
//!     Endpoint::new("b", "10.0.0.2", 8080).with_metadata("weight", "3"),
//! ];
//!
//! let chosen = router.choose(&candidates).expect("non-empty input");
//! assert!(candidates.iter().any(|e| e.id == chosen.id));
//! assert!(router.choose(&[]).is_none());
//! ```

/// Error types, configuration, and the endpoint record
pub mod core;

/// Selection strategies, metadata parsing and the router
pub mod load_balancing;

/// Diagnostics capability and logging setup
pub mod observability;

pub use crate::core::config::RouterConfig;
pub use crate::core::error::{RouterError, RouterResult};
pub use crate::core::types::Endpoint;
pub use load_balancing::{BalancingStrategy, Router, RouterStats, StrategyKind};
pub use observability::{NoopObserver, SelectionObserver, TracingObserver};
