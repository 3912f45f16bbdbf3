//! # Router
//!
//! The router owns the active [`BalancingStrategy`], delegates every selection
//! to it and applies the single fallback policy: whatever goes wrong inside the
//! strategy on a non-empty candidate list (an `Err`, a panic, an empty answer,
//! or an endpoint that is not one of the candidates), the first candidate is
//! returned and the failure is reported at error severity.
//!
//! The active strategy can be replaced at runtime. Readers clone the `Arc`
//! under a short read lock and select without holding it, so a call racing a
//! swap may run on either the old or the new strategy.

use metrics::counter;
use parking_lot::RwLock;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::core::config::RouterConfig;
use crate::core::error::RouterError;
use crate::core::types::Endpoint;
use crate::load_balancing::strategies::{BalancingStrategy, StrategyKind};
use crate::observability::{SelectionObserver, TracingObserver};

/// Point-in-time view of router activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterStats {
    pub strategy: String,
    pub total_requests: u64,
    pub successful_selections: u64,
    pub empty_selections: u64,
    pub fallback_selections: u64,
}

#[derive(Debug, Default)]
struct SelectionCounters {
    total_requests: AtomicU64,
    successful_selections: AtomicU64,
    empty_selections: AtomicU64,
    fallback_selections: AtomicU64,
}

impl SelectionCounters {
    fn reset(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.successful_selections.store(0, Ordering::Relaxed);
        self.empty_selections.store(0, Ordering::Relaxed);
        self.fallback_selections.store(0, Ordering::Relaxed);
    }
}

/// Client-side endpoint router
pub struct Router {
    active: RwLock<Arc<dyn BalancingStrategy>>,
    observer: Arc<dyn SelectionObserver>,
    counters: SelectionCounters,
}

impl Router {
    /// Create a router around `strategy`, reporting through `tracing`
    pub fn new(strategy: Arc<dyn BalancingStrategy>) -> Self {
        Self::with_observer(strategy, Arc::new(TracingObserver))
    }

    /// Create a router reporting through a custom observer
    pub fn with_observer(
        strategy: Arc<dyn BalancingStrategy>,
        observer: Arc<dyn SelectionObserver>,
    ) -> Self {
        Self {
            active: RwLock::new(strategy),
            observer,
            counters: SelectionCounters::default(),
        }
    }

    /// Create a router running a default-configured strategy of `kind`
    pub fn from_kind(kind: StrategyKind) -> Self {
        let observer: Arc<dyn SelectionObserver> = Arc::new(TracingObserver);
        Self::with_observer(kind.build(observer.clone()), observer)
    }

    /// Create a router from loaded configuration
    pub fn from_config(config: &RouterConfig) -> Self {
        Self::from_kind(config.strategy)
    }

    pub fn random() -> Self {
        Self::from_kind(StrategyKind::Random)
    }

    pub fn round_robin() -> Self {
        Self::from_kind(StrategyKind::RoundRobin)
    }

    pub fn weighted_round_robin() -> Self {
        Self::from_kind(StrategyKind::WeightedRoundRobin)
    }

    pub fn least_connections() -> Self {
        Self::from_kind(StrategyKind::LeastConnections)
    }

    pub fn response_time_weighted() -> Self {
        Self::from_kind(StrategyKind::ResponseTimeWeighted)
    }

    /// Choose one endpoint out of `endpoints`
    ///
    /// Returns `None` only for an empty list. For a non-empty list this always
    /// returns a member of `endpoints` and never panics.
    pub fn choose<'a>(&self, endpoints: &'a [Endpoint]) -> Option<&'a Endpoint> {
        self.counters.total_requests.fetch_add(1, Ordering::Relaxed);

        // Empty input never touches the strategy lock
        let Some(first) = endpoints.first() else {
            self.counters.empty_selections.fetch_add(1, Ordering::Relaxed);
            self.observer.no_candidates();
            return None;
        };

        let strategy = self.active_strategy();
        let name = strategy.name();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| strategy.select(endpoints)))
            .unwrap_or_else(|payload| {
                Err(RouterError::internal(format!(
                    "strategy {} panicked: {}",
                    name,
                    panic_message(payload.as_ref())
                )))
            });

        let failure = match outcome {
            Ok(Some(endpoint)) if is_member(endpoints, endpoint) => {
                self.counters.successful_selections.fetch_add(1, Ordering::Relaxed);
                self.observer.selected(name, endpoint);
                return Some(endpoint);
            }
            Ok(Some(endpoint)) => RouterError::selection(
                name,
                format!("returned endpoint {} which is not a candidate", endpoint.id),
            ),
            Ok(None) => RouterError::selection(name, "returned nothing for a non-empty candidate list"),
            Err(err) => err,
        };

        self.counters.fallback_selections.fetch_add(1, Ordering::Relaxed);
        self.observer.strategy_failed(name, &failure, first);
        Some(first)
    }

    /// Choose from a possibly absent list; absent behaves like empty
    pub fn choose_optional<'a>(&self, endpoints: Option<&'a [Endpoint]>) -> Option<&'a Endpoint> {
        self.choose(endpoints.unwrap_or(&[]))
    }

    /// Replace the active strategy
    ///
    /// Calls already in flight finish on whichever strategy they started with.
    pub fn set_active_strategy(&self, strategy: Arc<dyn BalancingStrategy>) {
        let name = strategy.name();
        *self.active.write() = strategy;

        counter!("router_strategy_switches_total").increment(1);
        debug!(algorithm = name, "Switched selection strategy");
    }

    /// Replace the active strategy with a fresh default-configured one of `kind`
    pub fn switch_strategy(&self, kind: StrategyKind) {
        self.set_active_strategy(kind.build(self.observer.clone()));
    }

    /// The strategy currently used for new selections
    pub fn active_strategy(&self) -> Arc<dyn BalancingStrategy> {
        self.active.read().clone()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.active.read().name()
    }

    pub fn stats(&self) -> RouterStats {
        RouterStats {
            strategy: self.strategy_name().to_string(),
            total_requests: self.counters.total_requests.load(Ordering::Relaxed),
            successful_selections: self.counters.successful_selections.load(Ordering::Relaxed),
            empty_selections: self.counters.empty_selections.load(Ordering::Relaxed),
            fallback_selections: self.counters.fallback_selections.load(Ordering::Relaxed),
        }
    }

    pub fn reset_stats(&self) {
        self.counters.reset();
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::round_robin()
    }
}

fn is_member(endpoints: &[Endpoint], endpoint: &Endpoint) -> bool {
    endpoints
        .as_ptr_range()
        .contains(&(endpoint as *const Endpoint))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
