//! # Selection Strategies
//!
//! Five interchangeable algorithms behind the [`BalancingStrategy`] trait:
//!
//! 1. **Random**: uniform pick, no state
//! 2. **Round Robin**: shared atomic counter modulo the current list length
//! 3. **Weighted Round Robin**: counter modulo the total `weight` metadata
//! 4. **Least Connections**: minimum `activeConnections`, first wins ties
//! 5. **Response Time Weighted**: random pick biased by `1 / avgResponseTime`
//!
//! Every strategy returns `Ok(None)` for an empty list and otherwise a member of
//! the input slice. Rotation counters are `AtomicUsize` advanced with
//! `fetch_add`, so concurrent callers never share a counter value and the
//! counter wraps to zero on overflow instead of going negative.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::error::{RouterError, RouterResult};
use crate::core::types::Endpoint;
use crate::load_balancing::metadata;
use crate::observability::{SelectionObserver, TracingObserver};

/// Outcome of a single selection
///
/// `Ok(None)` means there was nothing to choose from. `Err` tells the router
/// the strategy could not do its job and the fallback policy applies.
pub type SelectionResult<'a> = RouterResult<Option<&'a Endpoint>>;

/// Common contract for all selection algorithms
pub trait BalancingStrategy: Send + Sync {
    /// Pick one endpoint out of `endpoints`
    fn select<'a>(&self, endpoints: &'a [Endpoint]) -> SelectionResult<'a>;

    /// Pick from a possibly absent list; absent behaves like empty
    fn select_optional<'a>(&self, endpoints: Option<&'a [Endpoint]>) -> SelectionResult<'a> {
        self.select(endpoints.unwrap_or(&[]))
    }

    /// Algorithm name for logs and metrics
    fn name(&self) -> &'static str;
}

fn default_observer() -> Arc<dyn SelectionObserver> {
    Arc::new(TracingObserver)
}

/// Advance `counter` and reduce it onto `0..len`
fn rotate(counter: &AtomicUsize, len: usize) -> usize {
    counter.fetch_add(1, Ordering::Relaxed) % len
}

fn random_pick(endpoints: &[Endpoint]) -> Option<&Endpoint> {
    if endpoints.is_empty() {
        return None;
    }
    let index = rand::thread_rng().gen_range(0..endpoints.len());
    endpoints.get(index)
}

/// Uniform random selection
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStrategy;

impl RandomStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl BalancingStrategy for RandomStrategy {
    fn select<'a>(&self, endpoints: &'a [Endpoint]) -> SelectionResult<'a> {
        Ok(random_pick(endpoints))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Round-robin selection over the list as passed on each call
///
/// The modulus is recomputed every call, so a changing candidate set is
/// tolerated; the rotation is only a strict cycle while the list is stable.
#[derive(Debug, Default)]
pub struct RoundRobinStrategy {
    counter: AtomicUsize,
}

impl RoundRobinStrategy {
    pub fn new() -> Self {
        Self::with_counter(0)
    }

    /// Start the rotation at `start` instead of zero
    pub fn with_counter(start: usize) -> Self {
        Self {
            counter: AtomicUsize::new(start),
        }
    }
}

impl BalancingStrategy for RoundRobinStrategy {
    fn select<'a>(&self, endpoints: &'a [Endpoint]) -> SelectionResult<'a> {
        if endpoints.is_empty() {
            return Ok(None);
        }
        Ok(endpoints.get(rotate(&self.counter, endpoints.len())))
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}

/// Round-robin biased by the `weight` metadata of each endpoint
///
/// With a total weight of zero this behaves exactly like [`RoundRobinStrategy`]
/// on the same counter.
pub struct WeightedRoundRobinStrategy {
    counter: AtomicUsize,
    observer: Arc<dyn SelectionObserver>,
}

impl WeightedRoundRobinStrategy {
    pub fn new() -> Self {
        Self::with_observer(default_observer())
    }

    pub fn with_observer(observer: Arc<dyn SelectionObserver>) -> Self {
        Self {
            counter: AtomicUsize::new(0),
            observer,
        }
    }

    /// Start the rotation at `start` instead of zero
    pub fn with_counter(mut self, start: usize) -> Self {
        self.counter = AtomicUsize::new(start);
        self
    }
}

impl Default for WeightedRoundRobinStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BalancingStrategy for WeightedRoundRobinStrategy {
    fn select<'a>(&self, endpoints: &'a [Endpoint]) -> SelectionResult<'a> {
        if endpoints.is_empty() {
            return Ok(None);
        }

        let weights: Vec<u64> = endpoints
            .iter()
            .map(|e| metadata::weight(e, self.observer.as_ref()))
            .collect();
        let total_weight = weights.iter().fold(0u64, |acc, w| acc.saturating_add(*w));

        if total_weight == 0 {
            return Ok(endpoints.get(rotate(&self.counter, endpoints.len())));
        }

        let target = self.counter.fetch_add(1, Ordering::Relaxed) as u64 % total_weight;

        let mut cumulative = 0u64;
        for (endpoint, weight) in endpoints.iter().zip(&weights) {
            cumulative = cumulative.saturating_add(*weight);
            if cumulative > target {
                return Ok(Some(endpoint));
            }
        }

        // Unreachable while target < total_weight
        Ok(endpoints.first())
    }

    fn name(&self) -> &'static str {
        "weighted_round_robin"
    }
}

/// Picks the endpoint reporting the fewest `activeConnections`
pub struct LeastConnectionsStrategy {
    observer: Arc<dyn SelectionObserver>,
}

impl LeastConnectionsStrategy {
    pub fn new() -> Self {
        Self::with_observer(default_observer())
    }

    pub fn with_observer(observer: Arc<dyn SelectionObserver>) -> Self {
        Self { observer }
    }
}

impl Default for LeastConnectionsStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BalancingStrategy for LeastConnectionsStrategy {
    fn select<'a>(&self, endpoints: &'a [Endpoint]) -> SelectionResult<'a> {
        if endpoints.is_empty() {
            return Ok(None);
        }

        // min_by_key keeps the first of several equal minima
        let selected = endpoints
            .iter()
            .min_by_key(|e| metadata::active_connections(e, self.observer.as_ref()));

        Ok(selected.or_else(|| endpoints.first()))
    }

    fn name(&self) -> &'static str {
        "least_connections"
    }
}

/// Random selection weighted by the inverse of `avgResponseTime`
///
/// Faster endpoints are picked more often but no endpoint is ever excluded.
pub struct ResponseTimeWeightedStrategy {
    observer: Arc<dyn SelectionObserver>,
}

impl ResponseTimeWeightedStrategy {
    pub fn new() -> Self {
        Self::with_observer(default_observer())
    }

    pub fn with_observer(observer: Arc<dyn SelectionObserver>) -> Self {
        Self { observer }
    }
}

impl Default for ResponseTimeWeightedStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BalancingStrategy for ResponseTimeWeightedStrategy {
    fn select<'a>(&self, endpoints: &'a [Endpoint]) -> SelectionResult<'a> {
        if endpoints.is_empty() {
            return Ok(None);
        }

        let inverse_weights: Vec<f64> = endpoints
            .iter()
            .map(|e| 1.0 / metadata::avg_response_time(e, self.observer.as_ref()) as f64)
            .collect();
        let total: f64 = inverse_weights.iter().sum();

        if !(total > 0.0 && total.is_finite()) {
            return Ok(random_pick(endpoints));
        }

        let target = rand::thread_rng().gen_range(0.0..total);

        let mut cumulative = 0.0;
        for (endpoint, weight) in endpoints.iter().zip(&inverse_weights) {
            cumulative += weight;
            if cumulative >= target {
                return Ok(Some(endpoint));
            }
        }

        // Floating point rounding can leave the scan just short of target
        Ok(endpoints.last())
    }

    fn name(&self) -> &'static str {
        "response_time_weighted"
    }
}

/// The closed set of built-in strategies, as named in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Random,
    #[default]
    RoundRobin,
    WeightedRoundRobin,
    LeastConnections,
    ResponseTimeWeighted,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Random,
        StrategyKind::RoundRobin,
        StrategyKind::WeightedRoundRobin,
        StrategyKind::LeastConnections,
        StrategyKind::ResponseTimeWeighted,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::RoundRobin => "round_robin",
            Self::WeightedRoundRobin => "weighted_round_robin",
            Self::LeastConnections => "least_connections",
            Self::ResponseTimeWeighted => "response_time_weighted",
        }
    }

    /// Construct a default-configured strategy of this kind
    pub fn build(&self, observer: Arc<dyn SelectionObserver>) -> Arc<dyn BalancingStrategy> {
        match self {
            Self::Random => Arc::new(RandomStrategy::new()),
            Self::RoundRobin => Arc::new(RoundRobinStrategy::new()),
            Self::WeightedRoundRobin => Arc::new(WeightedRoundRobinStrategy::with_observer(observer)),
            Self::LeastConnections => Arc::new(LeastConnectionsStrategy::with_observer(observer)),
            Self::ResponseTimeWeighted => {
                Arc::new(ResponseTimeWeightedStrategy::with_observer(observer))
            }
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = RouterError;

    /// Accepts `snake_case` or `kebab-case`, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| crate::config_error!("Unknown selection strategy: {}", s))
    }
}
