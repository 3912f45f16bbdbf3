pub mod metadata;
pub mod router;
pub mod strategies;

pub use router::{Router, RouterStats};
pub use strategies::{
    BalancingStrategy, LeastConnectionsStrategy, RandomStrategy, ResponseTimeWeightedStrategy,
    RoundRobinStrategy, SelectionResult, StrategyKind, WeightedRoundRobinStrategy,
};
