//! CHSH Game Engine
//!
//! Platform-agnostic simulation core for the CHSH nonlocal game. Alice and Bob
//! receive random bits `x` and `y`, answer `a` and `b` without communicating,
//! and win a round when `a XOR b == x AND y`. Classical deterministic strategies
//! top out at 0.75; a shared Bell pair measured at the optimal angles reaches
//! `(2 + √2) / 4`.
//!
//! This crate holds no I/O: callers supply requests and receive
//! [`SimulationResult`] values.

pub mod bit;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod quantum;
pub mod result;
pub mod rng;
pub mod round;

// Re-export commonly used types
pub use bit::{Bit, InvalidBit};
pub use catalog::{
    CLASSICAL_WIN_LIMIT, OutputRule, StrategyNotFound, StrategySpec, default_strategy,
};
pub use engine::{GameMode, SimulationEngine, SimulationPlan, SimulationRequest};
pub use error::{SimulationError, parse_rounds};
pub use quantum::{OutcomeDistribution, QuantumOutcomeModel, TSIRELSON_WIN_RATE};
pub use result::{ComparisonReport, SimulationResult, StrategyListing, Tally};
pub use rng::{CountingRng, RngBundle};
pub use round::{Round, RoundInputGenerator, RoundInputs, RoundOutputs, is_winning};

/// Catalog dump in presentation order.
#[must_use]
pub fn list_strategies() -> Vec<StrategyListing> {
    catalog::list().iter().map(StrategyListing::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_follows_catalog_order() {
        let names: Vec<_> = list_strategies().into_iter().map(|s| s.name).collect();
        let expected: Vec<_> = catalog::list().iter().map(|s| s.name.to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SimulationEngine>();
        assert_send_sync::<SimulationResult>();
    }
}
