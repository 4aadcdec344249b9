//! Aggregate results handed back to callers.
use serde::{Deserialize, Serialize};

use crate::catalog::StrategySpec;
use crate::engine::GameMode;

/// Running `{wins, total}` accumulator owned by a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: u64,
    pub total: u64,
}

impl Tally {
    pub fn record(&mut self, won: bool) {
        self.total += 1;
        if won {
            self.wins += 1;
        }
    }

    /// `wins / total`, or `0.0` for an empty tally.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.wins as f64 / self.total as f64
        }
    }
}

/// Outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub mode: GameMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    pub wins: u64,
    pub total: u64,
    pub win_rate: f64,
}

impl SimulationResult {
    #[must_use]
    pub fn from_tally(mode: GameMode, strategy: Option<&StrategySpec>, tally: Tally) -> Self {
        Self {
            mode,
            strategy: strategy.map(|spec| spec.name.to_string()),
            wins: tally.wins,
            total: tally.total,
            win_rate: tally.win_rate(),
        }
    }

    /// Strategy name for classical runs, the mode name otherwise.
    #[must_use]
    pub fn label(&self) -> &str {
        self.strategy.as_deref().unwrap_or_else(|| self.mode.as_str())
    }
}

/// Presentation dump of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyListing {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub alice_strategy: String,
    pub bob_strategy: String,
}

impl From<&StrategySpec> for StrategyListing {
    fn from(spec: &StrategySpec) -> Self {
        Self {
            name: spec.name.to_string(),
            display_name: spec.display_name.to_string(),
            description: spec.description.to_string(),
            alice_strategy: spec.alice.describe().to_string(),
            bob_strategy: spec.bob.describe().to_string(),
        }
    }
}

/// Quantum and best-classical results over the same number of rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub quantum: SimulationResult,
    pub classical: SimulationResult,
}

impl ComparisonReport {
    /// Quantum win rate minus classical win rate.
    #[must_use]
    pub fn advantage(&self) -> f64 {
        self.quantum.win_rate - self.classical.win_rate
    }
}
