//! Request/response boundary over the simulation core.
use chsh_game::{
    ComparisonReport, RngBundle, SimulationEngine, SimulationError, SimulationPlan,
    SimulationRequest, SimulationResult, StrategyListing, parse_rounds,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BoundaryConfig;

/// Caller-facing failures; all are input validation problems.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoundaryError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error("Number of rounds must be between {min} and {max} (got {rounds})")]
    RoundsOutOfRange { rounds: u64, min: u64, max: u64 },
}

impl BoundaryError {
    /// Process exit code for the CLI.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Simulation(SimulationError::InvalidMode { .. }) => 3,
            Self::Simulation(SimulationError::UnknownStrategy { .. }) => 4,
            Self::Simulation(SimulationError::InvalidRounds { .. })
            | Self::RoundsOutOfRange { .. } => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// `{"strategies": [...]}` listing payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyCatalogResponse {
    pub strategies: Vec<StrategyListing>,
}

/// Boundary operations backed by a stateless engine.
#[derive(Debug, Clone)]
pub struct ChshApi {
    engine: SimulationEngine,
    config: BoundaryConfig,
}

impl ChshApi {
    #[must_use]
    pub const fn new(config: BoundaryConfig) -> Self {
        Self {
            engine: SimulationEngine::new(),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    #[must_use]
    pub fn list_strategies(&self) -> StrategyCatalogResponse {
        StrategyCatalogResponse {
            strategies: chsh_game::list_strategies(),
        }
    }

    #[must_use]
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            message: "CHSH Game API is running".to_string(),
        }
    }

    /// Resolve the round count, defaulting when the caller sent none.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidRounds`] for non-positive or non-integer input.
    pub fn resolve_rounds(&self, raw: Option<&str>) -> Result<u64, BoundaryError> {
        match raw {
            Some(raw) => Ok(parse_rounds(raw)?),
            None => Ok(self.config.default_rounds),
        }
    }

    /// Validate and run one simulation.
    ///
    /// Core validation (mode, rounds, strategy) runs first, then the
    /// interactive round window; nothing is simulated on failure.
    ///
    /// # Errors
    ///
    /// Returns a [`BoundaryError`] describing the first invalid input.
    pub fn run_simulation(
        &self,
        mode: &str,
        strategy: Option<&str>,
        rounds: Option<&str>,
        seed: u64,
    ) -> Result<SimulationResult, BoundaryError> {
        let rounds = self.resolve_rounds(rounds)?;
        let request = SimulationRequest::new(mode, strategy.map(str::to_string), rounds);
        self.run_request(&request, seed)
    }

    /// Quantum against the best classical strategy, same rounds and referee.
    ///
    /// # Errors
    ///
    /// Returns a [`BoundaryError`] when the round count is invalid.
    pub fn compare(
        &self,
        rounds: Option<&str>,
        seed: u64,
    ) -> Result<ComparisonReport, BoundaryError> {
        let rounds = self.resolve_rounds(rounds)?;
        self.check_window(rounds)?;
        let report = self.engine.compare(rounds, seed)?;
        log::info!(
            "compare seed {seed}: quantum {:.4} vs {} {:.4} (advantage {:+.4})",
            report.quantum.win_rate,
            report.classical.label(),
            report.classical.win_rate,
            report.advantage()
        );
        Ok(report)
    }

    fn run_request(
        &self,
        request: &SimulationRequest,
        seed: u64,
    ) -> Result<SimulationResult, BoundaryError> {
        let plan = SimulationPlan::resolve(request)?;
        self.check_window(plan.rounds())?;
        let result = self
            .engine
            .execute(&plan, &mut RngBundle::from_user_seed(seed));
        log::info!(
            "{} seed {seed}: {}/{} wins ({:.4})",
            result.label(),
            result.wins,
            result.total,
            result.win_rate
        );
        Ok(result)
    }

    fn check_window(&self, rounds: u64) -> Result<(), BoundaryError> {
        if (self.config.min_rounds..=self.config.max_rounds).contains(&rounds) {
            Ok(())
        } else {
            log::warn!("rejecting {rounds} rounds outside the interactive window");
            Err(BoundaryError::RoundsOutOfRange {
                rounds,
                min: self.config.min_rounds,
                max: self.config.max_rounds,
            })
        }
    }
}

impl Default for ChshApi {
    fn default() -> Self {
        Self::new(BoundaryConfig::default())
    }
}
