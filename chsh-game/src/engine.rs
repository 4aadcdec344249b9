//! Simulation engine: validates a request, plays every round and tallies wins.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{self, StrategySpec};
use crate::error::SimulationError;
use crate::quantum::QuantumOutcomeModel;
use crate::result::{ComparisonReport, SimulationResult, Tally};
use crate::rng::RngBundle;
use crate::round::{Round, RoundInputGenerator, RoundInputs, RoundOutputs};

/// Family of strategy a run plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Classical,
    Quantum,
}

impl GameMode {
    pub const ALL: [Self; 2] = [Self::Classical, Self::Quantum];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classical => "classical",
            Self::Quantum => "quantum",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| SimulationError::InvalidMode {
                mode: s.to_string(),
            })
    }
}

/// Raw caller request, validated by [`SimulationPlan::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub mode: String,
    #[serde(default)]
    pub strategy: Option<String>,
    pub rounds: u64,
}

impl SimulationRequest {
    #[must_use]
    pub fn new(mode: impl Into<String>, strategy: Option<String>, rounds: u64) -> Self {
        Self {
            mode: mode.into(),
            strategy,
            rounds,
        }
    }

    #[must_use]
    pub fn quantum(rounds: u64) -> Self {
        Self::new(GameMode::Quantum.as_str(), None, rounds)
    }

    #[must_use]
    pub fn classical(strategy: impl Into<String>, rounds: u64) -> Self {
        Self::new(GameMode::Classical.as_str(), Some(strategy.into()), rounds)
    }
}

/// Whoever produces the outputs for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Contestant {
    Classical(&'static StrategySpec),
    Quantum(QuantumOutcomeModel),
}

impl Contestant {
    fn respond<R: Rng + ?Sized>(self, inputs: RoundInputs, rng: &mut R) -> RoundOutputs {
        match self {
            Self::Classical(spec) => spec.respond(inputs),
            Self::Quantum(model) => model.sample(inputs, rng),
        }
    }
}

/// A request that passed validation. Building one performs no simulation work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationPlan {
    mode: GameMode,
    contestant: Contestant,
    rounds: u64,
}

impl SimulationPlan {
    /// Validate mode, round count and strategy, in that order.
    ///
    /// Classical requests without a strategy play the catalog default; quantum
    /// requests ignore any strategy they carry.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimulationError`] the request triggers.
    pub fn resolve(request: &SimulationRequest) -> Result<Self, SimulationError> {
        let mode: GameMode = request.mode.parse()?;
        if request.rounds == 0 {
            return Err(SimulationError::InvalidRounds {
                value: request.rounds.to_string(),
            });
        }
        let contestant = match mode {
            GameMode::Classical => Contestant::Classical(match request.strategy.as_deref() {
                Some(name) => catalog::get(name)?,
                None => catalog::default_strategy(),
            }),
            GameMode::Quantum => {
                if let Some(name) = request.strategy.as_deref() {
                    log::debug!("quantum run ignores strategy {name:?}");
                }
                Contestant::Quantum(QuantumOutcomeModel::new())
            }
        };
        Ok(Self {
            mode,
            contestant,
            rounds: request.rounds,
        })
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn rounds(&self) -> u64 {
        self.rounds
    }

    #[must_use]
    pub const fn strategy(&self) -> Option<&'static StrategySpec> {
        match self.contestant {
            Contestant::Classical(spec) => Some(spec),
            Contestant::Quantum(_) => None,
        }
    }
}

/// Stateless driver for CHSH runs. Every call owns its own randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationEngine;

impl SimulationEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run with randomness drawn from process entropy.
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationError`] when the request is invalid.
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationResult, SimulationError> {
        self.run_with_bundle(request, &mut RngBundle::from_entropy())
    }

    /// Run reproducibly from a user-visible seed.
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationError`] when the request is invalid.
    pub fn run_seeded(
        &self,
        request: &SimulationRequest,
        seed: u64,
    ) -> Result<SimulationResult, SimulationError> {
        self.run_with_bundle(request, &mut RngBundle::from_user_seed(seed))
    }

    /// Run with streams forked from a caller-owned generator.
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationError`] when the request is invalid.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        request: &SimulationRequest,
        rng: &mut R,
    ) -> Result<SimulationResult, SimulationError> {
        self.run_with_bundle(request, &mut RngBundle::fork(rng))
    }

    /// Validate, then play the whole run against `bundle`.
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationError`] when the request is invalid; no rounds
    /// are played in that case.
    pub fn run_with_bundle(
        &self,
        request: &SimulationRequest,
        bundle: &mut RngBundle,
    ) -> Result<SimulationResult, SimulationError> {
        let plan = SimulationPlan::resolve(request)?;
        Ok(self.execute(&plan, bundle))
    }

    /// Play every round of an already validated plan.
    #[must_use]
    pub fn execute(&self, plan: &SimulationPlan, bundle: &mut RngBundle) -> SimulationResult {
        let (input_rng, outcome_rng) = bundle.streams();
        let mut tally = Tally::default();
        for (_, inputs) in (0..plan.rounds).zip(RoundInputGenerator::new(input_rng)) {
            let outputs = plan.contestant.respond(inputs, &mut *outcome_rng);
            tally.record(Round::new(inputs, outputs).is_win());
        }
        let (input_draws, outcome_draws) = bundle.draws();
        log::debug!(
            "{} run finished: {}/{} wins ({input_draws} input draws, {outcome_draws} outcome draws)",
            plan.mode,
            tally.wins,
            tally.total
        );
        SimulationResult::from_tally(plan.mode, plan.strategy(), tally)
    }

    /// Run quantum and the best classical strategy against the same referee.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidRounds`] when `rounds` is zero.
    pub fn compare(&self, rounds: u64, seed: u64) -> Result<ComparisonReport, SimulationError> {
        let quantum = self.run_seeded(&SimulationRequest::quantum(rounds), seed)?;
        let classical =
            self.run_seeded(&SimulationRequest::classical(catalog::BEST_ALIAS, rounds), seed)?;
        Ok(ComparisonReport { quantum, classical })
    }
}
