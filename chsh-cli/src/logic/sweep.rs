//! Multi-seed runs and their aggregate statistics.
use anyhow::{Result, bail};
use chsh_game::{GameMode, QuantumOutcomeModel, SimulationResult, catalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::api::{BoundaryError, ChshApi};
use super::seeds::SeedInfo;

/// What to run for every seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepRequest {
    Simulate {
        mode: String,
        strategy: Option<String>,
        rounds: Option<String>,
    },
    Compare {
        rounds: Option<String>,
    },
}

/// One seeded run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    pub seed: u64,
    #[serde(flatten)]
    pub result: SimulationResult,
}

/// Pooled statistics for one mode/strategy label across seeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepAggregate {
    pub label: String,
    pub mode: GameMode,
    pub runs: u32,
    pub total_rounds: u64,
    pub total_wins: u64,
    pub pooled_win_rate: f64,
    pub mean_win_rate: f64,
    pub std_win_rate: f64,
    pub min_win_rate: f64,
    pub max_win_rate: f64,
    pub expected_win_rate: f64,
}

impl SweepAggregate {
    /// Observed pooled rate minus the theoretical rate.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.pooled_win_rate - self.expected_win_rate
    }
}

/// Run the request once per seed, failing fast on the first invalid input.
pub fn run_sweep(
    api: &ChshApi,
    request: &SweepRequest,
    seeds: &[SeedInfo],
    verbose: bool,
) -> Result<Vec<SweepRecord>, BoundaryError> {
    let mut records = Vec::with_capacity(seeds.len() * 2);
    for info in seeds {
        let results = match request {
            SweepRequest::Simulate {
                mode,
                strategy,
                rounds,
            } => vec![api.run_simulation(
                mode,
                strategy.as_deref(),
                rounds.as_deref(),
                info.seed,
            )?],
            SweepRequest::Compare { rounds } => {
                let report = api.compare(rounds.as_deref(), info.seed)?;
                vec![report.quantum, report.classical]
            }
        };
        for result in results {
            if verbose {
                println!(
                    "🎲 seed {:<20} {:<16} {}/{} wins ({:.2}%)",
                    info.seed,
                    result.label(),
                    result.wins,
                    result.total,
                    result.win_rate * 100.0
                );
            }
            records.push(SweepRecord {
                seed: info.seed,
                result,
            });
        }
    }
    Ok(records)
}

/// Group records by label; output is sorted by label.
#[must_use]
pub fn aggregate_sweep(records: &[SweepRecord]) -> Vec<SweepAggregate> {
    let mut builders: BTreeMap<String, AggregateBuilder> = BTreeMap::new();
    for record in records {
        builders
            .entry(record.result.label().to_string())
            .or_insert_with(|| AggregateBuilder::new(&record.result))
            .ingest(&record.result);
    }
    builders
        .into_values()
        .map(AggregateBuilder::finish)
        .collect()
}

/// Check that every pooled win rate sits within `tolerance` of theory.
pub fn validate_acceptance_targets(aggregates: &[SweepAggregate], tolerance: f64) -> Result<()> {
    let failures: Vec<String> = aggregates
        .iter()
        .filter(|agg| agg.deviation().abs() > tolerance)
        .map(|agg| {
            format!(
                "{} pooled win rate {:.4} is {:+.4} from expected {:.4}",
                agg.label,
                agg.pooled_win_rate,
                agg.deviation(),
                agg.expected_win_rate
            )
        })
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        bail!("acceptance targets missed: {}", failures.join("; "))
    }
}

fn expected_win_rate(result: &SimulationResult) -> f64 {
    match result.mode {
        GameMode::Quantum => QuantumOutcomeModel::new().expected_win_rate(),
        GameMode::Classical => result
            .strategy
            .as_deref()
            .and_then(|name| catalog::get(name).ok())
            .map_or(catalog::CLASSICAL_WIN_LIMIT, catalog::StrategySpec::exact_win_rate),
    }
}

struct AggregateBuilder {
    label: String,
    mode: GameMode,
    expected: f64,
    total_rounds: u64,
    total_wins: u64,
    min: f64,
    max: f64,
    stats: RunningStats,
}

impl AggregateBuilder {
    fn new(result: &SimulationResult) -> Self {
        Self {
            label: result.label().to_string(),
            mode: result.mode,
            expected: expected_win_rate(result),
            total_rounds: 0,
            total_wins: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            stats: RunningStats::default(),
        }
    }

    fn ingest(&mut self, result: &SimulationResult) {
        self.total_rounds += result.total;
        self.total_wins += result.wins;
        self.min = self.min.min(result.win_rate);
        self.max = self.max.max(result.win_rate);
        self.stats.add(result.win_rate);
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self) -> SweepAggregate {
        let pooled = if self.total_rounds == 0 {
            0.0
        } else {
            self.total_wins as f64 / self.total_rounds as f64
        };
        SweepAggregate {
            label: self.label,
            mode: self.mode,
            runs: self.stats.count,
            total_rounds: self.total_rounds,
            total_wins: self.total_wins,
            pooled_win_rate: pooled,
            mean_win_rate: self.stats.mean(),
            std_win_rate: self.stats.std_dev(),
            min_win_rate: self.min,
            max_win_rate: self.max,
            expected_win_rate: self.expected,
        }
    }
}

#[derive(Default)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / f64::from(self.count - 1)
        } else {
            0.0
        }
    }

    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
