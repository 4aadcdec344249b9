use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Request limits and acceptance thresholds enforced at the boundary.
///
/// The engine accepts any positive round count; these bounds are the
/// interactive limits callers see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    #[serde(default = "BoundaryConfig::default_min_rounds")]
    pub min_rounds: u64,
    #[serde(default = "BoundaryConfig::default_max_rounds")]
    pub max_rounds: u64,
    #[serde(default = "BoundaryConfig::default_rounds")]
    pub default_rounds: u64,
    #[serde(default = "BoundaryConfig::default_acceptance_tolerance")]
    pub acceptance_tolerance: f64,
}

/// Errors raised when boundary configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("round window invalid (min {min} > max {max})")]
    RoundsRange { min: u64, max: u64 },
    #[error("min_rounds must be at least 1")]
    ZeroMinimum,
    #[error("default_rounds {value} must be between {min} and {max}")]
    DefaultOutOfRange { value: u64, min: u64, max: u64 },
    #[error("acceptance_tolerance must be in (0, 1) (got {value:.4})")]
    Tolerance { value: f64 },
}

impl BoundaryConfig {
    const fn default_min_rounds() -> u64 {
        100
    }

    const fn default_max_rounds() -> u64 {
        100_000
    }

    const fn default_rounds() -> u64 {
        1_000
    }

    const fn default_acceptance_tolerance() -> f64 {
        0.01
    }

    /// Check the invariants every other component relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_rounds == 0 {
            return Err(ConfigError::ZeroMinimum);
        }
        if self.min_rounds > self.max_rounds {
            return Err(ConfigError::RoundsRange {
                min: self.min_rounds,
                max: self.max_rounds,
            });
        }
        if !(self.min_rounds..=self.max_rounds).contains(&self.default_rounds) {
            return Err(ConfigError::DefaultOutOfRange {
                value: self.default_rounds,
                min: self.min_rounds,
                max: self.max_rounds,
            });
        }
        if !(self.acceptance_tolerance > 0.0 && self.acceptance_tolerance < 1.0) {
            return Err(ConfigError::Tolerance {
                value: self.acceptance_tolerance,
            });
        }
        Ok(())
    }

    /// Load from an optional JSON file, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => Self::default(),
        };
        config.validate()?;
        log::debug!("boundary config: {config:?}");
        Ok(config)
    }
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            min_rounds: Self::default_min_rounds(),
            max_rounds: Self::default_max_rounds(),
            default_rounds: Self::default_rounds(),
            acceptance_tolerance: Self::default_acceptance_tolerance(),
        }
    }
}
