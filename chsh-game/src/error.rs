//! Validation failures raised before any round is simulated.
use thiserror::Error;

use crate::catalog::StrategyNotFound;

/// Errors raised when a simulation request is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("rounds must be a positive integer (got {value})")]
    InvalidRounds { value: String },
    #[error("unknown classical strategy: {name}")]
    UnknownStrategy { name: String },
    #[error("mode must be \"quantum\" or \"classical\" (got {mode:?})")]
    InvalidMode { mode: String },
}

impl From<StrategyNotFound> for SimulationError {
    fn from(value: StrategyNotFound) -> Self {
        Self::UnknownStrategy { name: value.0 }
    }
}

/// Parse a raw round count, rejecting non-integers and values below one.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidRounds`] for anything but a positive integer.
pub fn parse_rounds(raw: &str) -> Result<u64, SimulationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(SimulationError::InvalidRounds {
            value: trimmed.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_integers_only() {
        assert_eq!(parse_rounds(" 250 "), Ok(250));
        for bad in ["0", "-5", "12.5", "ten", ""] {
            assert!(
                matches!(parse_rounds(bad), Err(SimulationError::InvalidRounds { .. })),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn catalog_misses_become_unknown_strategy() {
        let err = SimulationError::from(StrategyNotFound("bogus".to_string()));
        assert_eq!(
            err,
            SimulationError::UnknownStrategy {
                name: "bogus".to_string()
            }
        );
        assert_eq!(err.to_string(), "unknown classical strategy: bogus");
    }
}
