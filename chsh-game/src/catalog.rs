//! Classical strategy catalog.
//!
//! Each entry pairs a fixed rule for Alice (a function of `x`) with a fixed rule
//! for Bob (a function of `y`). No entry shares randomness or looks at the
//! other player's input, so none can beat the classical limit of 0.75.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bit::Bit;
use crate::round::{Round, RoundInputs, RoundOutputs};

/// Win probability ceiling for any local deterministic strategy.
pub const CLASSICAL_WIN_LIMIT: f64 = 0.75;

/// Alias accepted by [`get`] for the canonical optimal strategy.
pub const BEST_ALIAS: &str = "best";

/// Deterministic single-player output rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputRule {
    /// Always answer 0.
    Zero,
    /// Always answer 1.
    One,
    /// Answer the received input bit.
    Copy,
    /// Answer the negated input bit.
    Invert,
}

impl OutputRule {
    pub const ALL: [Self; 4] = [Self::Zero, Self::One, Self::Copy, Self::Invert];

    #[must_use]
    pub const fn apply(self, input: Bit) -> Bit {
        match self {
            Self::Zero => Bit::Zero,
            Self::One => Bit::One,
            Self::Copy => input,
            Self::Invert => input.flip(),
        }
    }

    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Zero => "Always outputs 0",
            Self::One => "Always outputs 1",
            Self::Copy => "Outputs own input bit",
            Self::Invert => "Outputs NOT(input)",
        }
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub alice: OutputRule,
    pub bob: OutputRule,
}

impl StrategySpec {
    /// Both players answer their own input.
    #[must_use]
    pub const fn respond(&self, inputs: RoundInputs) -> RoundOutputs {
        RoundOutputs::new(self.alice.apply(inputs.x), self.bob.apply(inputs.y))
    }

    /// Exact win probability over uniformly random inputs, by enumeration.
    #[must_use]
    pub fn exact_win_rate(&self) -> f64 {
        let wins: u32 = RoundInputs::ALL
            .into_iter()
            .map(|inputs| u32::from(Round::new(inputs, self.respond(inputs)).is_win()))
            .sum();
        f64::from(wins) / 4.0
    }
}

/// Raised by [`get`] for names that are not in the catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no classical strategy named `{0}`")]
pub struct StrategyNotFound(pub String);

static CATALOG: [StrategySpec; 5] = [
    StrategySpec {
        name: "always_zero",
        display_name: "Always Output 0",
        description: "Both Alice and Bob always output 0, regardless of input. This is the optimal classical strategy achieving 75% win rate.",
        alice: OutputRule::Zero,
        bob: OutputRule::Zero,
    },
    StrategySpec {
        name: "always_one",
        display_name: "Always Output 1",
        description: "Both Alice and Bob always output 1, regardless of input. Achieves 75% win rate.",
        alice: OutputRule::One,
        bob: OutputRule::One,
    },
    StrategySpec {
        name: "copy_input",
        display_name: "Copy Input Strategy",
        description: "Alice copies the input bit, Bob always outputs 0. This strategy achieves 75% win rate.",
        alice: OutputRule::Copy,
        bob: OutputRule::Zero,
    },
    StrategySpec {
        name: "inverted_input",
        display_name: "Inverted Input Strategy",
        description: "Alice outputs the opposite of the input, Bob always outputs 1. Also achieves 75% win rate.",
        alice: OutputRule::Invert,
        bob: OutputRule::One,
    },
    StrategySpec {
        name: "bob_copies",
        display_name: "Bob Copies Input",
        description: "Alice always outputs 0, Bob copies the input bit. Loses only when x=0 and y=1, for a 75% win rate.",
        alice: OutputRule::Zero,
        bob: OutputRule::Copy,
    },
];

/// Every strategy in presentation order.
#[must_use]
pub fn list() -> &'static [StrategySpec] {
    &CATALOG
}

/// Look up a strategy by its exact name; `best` aliases `always_zero`.
///
/// # Errors
///
/// Returns [`StrategyNotFound`] when the name matches no entry.
pub fn get(name: &str) -> Result<&'static StrategySpec, StrategyNotFound> {
    let key = if name == BEST_ALIAS {
        CATALOG[0].name
    } else {
        name
    };
    CATALOG
        .iter()
        .find(|spec| spec.name == key)
        .ok_or_else(|| StrategyNotFound(name.to_string()))
}

/// Strategy used when classical play is requested without a name.
#[must_use]
pub fn default_strategy() -> &'static StrategySpec {
    &CATALOG[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_entry_hits_the_classical_limit_exactly() {
        for spec in list() {
            assert!(
                (spec.exact_win_rate() - CLASSICAL_WIN_LIMIT).abs() < f64::EPSILON,
                "{} wins {}",
                spec.name,
                spec.exact_win_rate()
            );
        }
    }

    #[test]
    fn no_local_rule_pair_beats_the_limit() {
        for alice in OutputRule::ALL {
            for bob in OutputRule::ALL {
                let spec = StrategySpec {
                    name: "probe",
                    display_name: "Probe",
                    description: "",
                    alice,
                    bob,
                };
                assert!(spec.exact_win_rate() <= CLASSICAL_WIN_LIMIT);
            }
        }
    }

    #[test]
    fn names_are_unique_and_order_is_stable() {
        let names: Vec<_> = list().iter().map(|spec| spec.name).collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names[0], "always_zero");
        assert_eq!(names, list().iter().map(|spec| spec.name).collect::<Vec<_>>());
    }

    #[test]
    fn lookup_is_exact_apart_from_the_best_alias() {
        assert_eq!(get("best").unwrap().name, "always_zero");
        assert_eq!(get("copy_input").unwrap().name, "copy_input");
        for near_miss in ["ALWAYS_ONE", " copy_input", "Best", "always_one "] {
            assert_eq!(
                get(near_miss),
                Err(StrategyNotFound(near_miss.to_string()))
            );
        }
        assert_eq!(
            get("nonexistent"),
            Err(StrategyNotFound("nonexistent".to_string()))
        );
        assert_eq!(default_strategy().name, "always_zero");
    }

    #[test]
    fn rules_depend_only_on_own_input() {
        let spec = get("copy_input").unwrap();
        let left = spec.respond(RoundInputs::new(Bit::One, Bit::Zero));
        let right = spec.respond(RoundInputs::new(Bit::One, Bit::One));
        assert_eq!(left.a, right.a);
        assert_eq!(OutputRule::Invert.apply(Bit::Zero), Bit::One);
    }
}
