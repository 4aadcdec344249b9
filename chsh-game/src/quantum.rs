//! Closed-form outcome model for an ideal `|Φ+⟩` Bell pair.
//!
//! Measuring `|Φ+⟩ = (|00⟩ + |11⟩)/√2` after basis rotations `θ_A` and `θ_B`
//! yields agreeing bits with probability `cos²((θ_A − θ_B)/2)` and each bit
//! is individually uniform. The CHSH game is won on agreement when
//! `x·y = 0` and on disagreement when `x·y = 1`.
use rand::Rng;
use rand::distributions::{Distribution, Standard};
use serde::{Deserialize, Serialize};

use crate::bit::Bit;
use crate::round::{RoundInputs, RoundOutputs};

/// Alice's measurement angle in degrees, indexed by `x`.
pub const ALICE_ANGLES_DEG: [f64; 2] = [0.0, 90.0];
/// Bob's measurement angle in degrees, indexed by `y`.
pub const BOB_ANGLES_DEG: [f64; 2] = [45.0, -45.0];

/// `(2 + √2) / 4`, the optimal quantum win probability.
pub const TSIRELSON_WIN_RATE: f64 = (2.0 + std::f64::consts::SQRT_2) / 4.0;

/// Joint distribution over `(a, b)`, indexed `[a][b]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDistribution(pub [[f64; 2]; 2]);

impl OutcomeDistribution {
    #[must_use]
    pub fn probability(&self, outputs: RoundOutputs) -> f64 {
        self.0[usize::from(outputs.a.as_u8())][usize::from(outputs.b.as_u8())]
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.iter().flatten().sum()
    }
}

/// Measurement model at the fixed optimal CHSH angles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantumOutcomeModel;

impl QuantumOutcomeModel {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Difference between Alice's and Bob's basis angles, in radians.
    #[must_use]
    pub fn angle_difference(self, inputs: RoundInputs) -> f64 {
        let alice = ALICE_ANGLES_DEG[usize::from(inputs.x.as_u8())];
        let bob = BOB_ANGLES_DEG[usize::from(inputs.y.as_u8())];
        (alice - bob).to_radians()
    }

    /// Probability that both players measure the same bit.
    #[must_use]
    pub fn agreement_probability(self, inputs: RoundInputs) -> f64 {
        let half = self.angle_difference(inputs) / 2.0;
        half.cos().powi(2).clamp(0.0, 1.0)
    }

    /// Probability that the measured pair wins the round.
    #[must_use]
    pub fn win_probability(self, inputs: RoundInputs) -> f64 {
        let agree = self.agreement_probability(inputs);
        match inputs.target() {
            Bit::Zero => agree,
            Bit::One => 1.0 - agree,
        }
    }

    /// Win probability averaged over uniformly random inputs.
    #[must_use]
    pub fn expected_win_rate(self) -> f64 {
        RoundInputs::ALL
            .into_iter()
            .map(|inputs| self.win_probability(inputs))
            .sum::<f64>()
            / 4.0
    }

    #[must_use]
    pub fn distribution(self, inputs: RoundInputs) -> OutcomeDistribution {
        let same = self.agreement_probability(inputs) / 2.0;
        let differ = 0.5 - same;
        OutcomeDistribution([[same, differ], [differ, same]])
    }

    /// Draw one measurement outcome.
    ///
    /// Alice's bit is uniform and Bob's agrees with it at the quantum rate,
    /// which reproduces the full joint distribution rather than only the
    /// win/loss statistic.
    pub fn sample<R: Rng + ?Sized>(self, inputs: RoundInputs, rng: &mut R) -> RoundOutputs {
        let a: Bit = Standard.sample(rng);
        let agree = rng.gen_bool(self.agreement_probability(inputs));
        let b = if agree { a } else { a.flip() };
        RoundOutputs::new(a, b)
    }
}
