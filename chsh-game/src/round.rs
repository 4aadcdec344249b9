//! Round primitives: referee inputs, player outputs and the CHSH win predicate.
use rand::distributions::{Distribution, Standard};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::bit::Bit;

/// Bits handed to Alice (`x`) and Bob (`y`) by the referee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundInputs {
    pub x: Bit,
    pub y: Bit,
}

impl RoundInputs {
    /// Every input pair, each occurring with probability 1/4 under a fair referee.
    pub const ALL: [Self; 4] = [
        Self::new(Bit::Zero, Bit::Zero),
        Self::new(Bit::Zero, Bit::One),
        Self::new(Bit::One, Bit::Zero),
        Self::new(Bit::One, Bit::One),
    ];

    #[must_use]
    pub const fn new(x: Bit, y: Bit) -> Self {
        Self { x, y }
    }

    /// The value `x AND y` that the output XOR must equal.
    #[must_use]
    pub const fn target(self) -> Bit {
        self.x.and(self.y)
    }
}

impl Distribution<RoundInputs> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> RoundInputs {
        let x: Bit = Standard.sample(rng);
        let y: Bit = Standard.sample(rng);
        RoundInputs::new(x, y)
    }
}

/// Bits answered by Alice (`a`) and Bob (`b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundOutputs {
    pub a: Bit,
    pub b: Bit,
}

impl RoundOutputs {
    #[must_use]
    pub const fn new(a: Bit, b: Bit) -> Self {
        Self { a, b }
    }
}

/// A fully played round. Lives for one loop iteration only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub inputs: RoundInputs,
    pub outputs: RoundOutputs,
}

impl Round {
    #[must_use]
    pub const fn new(inputs: RoundInputs, outputs: RoundOutputs) -> Self {
        Self { inputs, outputs }
    }

    #[must_use]
    pub const fn is_win(self) -> bool {
        is_winning(self.inputs.x, self.inputs.y, self.outputs.a, self.outputs.b)
    }
}

/// CHSH win predicate: `a XOR b == x AND y`.
#[must_use]
pub const fn is_winning(x: Bit, y: Bit, a: Bit, b: Bit) -> bool {
    a.xor(b).as_bool() == x.and(y).as_bool()
}

/// Endless stream of uniformly random referee inputs.
///
/// Restart by constructing a fresh generator; the stream never ends on its own.
#[derive(Debug, Clone)]
pub struct RoundInputGenerator<R> {
    rng: R,
}

impl<R: Rng> RoundInputGenerator<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RoundInputGenerator<SmallRng> {
    /// Generator seeded from process entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::seed_from_u64(rand::random()))
    }
}

impl<R: Rng> Iterator for RoundInputGenerator<R> {
    type Item = RoundInputs;

    fn next(&mut self) -> Option<Self::Item> {
        Some(Standard.sample(&mut self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
