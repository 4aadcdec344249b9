//! Strongly typed single-bit values used for round inputs and outputs.
use rand::Rng;
use rand::distributions::{Distribution, Standard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitXor, Not};
use thiserror::Error;

/// A single classical bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Bit {
    Zero,
    One,
}

/// Raised when an integer other than 0 or 1 is converted into a [`Bit`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("bit value must be 0 or 1 (got {0})")]
pub struct InvalidBit(pub u8);

impl Bit {
    /// Both values in ascending order.
    pub const ALL: [Self; 2] = [Self::Zero, Self::One];

    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::One } else { Self::Zero }
    }

    #[must_use]
    pub const fn as_bool(self) -> bool {
        matches!(self, Self::One)
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    #[must_use]
    pub const fn xor(self, other: Self) -> Self {
        Self::from_bool(self.as_bool() != other.as_bool())
    }

    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        Self::from_bool(self.as_bool() && other.as_bool())
    }

    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }
}

impl BitXor for Bit {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        self.xor(rhs)
    }
}

impl BitAnd for Bit {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl Not for Bit {
    type Output = Self;

    fn not(self) -> Self {
        self.flip()
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<Bit> for u8 {
    fn from(value: Bit) -> Self {
        value.as_u8()
    }
}

impl TryFrom<u8> for Bit {
    type Error = InvalidBit;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            other => Err(InvalidBit(other)),
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Uniform over `{0, 1}`.
impl Distribution<Bit> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Bit {
        Bit::from_bool(rng.gen_bool(0.5))
    }
}
