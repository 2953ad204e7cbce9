//! The two mutually exclusive outcomes of the event and the aggregate
//! per-outcome share totals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MarketError, Result, constants};

/// One side of the binary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Outcome {
    /// First outcome (wire code 1).
    A,
    /// Second outcome (wire code 2).
    B,
}

impl Outcome {
    /// Both outcomes, in wire-code order.
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// The mutually exclusive counterpart.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Decode the wire code accepted by `resolve_market`.
    pub fn from_code(code: u64) -> Result<Self> {
        match code {
            constants::OUTCOME_A_CODE => Ok(Self::A),
            constants::OUTCOME_B_CODE => Ok(Self::B),
            other => Err(MarketError::InvalidOutcomeCode(other)),
        }
    }

    #[must_use]
    pub fn code(self) -> u64 {
        match self {
            Self::A => constants::OUTCOME_A_CODE,
            Self::B => constants::OUTCOME_B_CODE,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "OUTCOME_A"),
            Self::B => write!(f, "OUTCOME_B"),
        }
    }
}

/// Total share-units sold per outcome.
///
/// Purchases only ever increase these counters; claims never touch them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketTotals {
    pub sold_a: u64,
    pub sold_b: u64,
}

impl MarketTotals {
    #[must_use]
    pub fn new(sold_a: u64, sold_b: u64) -> Self {
        Self { sold_a, sold_b }
    }

    /// Share-units sold for `outcome`.
    #[must_use]
    pub fn sold(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::A => self.sold_a,
            Outcome::B => self.sold_b,
        }
    }

    /// How far `outcome` is ahead of the other side; zero when tied or behind.
    #[must_use]
    pub fn lead(&self, outcome: Outcome) -> u64 {
        self.sold(outcome).saturating_sub(self.sold(outcome.other()))
    }

    /// Totals after selling `shares` more of `outcome`.
    pub fn with_sale(&self, outcome: Outcome, shares: u64) -> Result<Self> {
        let mut next = *self;
        let slot = match outcome {
            Outcome::A => &mut next.sold_a,
            Outcome::B => &mut next.sold_b,
        };
        *slot = slot
            .checked_add(shares)
            .ok_or(MarketError::ArithmeticOverflow)?;
        Ok(next)
    }
}
