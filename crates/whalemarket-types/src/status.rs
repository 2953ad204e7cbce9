//! Market lifecycle.
//!
//! ```text
//!   ┌──────┐ toggle_pause ┌────────┐
//!   │ OPEN │◀────────────▶│ PAUSED │
//!   └──┬───┘              └───┬────┘
//!      │ resolve_market       │ resolve_market
//!      ▼                      ▼
//!   ┌──────────────────────────────┐
//!   │ RESOLVED(winner)  (terminal) │
//!   └──────────────────────────────┘
//! ```
//!
//! The winner lives inside the `Resolved` variant, so a resolved market
//! without a winner (or an open market with one) cannot be represented.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Outcome;

/// Lifecycle state gating every other operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MarketStatus {
    /// Accepting purchases.
    #[default]
    Open,
    /// Purchases suspended by the administrator.
    Paused,
    /// Winner declared. **Irreversible.**
    Resolved { winner: Outcome },
}

impl MarketStatus {
    #[must_use]
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// The winning outcome, set if and only if the market is resolved.
    #[must_use]
    pub fn winner(&self) -> Option<Outcome> {
        match self {
            Self::Resolved { winner } => Some(*winner),
            Self::Open | Self::Paused => None,
        }
    }

    /// Whether purchases are currently accepted.
    #[must_use]
    pub fn accepts_purchases(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Paused => write!(f, "PAUSED"),
            Self::Resolved { winner } => write!(f, "RESOLVED({winner})"),
        }
    }
}

/// Operations reserved for the market administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminAction {
    TogglePause,
    Resolve,
    WithdrawProfit,
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TogglePause => write!(f, "TOGGLE_PAUSE"),
            Self::Resolve => write!(f, "RESOLVE"),
            Self::WithdrawProfit => write!(f, "WITHDRAW_PROFIT"),
        }
    }
}
