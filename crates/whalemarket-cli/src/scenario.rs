//! Scenario files: a configuration, an administrator and an ordered list
//! of operations replayed against an in-memory market.
//!
//! Accounts are named by label and mapped to identities with
//! [`AccountId::from_label`]. Amounts are whole-unit decimals (`"0.51"`).
//!
//! ```json
//! {
//!   "admin": "house",
//!   "steps": [
//!     { "op": "deposit", "from": "house", "amount": "5" },
//!     { "op": "buy", "buyer": "alice", "outcome": "A", "amount": "1" },
//!     { "op": "resolve", "caller": "house", "winner": 1 },
//!     { "op": "claim", "caller": "alice" }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, bail};
use rust_decimal::Decimal;
use serde::Deserialize;
use whalemarket_core::Market;
use whalemarket_settlement::Vault;
use whalemarket_types::{AccountId, MarketConfig, Outcome, Payment, units};

/// A replayable market scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: MarketConfig,
    /// Administrator label.
    pub admin: String,
    /// Label of the market's collection address.
    #[serde(default = "default_market_label")]
    pub market: String,
    pub steps: Vec<Step>,
}

fn default_market_label() -> String {
    "market".to_string()
}

/// One operation. `to` overrides the payment receiver, which lets a
/// scenario exercise diverted payments.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Deposit {
        from: String,
        amount: Decimal,
        #[serde(default)]
        to: Option<String>,
    },
    Buy {
        buyer: String,
        outcome: Outcome,
        amount: Decimal,
        #[serde(default)]
        to: Option<String>,
    },
    TogglePause {
        caller: String,
    },
    Resolve {
        caller: String,
        winner: u64,
    },
    Withdraw {
        caller: String,
    },
    Claim {
        caller: String,
    },
}

impl Step {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "deposit",
            Self::Buy { .. } => "buy",
            Self::TogglePause { .. } => "toggle_pause",
            Self::Resolve { .. } => "resolve",
            Self::Withdraw { .. } => "withdraw",
            Self::Claim { .. } => "claim",
        }
    }
}

/// Final state of a replay.
#[derive(Debug)]
pub struct Replay {
    pub market: Market<Vault>,
    pub applied: usize,
    pub rejected: usize,
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run every step in order. Rejected steps leave the market unchanged
    /// and are counted; with `strict` the first rejection aborts the replay.
    pub fn replay(&self, strict: bool) -> anyhow::Result<Replay> {
        let address = AccountId::from_label(&self.market);
        let mut market = Market::new(
            AccountId::from_label(&self.admin),
            self.config,
            Vault::new(address),
        )
        .context("opening market")?;

        let mut applied = 0;
        let mut rejected = 0;
        for (index, step) in self.steps.iter().enumerate() {
            match apply(&mut market, step) {
                Ok(summary) => {
                    applied += 1;
                    tracing::info!(step = index, op = step.name(), "{summary}");
                }
                Err(err) => {
                    rejected += 1;
                    tracing::warn!(step = index, op = step.name(), error = %err, "Step rejected");
                    if strict {
                        bail!("step {index} ({}) rejected: {err}", step.name());
                    }
                }
            }
        }

        Ok(Replay {
            market,
            applied,
            rejected,
        })
    }
}

fn apply(market: &mut Market<Vault>, step: &Step) -> whalemarket_types::Result<String> {
    let id = |label: &str| AccountId::from_label(label);
    let receiver = |market: &Market<Vault>, to: Option<&String>| {
        to.map_or_else(|| market.address(), |label| id(label))
    };

    match step {
        Step::Deposit { from, amount, to } => {
            let payment = Payment::new(
                id(from),
                receiver(market, to.as_ref()),
                units::from_decimal(*amount)?,
            );
            market.deposit(id(from), &payment)?;
            Ok(format!("{from} deposited {amount}"))
        }
        Step::Buy {
            buyer,
            outcome,
            amount,
            to,
        } => {
            let payment = Payment::new(
                id(buyer),
                receiver(market, to.as_ref()),
                units::from_decimal(*amount)?,
            );
            let fill = market.buy_shares(id(buyer), &payment, *outcome)?;
            Ok(format!(
                "{buyer} bought {} {outcome} at {}",
                units::to_decimal(fill.shares),
                units::to_decimal(fill.unit_price)
            ))
        }
        Step::TogglePause { caller } => {
            let status = market.toggle_pause(id(caller))?;
            Ok(format!("market is now {status}"))
        }
        Step::Resolve { caller, winner } => {
            let outcome = market.resolve_market(id(caller), *winner)?;
            Ok(format!("resolved in favour of {outcome}"))
        }
        Step::Withdraw { caller } => {
            let w = market.withdraw_house_profit(id(caller))?;
            Ok(format!(
                "{caller} withdrew {}, reserve {}",
                units::to_decimal(w.amount),
                units::to_decimal(w.reserve)
            ))
        }
        Step::Claim { caller } => {
            let claim = market.claim_winnings(id(caller))?;
            Ok(format!(
                "{caller} redeemed {} shares for {}",
                units::to_decimal(claim.shares),
                units::to_decimal(claim.payout)
            ))
        }
    }
}
