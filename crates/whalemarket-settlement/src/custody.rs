//! Custody seam to the hosting ledger.
//!
//! The core never moves value itself. It tells a [`Custody`] implementation
//! that a payment arrived or that a payout must be sent, and the host
//! performs the transfer atomically (or refuses it). [`Vault`] is the
//! in-memory implementation used by tests and the scenario tool.

use serde::{Deserialize, Serialize};
use whalemarket_types::{AccountId, MarketError, Payment, Result};

/// Value held on behalf of one market.
pub trait Custody {
    /// The market's own collection address.
    fn address(&self) -> AccountId;

    /// Funds currently held, in micro-units.
    fn balance(&self) -> u64;

    /// Record an inbound payment addressed to [`address`](Self::address).
    fn receive(&mut self, payment: &Payment) -> Result<()>;

    /// Send `amount` to `to`. Either the whole amount moves or nothing does.
    fn pay(&mut self, to: AccountId, amount: u64) -> Result<()>;
}

/// Direction of a recorded transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDirection {
    Inbound,
    Outbound,
}

/// One movement of funds through the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub direction: TransferDirection,
    pub counterparty: AccountId,
    pub amount: u64,
}

/// In-memory custody account with a full transfer history.
#[derive(Debug, Clone)]
pub struct Vault {
    address: AccountId,
    balance: u64,
    history: Vec<Transfer>,
    refuse_next_payout: Option<String>,
}

impl Vault {
    /// Create an empty vault at `address`.
    #[must_use]
    pub fn new(address: AccountId) -> Self {
        Self {
            address,
            balance: 0,
            history: Vec::new(),
            refuse_next_payout: None,
        }
    }

    /// Every transfer, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Transfer] {
        &self.history
    }

    /// Total paid out to `account`.
    #[must_use]
    pub fn paid_to(&self, account: AccountId) -> u64 {
        self.history
            .iter()
            .filter(|t| t.direction == TransferDirection::Outbound && t.counterparty == account)
            .map(|t| t.amount)
            .sum()
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Vault {
    /// Make the next [`Custody::pay`] fail with `reason`.
    pub fn refuse_next_payout(&mut self, reason: &str) {
        self.refuse_next_payout = Some(reason.to_string());
    }

    /// Remove funds without any recorded transfer, simulating a host-side
    /// loss the market's bookkeeping cannot know about.
    pub fn leak(&mut self, amount: u64) {
        self.balance = self.balance.saturating_sub(amount);
    }
}

impl Custody for Vault {
    fn address(&self) -> AccountId {
        self.address
    }

    fn balance(&self) -> u64 {
        self.balance
    }

    fn receive(&mut self, payment: &Payment) -> Result<()> {
        if payment.receiver != self.address {
            return Err(MarketError::TransferFailed {
                reason: format!(
                    "payment addressed to {}, vault is {}",
                    payment.receiver, self.address
                ),
            });
        }
        self.balance = self
            .balance
            .checked_add(payment.amount)
            .ok_or(MarketError::ArithmeticOverflow)?;
        self.history.push(Transfer {
            direction: TransferDirection::Inbound,
            counterparty: payment.sender,
            amount: payment.amount,
        });
        Ok(())
    }

    fn pay(&mut self, to: AccountId, amount: u64) -> Result<()> {
        if let Some(reason) = self.refuse_next_payout.take() {
            return Err(MarketError::TransferFailed { reason });
        }
        if amount > self.balance {
            return Err(MarketError::TransferFailed {
                reason: format!("vault holds {}, cannot pay {amount}", self.balance),
            });
        }
        self.balance -= amount;
        self.history.push(Transfer {
            direction: TransferDirection::Outbound,
            counterparty: to,
            amount,
        });
        Ok(())
    }
}
