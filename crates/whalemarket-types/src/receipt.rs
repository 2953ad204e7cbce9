//! Receipts for the market's append-only audit trail.
//!
//! Every committed operation produces a [`Receipt`] whose hash commits to
//! the event and to the previous receipt's hash, forming a chain that can
//! be re-verified from the genesis hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, MarketId, Outcome, constants};

/// A committed state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// Funds added to custody outside a purchase.
    Deposited { sender: AccountId, amount: u64 },
    /// Shares issued against a payment.
    SharesPurchased {
        buyer: AccountId,
        outcome: Outcome,
        amount: u64,
        unit_price: u64,
        shares: u64,
    },
    /// The pause flag flipped.
    PauseToggled { paused: bool },
    /// Winner declared.
    MarketResolved { winner: Outcome },
    /// Surplus above the reserve paid to the administrator.
    ProfitWithdrawn { admin: AccountId, amount: u64, reserve: u64 },
    /// A winning holder redeemed their shares.
    WinningsClaimed {
        account: AccountId,
        shares: u64,
        payout: u64,
    },
}

impl MarketEvent {
    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "DEPOSITED",
            Self::SharesPurchased { .. } => "SHARES_PURCHASED",
            Self::PauseToggled { .. } => "PAUSE_TOGGLED",
            Self::MarketResolved { .. } => "MARKET_RESOLVED",
            Self::ProfitWithdrawn { .. } => "PROFIT_WITHDRAWN",
            Self::WinningsClaimed { .. } => "WINNINGS_CLAIMED",
        }
    }
}

/// One link of the audit chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in the chain, starting at 0.
    pub sequence: u64,
    /// The market that issued this receipt.
    pub market_id: MarketId,
    pub event: MarketEvent,
    /// Hash of the previous receipt (genesis hash for the first).
    pub prev_hash: [u8; 32],
    /// SHA-256 over domain, market, sequence, previous hash and event.
    pub hash: [u8; 32],
    /// Wall-clock time of issue. Not covered by the hash.
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    /// Build the receipt following `prev_hash`.
    #[must_use]
    pub fn issue(market_id: MarketId, sequence: u64, prev_hash: [u8; 32], event: MarketEvent) -> Self {
        let hash = Self::compute_hash(market_id, sequence, &prev_hash, &event);
        Self {
            sequence,
            market_id,
            event,
            prev_hash,
            hash,
            issued_at: Utc::now(),
        }
    }

    /// The hash every chain starts from for a given market.
    #[must_use]
    pub fn genesis_hash(market_id: MarketId) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::RECEIPT_DOMAIN);
        hasher.update(b"genesis:");
        hasher.update(market_id.0.as_bytes());
        hasher.finalize().into()
    }

    #[must_use]
    pub fn compute_hash(
        market_id: MarketId,
        sequence: u64,
        prev_hash: &[u8; 32],
        event: &MarketEvent,
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::RECEIPT_DOMAIN);
        hasher.update(market_id.0.as_bytes());
        hasher.update(sequence.to_le_bytes());
        hasher.update(prev_hash);
        hasher.update(event_bytes(event));
        hasher.finalize().into()
    }

    /// Whether the stored hash matches the receipt's contents.
    #[must_use]
    pub fn is_intact(&self) -> bool {
        Self::compute_hash(self.market_id, self.sequence, &self.prev_hash, &self.event) == self.hash
    }

    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Canonical byte encoding of an event: a tag byte then fixed-width fields.
fn event_bytes(event: &MarketEvent) -> Vec<u8> {
    let mut out = Vec::with_capacity(96);
    match event {
        MarketEvent::Deposited { sender, amount } => {
            out.push(1);
            out.extend_from_slice(sender.as_bytes());
            out.extend_from_slice(&amount.to_le_bytes());
        }
        MarketEvent::SharesPurchased {
            buyer,
            outcome,
            amount,
            unit_price,
            shares,
        } => {
            out.push(2);
            out.extend_from_slice(buyer.as_bytes());
            out.extend_from_slice(&outcome.code().to_le_bytes());
            out.extend_from_slice(&amount.to_le_bytes());
            out.extend_from_slice(&unit_price.to_le_bytes());
            out.extend_from_slice(&shares.to_le_bytes());
        }
        MarketEvent::PauseToggled { paused } => {
            out.push(3);
            out.push(u8::from(*paused));
        }
        MarketEvent::MarketResolved { winner } => {
            out.push(4);
            out.extend_from_slice(&winner.code().to_le_bytes());
        }
        MarketEvent::ProfitWithdrawn {
            admin,
            amount,
            reserve,
        } => {
            out.push(5);
            out.extend_from_slice(admin.as_bytes());
            out.extend_from_slice(&amount.to_le_bytes());
            out.extend_from_slice(&reserve.to_le_bytes());
        }
        MarketEvent::WinningsClaimed {
            account,
            shares,
            payout,
        } => {
            out.push(6);
            out.extend_from_slice(account.as_bytes());
            out.extend_from_slice(&shares.to_le_bytes());
            out.extend_from_slice(&payout.to_le_bytes());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase(shares: u64) -> MarketEvent {
        MarketEvent::SharesPurchased {
            buyer: AccountId::from_seed(1),
            outcome: Outcome::A,
            amount: 1_000_000,
            unit_price: 510_000,
            shares,
        }
    }

    #[test]
    fn issued_receipt_is_intact() {
        let market = MarketId::new();
        let r = Receipt::issue(market, 0, Receipt::genesis_hash(market), purchase(10));
        assert!(r.is_intact());
        assert_eq!(r.hash_hex().len(), 64);
    }

    #[test]
    fn tampered_event_detected() {
        let market = MarketId::new();
        let mut r = Receipt::issue(market, 0, Receipt::genesis_hash(market), purchase(10));
        r.event = purchase(11);
        assert!(!r.is_intact());
    }

    #[test]
    fn hash_depends_on_prev_and_sequence() {
        let market = MarketId::new();
        let event = MarketEvent::PauseToggled { paused: true };
        let a = Receipt::compute_hash(market, 0, &[0; 32], &event);
        let b = Receipt::compute_hash(market, 1, &[0; 32], &event);
        let c = Receipt::compute_hash(market, 0, &[1; 32], &event);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn genesis_differs_per_market() {
        assert_ne!(
            Receipt::genesis_hash(MarketId::new()),
            Receipt::genesis_hash(MarketId::new())
        );
    }

    #[test]
    fn event_labels() {
        assert_eq!(purchase(1).label(), "SHARES_PURCHASED");
        assert_eq!(
            MarketEvent::MarketResolved { winner: Outcome::B }.label(),
            "MARKET_RESOLVED"
        );
    }
}
