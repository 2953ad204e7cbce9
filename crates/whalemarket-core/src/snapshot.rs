//! Serializable market state.
//!
//! A [`MarketSnapshot`] carries everything the hosting ledger must persist
//! between calls: identity, administrator, configuration, lifecycle status,
//! aggregate totals, the share ledger, the redeemed counter and the audit
//! head. Custody is not included; the host supplies its own handle when
//! restoring.

use serde::{Deserialize, Serialize};
use whalemarket_ingress::LedgerEntry;
use whalemarket_types::{
    AccountId, MarketConfig, MarketError, MarketId, MarketStatus, MarketTotals, Outcome, Result,
};

/// Persisted state layout of one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub market_id: MarketId,
    pub admin: AccountId,
    pub config: MarketConfig,
    pub status: MarketStatus,
    pub totals: MarketTotals,
    /// Ledger rows sorted by (account, outcome).
    pub ledger: Vec<LedgerEntry>,
    /// Winning share-units already redeemed.
    pub redeemed_shares: u64,
    /// Sequence number the next audit receipt will carry.
    pub audit_sequence: u64,
    /// Hex hash of the latest audit receipt.
    pub audit_head: String,
}

impl MarketSnapshot {
    /// Check that the snapshot describes a reachable market state.
    ///
    /// # Errors
    /// - `Configuration` if the configuration is invalid
    /// - `LedgerInconsistent` if ledger rows disagree with the totals or
    ///   redemptions appear before resolution
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;

        let winner = self.status.winner();
        if winner.is_none() && self.redeemed_shares > 0 {
            return Err(MarketError::LedgerInconsistent {
                reason: format!(
                    "{} shares redeemed while market is {}",
                    self.redeemed_shares, self.status
                ),
            });
        }

        for outcome in Outcome::ALL {
            let held: u128 = self
                .ledger
                .iter()
                .filter(|row| row.outcome == outcome)
                .map(|row| u128::from(row.shares))
                .sum();
            let redeemed = if winner == Some(outcome) {
                u128::from(self.redeemed_shares)
            } else {
                0
            };
            let sold = u128::from(self.totals.sold(outcome));
            if held + redeemed != sold {
                return Err(MarketError::LedgerInconsistent {
                    reason: format!(
                        "{outcome}: ledger holds {held} + redeemed {redeemed}, totals say {sold}"
                    ),
                });
            }
        }
        Ok(())
    }

    /// Decode the audit head.
    ///
    /// # Errors
    /// Returns `Serialization` if the head is not 32 hex-encoded bytes.
    pub fn audit_head_bytes(&self) -> Result<[u8; 32]> {
        let bytes = hex::decode(&self.audit_head)
            .map_err(|e| MarketError::Serialization(format!("audit head: {e}")))?;
        <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
            MarketError::Serialization(format!(
                "audit head: expected 32 bytes, got {}",
                bytes.len()
            ))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
