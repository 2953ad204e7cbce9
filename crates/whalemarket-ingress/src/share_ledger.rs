//! Share ledger.
//!
//! Tracks share-units per (account, outcome). Entries exist only for
//! accounts that have bought; an absent entry reads as zero. All mutations
//! are atomic: either the full operation succeeds or the ledger is
//! unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use whalemarket_types::{AccountId, MarketError, Outcome, Result};

/// One ledger row, used for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub account: AccountId,
    pub outcome: Outcome,
    pub shares: u64,
}

/// Sparse per-account, per-outcome share holdings.
///
/// Written only by the purchase flow (credit) and the settlement engine
/// (take / set_balance).
#[derive(Debug, Clone, Default)]
pub struct ShareLedger {
    balances: HashMap<(AccountId, Outcome), u64>,
}

impl ShareLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Rebuild a ledger from snapshot rows.
    ///
    /// # Errors
    /// Returns `LedgerInconsistent` if the same (account, outcome) appears twice.
    pub fn from_entries(entries: &[LedgerEntry]) -> Result<Self> {
        let mut ledger = Self::new();
        for entry in entries {
            if ledger
                .balances
                .insert((entry.account, entry.outcome), entry.shares)
                .is_some()
            {
                return Err(MarketError::LedgerInconsistent {
                    reason: format!("duplicate entry for {} / {}", entry.account, entry.outcome),
                });
            }
        }
        Ok(ledger)
    }

    /// Add shares to a holding, creating the entry on first purchase.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the holding would exceed `u64::MAX`.
    pub fn credit(&mut self, account: AccountId, outcome: Outcome, shares: u64) -> Result<()> {
        let entry = self.balances.entry((account, outcome)).or_insert(0);
        *entry = entry
            .checked_add(shares)
            .ok_or(MarketError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Zero a holding and return what it held. The entry stays, at zero.
    pub fn take(&mut self, account: AccountId, outcome: Outcome) -> u64 {
        match self.balances.get_mut(&(account, outcome)) {
            Some(shares) => std::mem::take(shares),
            None => 0,
        }
    }

    /// Overwrite a holding. Used to apply a precomputed purchase and to put
    /// back shares removed by [`take`](Self::take) when the operation that
    /// took them is aborted.
    pub fn set_balance(&mut self, account: AccountId, outcome: Outcome, shares: u64) {
        self.balances.insert((account, outcome), shares);
    }

    /// Shares held; zero for accounts that never bought.
    #[must_use]
    pub fn balance(&self, account: AccountId, outcome: Outcome) -> u64 {
        self.balances
            .get(&(account, outcome))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all holdings for an outcome.
    #[must_use]
    pub fn total(&self, outcome: Outcome) -> u128 {
        self.balances
            .iter()
            .filter(|((_, o), _)| *o == outcome)
            .map(|(_, shares)| u128::from(*shares))
            .sum()
    }

    /// Number of accounts holding a non-zero balance of `outcome`.
    #[must_use]
    pub fn holders(&self, outcome: Outcome) -> usize {
        self.balances
            .iter()
            .filter(|((_, o), shares)| *o == outcome && **shares > 0)
            .count()
    }

    /// All rows, sorted by (account, outcome) for deterministic snapshots.
    #[must_use]
    pub fn entries(&self) -> Vec<LedgerEntry> {
        let mut rows: Vec<LedgerEntry> = self
            .balances
            .iter()
            .map(|(&(account, outcome), &shares)| LedgerEntry {
                account,
                outcome,
                shares,
            })
            .collect();
        rows.sort_by_key(|row| (row.account, row.outcome));
        rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
