//! Winner reserve bookkeeping.
//!
//! Collateral invariant enforced before any profit leaves custody:
//! ```text
//! custody_balance >= payout_for(sold[winner] - redeemed)
//! ```
//!
//! The same `payout_for` rule prices individual claims, so the reserve is
//! always at least the sum of every remaining claim (a floor of a sum is
//! never below the sum of floors). If the invariant is found broken, the
//! market's accounting is inconsistent and the operation aborts.

use whalemarket_types::{MarketError, Result, constants};

/// Tracks redeemed winning shares and prices the outstanding liability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveBook {
    /// Payout per whole share (`SCALE` share-units).
    redemption_per_share: u64,
    /// Winning share-units already paid out.
    redeemed: u64,
}

impl ReserveBook {
    #[must_use]
    pub fn new(redemption_per_share: u64) -> Self {
        Self {
            redemption_per_share,
            redeemed: 0,
        }
    }

    /// Rebuild with a known redeemed count (snapshot restore).
    #[must_use]
    pub fn with_redeemed(redemption_per_share: u64, redeemed: u64) -> Self {
        Self {
            redemption_per_share,
            redeemed,
        }
    }

    /// `floor(shares * redemption_per_share / SCALE)`.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the payout does not fit in `u64`.
    pub fn payout_for(&self, shares: u64) -> Result<u64> {
        let payout = u128::from(shares) * u128::from(self.redemption_per_share)
            / u128::from(constants::SCALE);
        u64::try_from(payout).map_err(|_| MarketError::ArithmeticOverflow)
    }

    /// Winning share-units not yet redeemed.
    ///
    /// # Errors
    /// Returns `LedgerInconsistent` if more shares were redeemed than sold.
    pub fn outstanding(&self, winning_total: u64) -> Result<u64> {
        winning_total
            .checked_sub(self.redeemed)
            .ok_or_else(|| MarketError::LedgerInconsistent {
                reason: format!(
                    "redeemed {} exceeds winning total {winning_total}",
                    self.redeemed
                ),
            })
    }

    /// Funds that must stay in custody to pay every remaining winner.
    pub fn required(&self, winning_total: u64) -> Result<u64> {
        self.payout_for(self.outstanding(winning_total)?)
    }

    /// Check the collateral invariant.
    ///
    /// # Errors
    /// Returns [`MarketError::InsufficientReserve`] if `balance < required`.
    pub fn verify(&self, balance: u64, required: u64) -> Result<()> {
        if balance < required {
            return Err(MarketError::InsufficientReserve { balance, required });
        }
        Ok(())
    }

    /// Redeemed count after redeeming `shares` more, without applying it.
    pub fn redeemed_after(&self, shares: u64) -> Result<u64> {
        self.redeemed
            .checked_add(shares)
            .ok_or(MarketError::ArithmeticOverflow)
    }

    /// Commit a redeemed count computed by [`redeemed_after`](Self::redeemed_after).
    pub fn set_redeemed(&mut self, redeemed: u64) {
        self.redeemed = redeemed;
    }

    #[must_use]
    pub fn redeemed(&self) -> u64 {
        self.redeemed
    }

    #[must_use]
    pub fn redemption_per_share(&self) -> u64 {
        self.redemption_per_share
    }
}
