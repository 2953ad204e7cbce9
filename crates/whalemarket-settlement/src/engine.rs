//! Settlement engine: profit withdrawal and winner payouts.
//!
//! Runs only once a winner is known (callers pass the winning outcome,
//! which exists only for a resolved market):
//! 1. `withdraw_profit`: verify the collateral invariant, then pay the
//!    surplus above the outstanding reserve to the administrator
//! 2. `claim`: zero the caller's winning holding, pay the redemption, and
//!    restore the holding if the payout is refused
//!
//! Ledger bookkeeping is finalized before any payout, and every payout
//! failure rolls the bookkeeping back, so no operation ever leaves partial
//! state.

use whalemarket_ingress::ShareLedger;
use whalemarket_types::{AccountId, MarketError, MarketTotals, Outcome, Result};

use crate::custody::Custody;
use crate::reserve::ReserveBook;

/// Result of a profit withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    /// Amount paid to the administrator (zero when there was no surplus).
    pub amount: u64,
    /// Reserve left in custody for outstanding winners.
    pub reserve: u64,
}

/// Result of a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub account: AccountId,
    /// Share-units redeemed.
    pub shares: u64,
    /// Amount paid.
    pub payout: u64,
}

/// Settles a resolved market against its custody account.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    reserve: ReserveBook,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(redemption_per_share: u64) -> Self {
        Self {
            reserve: ReserveBook::new(redemption_per_share),
        }
    }

    /// Rebuild with shares already redeemed (snapshot restore).
    #[must_use]
    pub fn with_redeemed(redemption_per_share: u64, redeemed: u64) -> Self {
        Self {
            reserve: ReserveBook::with_redeemed(redemption_per_share, redeemed),
        }
    }

    /// Funds that must remain in custody for the outstanding winners.
    pub fn reserve_required(&self, winner: Outcome, totals: &MarketTotals) -> Result<u64> {
        self.reserve.required(totals.sold(winner))
    }

    /// Pay everything above the outstanding reserve to `admin`.
    ///
    /// Repeatable: each call withdraws only the current surplus. A zero
    /// surplus is not an error and moves nothing.
    ///
    /// # Errors
    /// - `InsufficientReserve` if custody holds less than the reserve
    /// - `TransferFailed` if the host refuses the payout
    pub fn withdraw_profit<C: Custody>(
        &self,
        winner: Outcome,
        totals: &MarketTotals,
        custody: &mut C,
        admin: AccountId,
    ) -> Result<Withdrawal> {
        let reserve = self.reserve_required(winner, totals)?;
        let balance = custody.balance();

        if let Err(err) = self.reserve.verify(balance, reserve) {
            tracing::error!(
                balance,
                reserve,
                %winner,
                "Collateral invariant broken: custody below winner reserve"
            );
            return Err(err);
        }

        let amount = balance - reserve;
        if amount > 0 {
            custody.pay(admin, amount)?;
        }

        Ok(Withdrawal { amount, reserve })
    }

    /// Redeem `account`'s winning holding.
    ///
    /// # Errors
    /// - `NoWinnings` if the account holds no winning shares
    /// - `ArithmeticOverflow` if the payout cannot be represented
    /// - `TransferFailed` if the host refuses the payout (holding restored)
    pub fn claim<C: Custody>(
        &mut self,
        winner: Outcome,
        ledger: &mut ShareLedger,
        custody: &mut C,
        account: AccountId,
    ) -> Result<Claim> {
        let shares = ledger.balance(account, winner);
        if shares == 0 {
            return Err(MarketError::NoWinnings { account });
        }
        let payout = self.reserve.payout_for(shares)?;
        let redeemed_after = self.reserve.redeemed_after(shares)?;

        // Zero first so a re-entrant claim finds nothing.
        let taken = ledger.take(account, winner);

        if payout > 0 {
            if let Err(err) = custody.pay(account, payout) {
                ledger.set_balance(account, winner, taken);
                tracing::warn!(
                    %account,
                    shares,
                    payout,
                    error = %err,
                    "Claim payout refused, holding restored"
                );
                return Err(err);
            }
        }

        self.reserve.set_redeemed(redeemed_after);
        Ok(Claim {
            account,
            shares,
            payout,
        })
    }

    /// Winning share-units already paid out.
    #[must_use]
    pub fn redeemed(&self) -> u64 {
        self.reserve.redeemed()
    }

    /// Access the reserve book.
    #[must_use]
    pub fn reserve(&self) -> &ReserveBook {
        &self.reserve
    }
}
