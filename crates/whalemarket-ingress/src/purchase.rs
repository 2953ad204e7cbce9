//! Purchase flow: hard gate from an incoming payment to issued shares.
//!
//! A purchase runs in two steps so that nothing is written until every
//! check has passed:
//!
//! 1. [`PurchaseFlow::prepare`] validates the payment against the market
//!    status and configured limits, quotes the price and converts the
//!    payment into share-units, producing a [`Fill`]
//! 2. [`PurchaseFlow::commit`] applies the fill to the ledger and totals
//!
//! Every overflow is detected in `prepare`, so `commit` cannot fail and the
//! caller may take custody of the payment between the two steps.
//!
//! Preconditions are checked in a fixed order and the first failure wins:
//! not resolved, not paused, within `max_bet`, paid to the market, and
//! buying at least one share-unit.

use whalemarket_pricing::PricingEngine;
use whalemarket_types::{
    AccountId, MarketConfig, MarketError, MarketStatus, MarketTotals, Outcome, Payment, Result,
    constants,
};

use crate::share_ledger::ShareLedger;

/// A buyer's request: who pays, what they sent, and which side they back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseRequest<'a> {
    pub buyer: AccountId,
    pub payment: &'a Payment,
    pub outcome: Outcome,
}

/// A validated purchase, ready to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub buyer: AccountId,
    pub outcome: Outcome,
    /// Payment amount in micro-units.
    pub amount: u64,
    /// Unit price the shares were bought at.
    pub unit_price: u64,
    /// Share-units issued.
    pub shares: u64,
    /// Buyer's holding of `outcome` once the fill is applied.
    pub holding_after: u64,
    /// Aggregate totals once the fill is applied.
    pub totals_after: MarketTotals,
}

/// Converts payments into shares under the market's pricing and limits.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseFlow {
    pricing: PricingEngine,
    max_bet: u64,
}

impl PurchaseFlow {
    #[must_use]
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            pricing: PricingEngine::new(config),
            max_bet: config.max_bet,
        }
    }

    /// Current unit price for `outcome`.
    #[must_use]
    pub fn quote(&self, outcome: Outcome, totals: &MarketTotals) -> u64 {
        self.pricing.quote(outcome, totals)
    }

    /// Validate a purchase and compute its fill without touching any state.
    ///
    /// # Errors
    /// - `MarketResolved` / `MarketPaused` if purchases are closed
    /// - `BetExceedsMax` if the payment is above the limit
    /// - `WrongReceiver` if the payment was not sent to `market_address`
    /// - `DustPayment` if the payment buys zero share-units
    /// - `ArithmeticOverflow` if a holding or total would overflow
    pub fn prepare(
        &self,
        status: MarketStatus,
        totals: &MarketTotals,
        ledger: &ShareLedger,
        market_address: AccountId,
        request: PurchaseRequest<'_>,
    ) -> Result<Fill> {
        let PurchaseRequest {
            buyer,
            payment,
            outcome,
        } = request;

        // 1. Lifecycle gates: resolution wins over pause.
        match status {
            MarketStatus::Resolved { .. } => return Err(MarketError::MarketResolved),
            MarketStatus::Paused => return Err(MarketError::MarketPaused),
            MarketStatus::Open => {}
        }

        // 2. Per-purchase limit
        if payment.amount > self.max_bet {
            return Err(MarketError::BetExceedsMax {
                amount: payment.amount,
                max: self.max_bet,
            });
        }

        // 3. The payment must land in the market, not elsewhere
        if payment.receiver != market_address {
            return Err(MarketError::WrongReceiver {
                expected: market_address,
                actual: payment.receiver,
            });
        }

        // 4. Price and convert
        let unit_price = self.quote(outcome, totals);
        let shares = shares_for(payment.amount, unit_price)?;
        if shares == 0 {
            return Err(MarketError::DustPayment {
                amount: payment.amount,
                unit_price,
            });
        }

        // 5. Everything the commit will write, computed checked
        let totals_after = totals.with_sale(outcome, shares)?;
        let holding_after = ledger
            .balance(buyer, outcome)
            .checked_add(shares)
            .ok_or(MarketError::ArithmeticOverflow)?;

        tracing::debug!(
            %buyer,
            %outcome,
            amount = payment.amount,
            unit_price,
            shares,
            "Purchase validated"
        );

        Ok(Fill {
            buyer,
            outcome,
            amount: payment.amount,
            unit_price,
            shares,
            holding_after,
            totals_after,
        })
    }

    /// Apply a fill produced by [`prepare`](Self::prepare) against the same
    /// ledger and totals.
    pub fn commit(fill: &Fill, totals: &mut MarketTotals, ledger: &mut ShareLedger) {
        ledger.set_balance(fill.buyer, fill.outcome, fill.holding_after);
        *totals = fill.totals_after;
    }
}

/// `floor(amount * SCALE / unit_price)`.
///
/// # Errors
/// Returns `ArithmeticOverflow` if the share count does not fit in `u64`.
pub fn shares_for(amount: u64, unit_price: u64) -> Result<u64> {
    if unit_price == 0 {
        return Err(MarketError::ArithmeticOverflow);
    }
    let shares = u128::from(amount) * u128::from(constants::SCALE) / u128::from(unit_price);
    u64::try_from(shares).map_err(|_| MarketError::ArithmeticOverflow)
}
