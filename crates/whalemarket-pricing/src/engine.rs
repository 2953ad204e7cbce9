//! Demand-skewed unit pricing.
//!
//! ```text
//! lead  = sold[outcome] - sold[other]          (only when strictly ahead)
//! price = base_price + floor(lead / skew_sensitivity) * price_step
//! ```
//!
//! A tied or trailing outcome always quotes `base_price`. The quote is a
//! pure function of the two current totals: no history, no time decay.

use whalemarket_types::{MarketConfig, MarketTotals, Outcome};

/// Quotes the current unit price (micro-units per whole share) for either
/// outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    base_price: u64,
    skew_sensitivity: u64,
    price_step: u64,
}

impl PricingEngine {
    /// Build from a validated configuration.
    #[must_use]
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            base_price: config.base_price,
            // Validated configs never carry zero; clamp so `quote` cannot panic.
            skew_sensitivity: config.skew_sensitivity.max(1),
            price_step: config.price_step,
        }
    }

    /// Current unit price for `outcome` given `totals`.
    ///
    /// Saturates at `u64::MAX` rather than wrapping for absurd leads.
    #[must_use]
    pub fn quote(&self, outcome: Outcome, totals: &MarketTotals) -> u64 {
        let lead = totals.lead(outcome);
        if lead == 0 {
            return self.base_price;
        }
        let ticks = lead / self.skew_sensitivity;
        let price = self
            .base_price
            .saturating_add(ticks.saturating_mul(self.price_step));
        tracing::debug!(
            %outcome,
            sold_a = totals.sold_a,
            sold_b = totals.sold_b,
            lead,
            ticks,
            price,
            "Quoted unit price"
        );
        price
    }

    /// Quotes for both outcomes, in `(A, B)` order.
    #[must_use]
    pub fn quote_both(&self, totals: &MarketTotals) -> (u64, u64) {
        (self.quote(Outcome::A, totals), self.quote(Outcome::B, totals))
    }

    #[must_use]
    pub fn base_price(&self) -> u64 {
        self.base_price
    }
}
