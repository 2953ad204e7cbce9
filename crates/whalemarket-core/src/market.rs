//! The market: one binary-outcome betting pool and its operation surface.
//!
//! ```text
//! buy_shares ──▶ PurchaseFlow.prepare ──▶ Custody.receive ──▶ PurchaseFlow.commit
//!                                                                 │
//! resolve_market ──▶ Resolved(winner) ◀───────────────────────────┘
//!        │
//!        ├──▶ withdraw_house_profit ──▶ SettlementEngine.withdraw_profit
//!        └──▶ claim_winnings        ──▶ SettlementEngine.claim
//! ```
//!
//! Every operation runs to completion or fails with no state change; each
//! committed one appends a receipt to the audit trail.

use whalemarket_ingress::{Fill, PurchaseFlow, PurchaseRequest, ShareLedger};
use whalemarket_settlement::{Claim, Custody, SettlementEngine, Withdrawal};
use whalemarket_types::{
    AccountId, AdminAction, MarketConfig, MarketError, MarketEvent, MarketId, MarketStatus,
    MarketTotals, Outcome, Payment, Receipt, Result, units,
};

use crate::access::AccessControl;
use crate::audit::AuditTrail;
use crate::snapshot::MarketSnapshot;

/// A single market instance over a custody account `C`.
#[derive(Debug)]
pub struct Market<C: Custody> {
    id: MarketId,
    access: AccessControl,
    config: MarketConfig,
    status: MarketStatus,
    totals: MarketTotals,
    ledger: ShareLedger,
    purchase: PurchaseFlow,
    settlement: SettlementEngine,
    custody: C,
    audit: AuditTrail,
}

impl<C: Custody> Market<C> {
    /// Open a new market administered by `admin`.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` is invalid.
    pub fn new(admin: AccountId, config: MarketConfig, custody: C) -> Result<Self> {
        config.validate()?;
        let id = MarketId::new();
        tracing::info!(
            market = %id,
            %admin,
            address = %custody.address(),
            base_price = %units::to_decimal(config.base_price),
            max_bet = %units::to_decimal(config.max_bet),
            "Market opened"
        );
        Ok(Self {
            id,
            access: AccessControl::new(admin),
            config,
            status: MarketStatus::Open,
            totals: MarketTotals::default(),
            ledger: ShareLedger::new(),
            purchase: PurchaseFlow::new(&config),
            settlement: SettlementEngine::new(config.redemption_per_share),
            custody,
            audit: AuditTrail::new(id),
        })
    }

    /// Rebuild a market from persisted state and the host's custody handle.
    ///
    /// # Errors
    /// - `Configuration` if the stored configuration is invalid
    /// - `LedgerInconsistent` if the ledger disagrees with the totals
    /// - `Serialization` if the audit head is malformed
    pub fn restore(snapshot: MarketSnapshot, custody: C) -> Result<Self> {
        snapshot.validate()?;
        let head = snapshot.audit_head_bytes()?;
        let ledger = ShareLedger::from_entries(&snapshot.ledger)?;
        let config = snapshot.config;

        tracing::info!(
            market = %snapshot.market_id,
            status = %snapshot.status,
            holders = snapshot.ledger.len(),
            "Market restored"
        );

        Ok(Self {
            id: snapshot.market_id,
            access: AccessControl::new(snapshot.admin),
            config,
            status: snapshot.status,
            totals: snapshot.totals,
            ledger,
            purchase: PurchaseFlow::new(&config),
            settlement: SettlementEngine::with_redeemed(
                config.redemption_per_share,
                snapshot.redeemed_shares,
            ),
            custody,
            audit: AuditTrail::resume(snapshot.market_id, snapshot.audit_sequence, head),
        })
    }

    /// Capture the persisted state layout.
    #[must_use]
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            market_id: self.id,
            admin: self.access.admin(),
            config: self.config,
            status: self.status,
            totals: self.totals,
            ledger: self.ledger.entries(),
            redeemed_shares: self.settlement.redeemed(),
            audit_sequence: self.audit.next_sequence(),
            audit_head: self.audit.head_hex(),
        }
    }

    // -----------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------

    /// Add funds to custody outside of a purchase (e.g. seed collateral).
    /// Accepted in every lifecycle state.
    ///
    /// # Errors
    /// - `ZeroAmount` for an empty payment
    /// - `WrongReceiver` if the payment is not addressed to the market
    /// - `TransferFailed` / `ArithmeticOverflow` from custody
    pub fn deposit(&mut self, sender: AccountId, payment: &Payment) -> Result<()> {
        if payment.amount == 0 {
            return Err(MarketError::ZeroAmount);
        }
        let address = self.custody.address();
        if payment.receiver != address {
            return Err(MarketError::WrongReceiver {
                expected: address,
                actual: payment.receiver,
            });
        }
        self.custody.receive(payment)?;
        self.audit.record(MarketEvent::Deposited {
            sender,
            amount: payment.amount,
        });
        tracing::info!(
            market = %self.id,
            %sender,
            amount = %units::to_decimal(payment.amount),
            balance = %units::to_decimal(self.custody.balance()),
            "Deposit received"
        );
        Ok(())
    }

    /// Buy shares of `outcome` with `payment`.
    ///
    /// # Errors
    /// - `MarketResolved` / `MarketPaused` when purchases are closed
    /// - `BetExceedsMax`, `WrongReceiver`, `DustPayment` on invalid payments
    /// - `ArithmeticOverflow` if a total would overflow
    /// - `TransferFailed` if custody refuses the payment
    pub fn buy_shares(
        &mut self,
        buyer: AccountId,
        payment: &Payment,
        outcome: Outcome,
    ) -> Result<Fill> {
        let fill = self.purchase.prepare(
            self.status,
            &self.totals,
            &self.ledger,
            self.custody.address(),
            PurchaseRequest {
                buyer,
                payment,
                outcome,
            },
        )?;

        self.custody.receive(payment)?;
        PurchaseFlow::commit(&fill, &mut self.totals, &mut self.ledger);

        self.audit.record(MarketEvent::SharesPurchased {
            buyer,
            outcome,
            amount: fill.amount,
            unit_price: fill.unit_price,
            shares: fill.shares,
        });
        tracing::info!(
            market = %self.id,
            %buyer,
            %outcome,
            amount = %units::to_decimal(fill.amount),
            unit_price = %units::to_decimal(fill.unit_price),
            shares = %units::to_decimal(fill.shares),
            "Shares purchased"
        );
        Ok(fill)
    }

    /// Flip between `Open` and `Paused`. Returns the new status.
    ///
    /// # Errors
    /// - `Unauthorized` for non-admin callers
    /// - `MarketResolved` once the market is resolved
    pub fn toggle_pause(&mut self, caller: AccountId) -> Result<MarketStatus> {
        self.access.authorize(caller, AdminAction::TogglePause)?;
        let next = match self.status {
            MarketStatus::Open => MarketStatus::Paused,
            MarketStatus::Paused => MarketStatus::Open,
            MarketStatus::Resolved { .. } => return Err(MarketError::MarketResolved),
        };
        self.status = next;
        self.audit.record(MarketEvent::PauseToggled {
            paused: next.is_paused(),
        });
        tracing::info!(market = %self.id, status = %next, "Pause toggled");
        Ok(next)
    }

    /// Declare the winner by wire code (1 = A, 2 = B).
    ///
    /// # Errors
    /// - `Unauthorized` for non-admin callers
    /// - `AlreadyResolved` on a second resolution
    /// - `InvalidOutcomeCode` for any other code
    pub fn resolve_market(&mut self, caller: AccountId, winner_code: u64) -> Result<Outcome> {
        self.access.authorize(caller, AdminAction::Resolve)?;
        self.ensure_unresolved()?;
        let winner = Outcome::from_code(winner_code)?;
        self.apply_resolution(winner);
        Ok(winner)
    }

    /// Declare the winner.
    ///
    /// # Errors
    /// - `Unauthorized` for non-admin callers
    /// - `AlreadyResolved` on a second resolution
    pub fn resolve_outcome(&mut self, caller: AccountId, winner: Outcome) -> Result<()> {
        self.access.authorize(caller, AdminAction::Resolve)?;
        self.ensure_unresolved()?;
        self.apply_resolution(winner);
        Ok(())
    }

    /// Pay the administrator everything above the outstanding winner
    /// reserve. Repeatable; a zero surplus moves nothing.
    ///
    /// # Errors
    /// - `Unauthorized` for non-admin callers
    /// - `NotResolved` before resolution
    /// - `InsufficientReserve` if custody no longer covers the reserve
    /// - `TransferFailed` if custody refuses the payout
    pub fn withdraw_house_profit(&mut self, caller: AccountId) -> Result<Withdrawal> {
        self.access.authorize(caller, AdminAction::WithdrawProfit)?;
        let winner = self.winner()?;
        let withdrawal = self.settlement.withdraw_profit(
            winner,
            &self.totals,
            &mut self.custody,
            self.access.admin(),
        )?;

        self.audit.record(MarketEvent::ProfitWithdrawn {
            admin: caller,
            amount: withdrawal.amount,
            reserve: withdrawal.reserve,
        });
        tracing::info!(
            market = %self.id,
            amount = %units::to_decimal(withdrawal.amount),
            reserve = %units::to_decimal(withdrawal.reserve),
            "House profit withdrawn"
        );
        Ok(withdrawal)
    }

    /// Redeem the caller's winning shares.
    ///
    /// # Errors
    /// - `NotResolved` before resolution
    /// - `NoWinnings` if the caller holds no winning shares
    /// - `TransferFailed` if custody refuses the payout (nothing changes)
    pub fn claim_winnings(&mut self, caller: AccountId) -> Result<Claim> {
        let winner = self.winner()?;
        let claim = self
            .settlement
            .claim(winner, &mut self.ledger, &mut self.custody, caller)?;

        self.audit.record(MarketEvent::WinningsClaimed {
            account: caller,
            shares: claim.shares,
            payout: claim.payout,
        });
        tracing::info!(
            market = %self.id,
            account = %caller,
            shares = %units::to_decimal(claim.shares),
            payout = %units::to_decimal(claim.payout),
            "Winnings claimed"
        );
        Ok(claim)
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Current unit price for `outcome`.
    #[must_use]
    pub fn get_price(&self, outcome: Outcome) -> u64 {
        self.purchase.quote(outcome, &self.totals)
    }

    #[must_use]
    pub fn balance_of(&self, account: AccountId, outcome: Outcome) -> u64 {
        self.ledger.balance(account, outcome)
    }

    #[must_use]
    pub fn totals(&self) -> MarketTotals {
        self.totals
    }

    #[must_use]
    pub fn status(&self) -> MarketStatus {
        self.status
    }

    #[must_use]
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    #[must_use]
    pub fn admin(&self) -> AccountId {
        self.access.admin()
    }

    #[must_use]
    pub fn id(&self) -> MarketId {
        self.id
    }

    /// The market's collection address.
    #[must_use]
    pub fn address(&self) -> AccountId {
        self.custody.address()
    }

    #[must_use]
    pub fn custody_balance(&self) -> u64 {
        self.custody.balance()
    }

    /// Funds that must stay in custody for the outstanding winners.
    ///
    /// # Errors
    /// Returns `NotResolved` before resolution.
    pub fn reserve_required(&self) -> Result<u64> {
        let winner = self.winner()?;
        self.settlement.reserve_required(winner, &self.totals)
    }

    /// Winning share-units already redeemed.
    #[must_use]
    pub fn redeemed_shares(&self) -> u64 {
        self.settlement.redeemed()
    }

    /// Receipts issued by this instance, oldest first.
    #[must_use]
    pub fn receipts(&self) -> &[Receipt] {
        self.audit.receipts()
    }

    #[must_use]
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    #[must_use]
    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// Host access to the custody account, e.g. to inject faults or to
    /// move it out once the market is closed.
    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn winner(&self) -> Result<Outcome> {
        self.status.winner().ok_or(MarketError::NotResolved)
    }

    fn ensure_unresolved(&self) -> Result<()> {
        if self.status.is_resolved() {
            return Err(MarketError::AlreadyResolved);
        }
        Ok(())
    }

    fn apply_resolution(&mut self, winner: Outcome) {
        self.status = MarketStatus::Resolved { winner };
        self.audit.record(MarketEvent::MarketResolved { winner });
        tracing::info!(
            market = %self.id,
            %winner,
            winning_shares = %units::to_decimal(self.totals.sold(winner)),
            losing_shares = %units::to_decimal(self.totals.sold(winner.other())),
            "Market resolved"
        );
    }
}
