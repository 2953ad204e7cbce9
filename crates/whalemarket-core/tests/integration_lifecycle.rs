//! Integration test: full market lifecycle
//!
//! OPEN → (PAUSED ⇄ OPEN) → RESOLVED → withdraw / claim
//!
//! Drives a market through every operation with an in-memory vault and
//! checks prices, holdings, custody and the audit trail at each step.

use whalemarket_core::Market;
use whalemarket_settlement::Vault;
use whalemarket_types::*;

fn admin() -> AccountId {
    AccountId::from_label("house")
}

fn new_market(config: MarketConfig) -> Market<Vault> {
    Market::new(admin(), config, Vault::new(AccountId::from_label("pool"))).unwrap()
}

fn pay(market: &Market<Vault>, from: AccountId, amount: u64) -> Payment {
    Payment::new(from, market.address(), amount)
}

#[test]
fn reference_price_example() {
    // base 0.51, one 0.01 tick per 10_000 share-units of lead
    let mut market = new_market(MarketConfig::default());
    assert_eq!(market.get_price(Outcome::A), 510_000);

    // 12_750 micro-units at 0.51 buys exactly 25_000 share-units.
    let alice = AccountId::from_label("alice");
    let p = pay(&market, alice, 12_750);
    let fill = market.buy_shares(alice, &p, Outcome::A).unwrap();
    assert_eq!(fill.shares, 25_000);
    assert_eq!(market.totals(), MarketTotals::new(25_000, 0));

    // lead 25_000 → two full ticks → 0.53
    assert_eq!(market.get_price(Outcome::A), 530_000);
    // trailing side stays at the floor
    assert_eq!(market.get_price(Outcome::B), 510_000);
}

#[test]
fn full_cycle_with_seed_collateral() {
    let mut market = new_market(MarketConfig::default());
    let alice = AccountId::from_label("alice");
    let bob = AccountId::from_label("bob");
    let carol = AccountId::from_label("carol");

    // =====================================================================
    // SEED: the house funds the pool so winners can always be paid
    // =====================================================================
    let seed = pay(&market, admin(), 5_000_000);
    market.deposit(admin(), &seed).unwrap();

    // =====================================================================
    // TRADE: purchases on both sides
    // =====================================================================
    let p = pay(&market, alice, 1_000_000);
    let a1 = market.buy_shares(alice, &p, Outcome::A).unwrap();
    assert_eq!(a1.unit_price, 510_000);
    assert_eq!(a1.shares, 1_960_784);

    // A now leads by 1_960_784 → 196 ticks
    assert_eq!(market.get_price(Outcome::A), 510_000 + 196 * 10_000);

    let p = pay(&market, bob, 2_000_000);
    let b1 = market.buy_shares(bob, &p, Outcome::B).unwrap();
    assert_eq!(b1.unit_price, 510_000);
    assert_eq!(b1.shares, 3_921_568);

    let p = pay(&market, carol, 500_000);
    let a2 = market.buy_shares(carol, &p, Outcome::A).unwrap();
    assert_eq!(a2.unit_price, 510_000, "A trails, so it quotes the floor");

    let totals = market.totals();
    assert_eq!(totals.sold_a, a1.shares + a2.shares);
    assert_eq!(totals.sold_b, b1.shares);
    assert_eq!(market.custody_balance(), 8_500_000);

    // =====================================================================
    // PAUSE: purchases blocked, then resumed
    // =====================================================================
    assert_eq!(market.toggle_pause(admin()).unwrap(), MarketStatus::Paused);
    let p = pay(&market, bob, 1_000_000);
    assert_eq!(
        market.buy_shares(bob, &p, Outcome::B).unwrap_err(),
        MarketError::MarketPaused
    );
    assert_eq!(market.toggle_pause(admin()).unwrap(), MarketStatus::Open);

    // =====================================================================
    // RESOLVE: B wins (wire code 2)
    // =====================================================================
    assert_eq!(market.resolve_market(admin(), 2).unwrap(), Outcome::B);
    assert_eq!(market.status().winner(), Some(Outcome::B));
    let p = pay(&market, alice, 1_000_000);
    assert_eq!(
        market.buy_shares(alice, &p, Outcome::A).unwrap_err(),
        MarketError::MarketResolved
    );

    // =====================================================================
    // SETTLE: house takes the surplus, winner redeems
    // =====================================================================
    let reserve = market.reserve_required().unwrap();
    assert_eq!(reserve, b1.shares);

    let w = market.withdraw_house_profit(admin()).unwrap();
    assert_eq!(w.reserve, reserve);
    assert_eq!(w.amount, 8_500_000 - reserve);
    assert_eq!(market.custody_balance(), reserve);

    let claim = market.claim_winnings(bob).unwrap();
    assert_eq!(claim.payout, b1.shares);
    assert_eq!(market.balance_of(bob, Outcome::B), 0);
    assert_eq!(market.custody_balance(), 0);
    assert_eq!(market.redeemed_shares(), b1.shares);

    // Losers have nothing to claim.
    assert!(matches!(
        market.claim_winnings(alice).unwrap_err(),
        MarketError::NoWinnings { .. }
    ));

    // Nothing left for the house either.
    let w = market.withdraw_house_profit(admin()).unwrap();
    assert_eq!(w.amount, 0);

    // =====================================================================
    // AUDIT: one receipt per committed operation, chain intact
    // =====================================================================
    let labels: Vec<&str> = market.receipts().iter().map(|r| r.event.label()).collect();
    assert_eq!(
        labels,
        vec![
            "DEPOSITED",
            "SHARES_PURCHASED",
            "SHARES_PURCHASED",
            "SHARES_PURCHASED",
            "PAUSE_TOGGLED",
            "PAUSE_TOGGLED",
            "MARKET_RESOLVED",
            "PROFIT_WITHDRAWN",
            "WINNINGS_CLAIMED",
            "PROFIT_WITHDRAWN",
        ]
    );
    assert!(market.audit().verify().is_ok());
}

#[test]
fn resolution_allowed_while_paused() {
    let mut market = new_market(MarketConfig::default());
    market.toggle_pause(admin()).unwrap();
    market.resolve_outcome(admin(), Outcome::A).unwrap();
    assert_eq!(market.status(), MarketStatus::Resolved { winner: Outcome::A });
    assert!(!market.status().is_paused());
}

#[test]
fn custom_redemption_multiplier_applies_to_reserve_and_claims() {
    // Half a unit per whole share.
    let mut market = new_market(MarketConfig {
        base_price: 250_000,
        redemption_per_share: 500_000,
        ..MarketConfig::default()
    });
    let alice = AccountId::from_label("alice");
    let p = pay(&market, alice, 1_000_000);
    let fill = market.buy_shares(alice, &p, Outcome::A).unwrap();
    assert_eq!(fill.shares, 4_000_000);

    market.resolve_outcome(admin(), Outcome::A).unwrap();
    assert_eq!(market.reserve_required().unwrap(), 2_000_000);

    // Custody holds only the 1_000_000 paid in: the pool is short.
    assert!(matches!(
        market.withdraw_house_profit(admin()).unwrap_err(),
        MarketError::InsufficientReserve { .. }
    ));

    let top_up = pay(&market, admin(), 1_000_000);
    market.deposit(admin(), &top_up).unwrap();
    assert_eq!(market.withdraw_house_profit(admin()).unwrap().amount, 0);

    let claim = market.claim_winnings(alice).unwrap();
    assert_eq!(claim.payout, 2_000_000);
    assert_eq!(market.custody_balance(), 0);
}

#[test]
fn max_bet_boundary() {
    let mut market = new_market(MarketConfig {
        max_bet: 2_000_000,
        ..MarketConfig::default()
    });
    let whale = AccountId::from_label("whale");
    let at_limit = pay(&market, whale, 2_000_000);
    assert!(market.buy_shares(whale, &at_limit, Outcome::B).is_ok());
    let over = pay(&market, whale, 2_000_001);
    assert_eq!(
        market.buy_shares(whale, &over, Outcome::B).unwrap_err(),
        MarketError::BetExceedsMax {
            amount: 2_000_001,
            max: 2_000_000
        }
    );
}
