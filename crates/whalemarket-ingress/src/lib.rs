//! # whalemarket-ingress
//!
//! **Purchase plane**: payment validation, share issuance, and the
//! per-account share ledger.
//!
//! ## Architecture
//!
//! 1. **PurchaseFlow**: hard gate; checks lifecycle and limits, quotes the
//!    price, converts the payment into share-units
//! 2. **ShareLedger**: sparse (account, outcome) → share-units holdings
//!
//! ## Purchase Flow
//!
//! ```text
//! Payment → PurchaseFlow.prepare() → Fill → custody receives payment
//!         → PurchaseFlow.commit() → ShareLedger + MarketTotals
//! ```
//!
//! No shares are issued without a recorded payment.

pub mod purchase;
pub mod share_ledger;

pub use purchase::{Fill, PurchaseFlow, PurchaseRequest, shares_for};
pub use share_ledger::{LedgerEntry, ShareLedger};
