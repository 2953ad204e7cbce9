//! # whalemarket-settlement
//!
//! **Finality plane**: custody seam, winner reserve, profit withdrawal and
//! claim payouts.
//!
//! ## Architecture
//!
//! Once the market is resolved the settlement engine:
//! 1. Prices the outstanding winner liability (the reserve)
//! 2. Verifies custody covers it before any profit leaves
//! 3. Pays the administrator only the surplus above the reserve
//! 4. Pays each winning holder once, zeroing the holding first
//!
//! ## Custody
//!
//! Value moves only through the [`Custody`] trait, implemented by the
//! hosting ledger. [`Vault`] is the in-memory implementation.

pub mod custody;
pub mod engine;
pub mod reserve;

pub use custody::{Custody, Transfer, TransferDirection, Vault};
pub use engine::{Claim, SettlementEngine, Withdrawal};
pub use reserve::ReserveBook;
