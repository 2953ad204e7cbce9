//! # whalemarket-types
//!
//! Shared types, errors, and configuration for the **WhaleMarket**
//! binary-outcome betting core.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`MarketId`]
//! - **Market model**: [`Outcome`], [`MarketTotals`], [`MarketStatus`], [`AdminAction`]
//! - **Transfers**: [`Payment`]
//! - **Audit model**: [`MarketEvent`], [`Receipt`]
//! - **Configuration**: [`MarketConfig`]
//! - **Errors**: [`MarketError`] with `WM_ERR_` prefix codes, [`ErrorKind`]
//! - **Units**: micro-unit ↔ decimal conversion
//! - **Constants**: scale factor and reference defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod outcome;
pub mod payment;
pub mod receipt;
pub mod status;
pub mod units;

pub use config::*;
pub use error::*;
pub use ids::*;
pub use outcome::*;
pub use payment::*;
pub use receipt::*;
pub use status::*;

// Constants and unit conversions are accessed via their modules
// (`whalemarket_types::constants::SCALE`, `whalemarket_types::units::to_decimal`).
