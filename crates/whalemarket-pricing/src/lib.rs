//! # whalemarket-pricing
//!
//! **Pure pricing plane for WhaleMarket.**
//!
//! The pricing engine turns the two aggregate outcome totals into a unit
//! price for either side. It has:
//!
//! - **Zero side effects**: no ledger access, no state of its own
//! - **Order independence**: same totals -> same quote, whatever the history
//! - **Symmetry**: both outcomes are priced by the same rule

pub mod engine;

pub use engine::PricingEngine;
