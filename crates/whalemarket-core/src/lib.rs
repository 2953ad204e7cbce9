//! # whalemarket-core
//!
//! Composition layer for the **WhaleMarket** binary-outcome betting core.
//!
//! - [`Market`]: one market instance; the full operation surface
//!   (purchase, pause, resolution, profit withdrawal, claims, deposits)
//!   and its read-only queries
//! - [`AccessControl`]: single fixed administrator guarding privileged
//!   operations
//! - [`AuditTrail`]: SHA-256 hash chain of every committed operation
//! - [`MarketSnapshot`]: serializable persisted state, restorable against a
//!   host-supplied custody handle
//!
//! ## Lifecycle
//!
//! ```text
//! OPEN ⇄ PAUSED ──resolve──▶ RESOLVED(winner) ──▶ withdraw / claim
//! ```
//!
//! Resolution is terminal. Purchases are accepted only while `OPEN`;
//! settlement operations only once `RESOLVED`.

pub mod access;
pub mod audit;
pub mod market;
pub mod snapshot;

pub use access::AccessControl;
pub use audit::{AuditTrail, verify_chain};
pub use market::Market;
pub use snapshot::MarketSnapshot;
