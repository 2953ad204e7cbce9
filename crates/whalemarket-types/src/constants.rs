//! System-wide constants for the WhaleMarket core.

/// Fixed-point scale: micro-units per full currency unit, and share-units
/// per whole share.
pub const SCALE: u64 = 1_000_000;

/// Number of fractional digits represented by [`SCALE`].
pub const SCALE_DECIMALS: u32 = 6;

/// Default floor price for a whole share (0.51 units, a 2% house spread
/// against a 1.00 redemption when both sides are evenly bought).
pub const DEFAULT_BASE_PRICE: u64 = 510_000;

/// Default share-lead needed to move the price by one tick.
pub const DEFAULT_SKEW_SENSITIVITY: u64 = 10_000;

/// Default price increment per tick (0.01 units).
pub const DEFAULT_PRICE_STEP: u64 = 10_000;

/// Default maximum payment accepted in a single purchase (100,000 units).
pub const DEFAULT_MAX_BET: u64 = 100_000_000_000;

/// Default payout for one whole winning share (1.00 unit).
pub const DEFAULT_REDEMPTION_PER_SHARE: u64 = SCALE;

/// Wire code for [`crate::Outcome::A`] in `resolve_market`.
pub const OUTCOME_A_CODE: u64 = 1;

/// Wire code for [`crate::Outcome::B`] in `resolve_market`.
pub const OUTCOME_B_CODE: u64 = 2;

/// Domain separator for the receipt hash chain.
pub const RECEIPT_DOMAIN: &[u8] = b"whalemarket:receipt:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "WhaleMarket";
