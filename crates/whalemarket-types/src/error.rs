//! Error types for the WhaleMarket core.
//!
//! All errors use the `WM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by category:
//! - 1xx: Authorization errors
//! - 2xx: Lifecycle errors
//! - 3xx: Validation errors
//! - 4xx: Claim errors
//! - 5xx: Integrity errors
//! - 6xx: Custody errors
//! - 9xx: General / internal errors
//!
//! Every error is a hard abort: the failing operation leaves no partial
//! state behind.

use std::fmt;

use thiserror::Error;

use crate::{AccountId, AdminAction};

/// Central error enum for all WhaleMarket operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// A non-administrator invoked an admin-only operation.
    #[error("WM_ERR_100: Unauthorized: {caller} may not {action}")]
    Unauthorized {
        caller: AccountId,
        action: AdminAction,
    },

    // =================================================================
    // Lifecycle Errors (2xx)
    // =================================================================
    /// The market is resolved; the requested operation is closed.
    #[error("WM_ERR_200: Market already ended")]
    MarketResolved,

    /// The market is paused; purchases are suspended.
    #[error("WM_ERR_201: Market is currently paused")]
    MarketPaused,

    /// `resolve_market` was called a second time.
    #[error("WM_ERR_202: Market has already been resolved")]
    AlreadyResolved,

    /// Settlement was attempted before resolution.
    #[error("WM_ERR_203: Market is not resolved yet")]
    NotResolved,

    // =================================================================
    // Validation Errors (3xx)
    // =================================================================
    /// The payment exceeds the configured per-purchase limit.
    #[error("WM_ERR_300: Trade exceeds max bet: {amount} > {max}")]
    BetExceedsMax { amount: u64, max: u64 },

    /// The payment was not directed at the market's collection address.
    #[error("WM_ERR_301: Wrong receiver: expected {expected}, got {actual}")]
    WrongReceiver {
        expected: AccountId,
        actual: AccountId,
    },

    /// The payment is too small to buy a single share-unit.
    #[error("WM_ERR_302: Payment too small: {amount} at unit price {unit_price}")]
    DustPayment { amount: u64, unit_price: u64 },

    /// `resolve_market` received a code that names no outcome.
    #[error("WM_ERR_303: Invalid outcome code: {0}")]
    InvalidOutcomeCode(u64),

    /// A deposit of zero was submitted.
    #[error("WM_ERR_304: Amount must be > 0")]
    ZeroAmount,

    /// A counter or product no longer fits in 64 bits.
    #[error("WM_ERR_305: Arithmetic overflow")]
    ArithmeticOverflow,

    /// A human-entered amount could not be converted to micro-units.
    #[error("WM_ERR_306: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    // =================================================================
    // Claim Errors (4xx)
    // =================================================================
    /// The caller holds no shares of the winning outcome.
    #[error("WM_ERR_400: No winning shares found for {account}")]
    NoWinnings { account: AccountId },

    // =================================================================
    // Integrity Errors (5xx)
    // =================================================================
    /// Custody holds less than the outstanding winner liability.
    #[error("WM_ERR_500: Insufficient reserves: balance {balance} < required {required}")]
    InsufficientReserve { balance: u64, required: u64 },

    /// A restored ledger disagrees with the aggregate totals.
    #[error("WM_ERR_501: Ledger inconsistent: {reason}")]
    LedgerInconsistent { reason: String },

    // =================================================================
    // Custody Errors (6xx)
    // =================================================================
    /// The hosting ledger refused a transfer.
    #[error("WM_ERR_600: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid values, unreadable file, ...).
    #[error("WM_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("WM_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("WM_ERR_902: I/O error: {0}")]
    Io(String),
}

/// The error taxonomy: which class of precondition an error violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authorization,
    Lifecycle,
    Validation,
    InsufficientClaim,
    Integrity,
    Custody,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Lifecycle => write!(f, "LIFECYCLE"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::InsufficientClaim => write!(f, "INSUFFICIENT_CLAIM"),
            Self::Integrity => write!(f, "INTEGRITY"),
            Self::Custody => write!(f, "CUSTODY"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl MarketError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::MarketResolved | Self::MarketPaused | Self::AlreadyResolved | Self::NotResolved => {
                ErrorKind::Lifecycle
            }
            Self::BetExceedsMax { .. }
            | Self::WrongReceiver { .. }
            | Self::DustPayment { .. }
            | Self::InvalidOutcomeCode(_)
            | Self::ZeroAmount
            | Self::ArithmeticOverflow
            | Self::InvalidAmount { .. } => ErrorKind::Validation,
            Self::NoWinnings { .. } => ErrorKind::InsufficientClaim,
            Self::InsufficientReserve { .. } | Self::LedgerInconsistent { .. } => {
                ErrorKind::Integrity
            }
            Self::TransferFailed { .. } => ErrorKind::Custody,
            Self::Configuration(_) | Self::Serialization(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MarketError>;

impl From<std::io::Error> for MarketError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = MarketError::NoWinnings {
            account: AccountId::from_bytes([7; 32]),
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("WM_ERR_400"), "Got: {msg}");
    }

    #[test]
    fn reserve_display_includes_amounts() {
        let err = MarketError::InsufficientReserve {
            balance: 50,
            required: 100,
        };
        let msg = format!("{err}");
        assert!(msg.contains("WM_ERR_500"));
        assert!(msg.contains("50"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn unauthorized_names_action() {
        let err = MarketError::Unauthorized {
            caller: AccountId::from_bytes([1; 32]),
            action: AdminAction::Resolve,
        };
        assert!(format!("{err}").contains("RESOLVE"));
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(MarketError::MarketPaused.kind(), ErrorKind::Lifecycle);
        assert_eq!(MarketError::AlreadyResolved.kind(), ErrorKind::Lifecycle);
        assert_eq!(
            MarketError::BetExceedsMax { amount: 2, max: 1 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            MarketError::DustPayment {
                amount: 0,
                unit_price: 1
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            MarketError::InsufficientReserve {
                balance: 0,
                required: 1
            }
            .kind(),
            ErrorKind::Integrity
        );
        assert_eq!(
            MarketError::TransferFailed {
                reason: "x".into()
            }
            .kind(),
            ErrorKind::Custody
        );
    }

    #[test]
    fn all_errors_have_wm_err_prefix() {
        let errors: Vec<MarketError> = vec![
            MarketError::MarketResolved,
            MarketError::NotResolved,
            MarketError::ZeroAmount,
            MarketError::ArithmeticOverflow,
            MarketError::InvalidOutcomeCode(9),
            MarketError::Configuration("test".into()),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("WM_ERR_"),
                "Error missing WM_ERR_ prefix: {msg}"
            );
        }
    }
}
