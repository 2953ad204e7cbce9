//! Value transfers reported by the hosting ledger.

use serde::{Deserialize, Serialize};

use crate::AccountId;

/// An inbound payment that accompanies a call into the market.
///
/// The hosting ledger authenticates and delivers the transfer; the core
/// only checks where it was sent and how much it carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub sender: AccountId,
    pub receiver: AccountId,
    /// Amount in micro-units.
    pub amount: u64,
}

impl Payment {
    #[must_use]
    pub fn new(sender: AccountId, receiver: AccountId, amount: u64) -> Self {
        Self {
            sender,
            receiver,
            amount,
        }
    }
}
