//! Administrator guard for privileged operations.

use whalemarket_types::{AccountId, AdminAction, MarketError, Result};

/// Single fixed administrator, set at creation and never rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessControl {
    admin: AccountId,
}

impl AccessControl {
    #[must_use]
    pub fn new(admin: AccountId) -> Self {
        Self { admin }
    }

    #[must_use]
    pub fn admin(&self) -> AccountId {
        self.admin
    }

    #[must_use]
    pub fn is_admin(&self, caller: AccountId) -> bool {
        caller == self.admin
    }

    /// Fail unless `caller` may perform `action`.
    ///
    /// # Errors
    /// Returns [`MarketError::Unauthorized`] for any caller other than the
    /// administrator.
    pub fn authorize(&self, caller: AccountId, action: AdminAction) -> Result<()> {
        if self.is_admin(caller) {
            return Ok(());
        }
        tracing::warn!(%caller, %action, "Rejected admin operation from non-admin caller");
        Err(MarketError::Unauthorized { caller, action })
    }
}
