//! Access guard for creator-only operations
//!
//! The launchpad has no global admin. Authority is per sale record: the
//! account that created a token is the only one allowed to draw down its
//! pool outside a sell settlement.

use tracing::warn;
use types::ids::AccountId;

use crate::errors::LaunchpadError;
use crate::registry::SaleRecord;

/// Check whether `caller` created the token behind `record`.
pub fn is_creator(record: &SaleRecord, caller: AccountId) -> bool {
    record.creator() == caller
}

/// Reject `caller` unless it created the token behind `record`.
pub fn ensure_creator(record: &SaleRecord, caller: AccountId) -> Result<(), LaunchpadError> {
    if !is_creator(record, caller) {
        warn!(
            asset_id = %record.asset_id(),
            caller = %caller,
            "Rejected creator-only operation"
        );
        return Err(LaunchpadError::NotCreator);
    }
    Ok(())
}
