//! Launchpad error types
//!
//! One taxonomy per concern: the launchpad's own operation errors, plus the
//! errors its two external collaborators (asset service, native currency)
//! report. Collaborator errors convert into `LaunchpadError` so `?` carries
//! them out of an operation after rollback.

use thiserror::Error;
use types::ids::{AccountId, AssetId};
use types::numeric::{Units, Wei};

/// Errors reported by an asset service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Unknown asset: {asset_id}")]
    UnknownAsset { asset_id: AssetId },

    #[error("Insufficient allowance: {spender} may move {allowed} of {owner}'s units, requested {requested}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        allowed: Units,
        requested: Units,
    },

    #[error("Insufficient asset balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        required: Units,
        available: Units,
    },

    #[error("Asset transfer rejected: {reason}")]
    Rejected { reason: String },

    #[error("Arithmetic overflow in asset balance")]
    Overflow,
}

/// Errors reported by the native-currency settlement layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("Insufficient native balance for {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: AccountId,
        required: Wei,
        available: Wei,
    },

    #[error("Payment to {account} rejected: {reason}")]
    Rejected { account: AccountId, reason: String },

    #[error("Arithmetic overflow in native balance")]
    Overflow,
}

/// Errors returned by launchpad operations.
///
/// Every variant is reported after a full rollback: the sale record, the
/// asset balances and the native balances are exactly as they were before
/// the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchpadError {
    #[error("Invalid price: must be greater than zero")]
    InvalidPrice,

    #[error("Token not found: {asset_id}")]
    NotFound { asset_id: AssetId },

    #[error("Token already registered: {asset_id}")]
    AlreadyRegistered { asset_id: AssetId },

    #[error("Creator hasn't approved tokens")]
    NotApproved,

    #[error("Payment buys zero tokens")]
    ZeroUnits,

    #[error("Insufficient ETH in pool: required {required}, available {available}")]
    InsufficientPool { required: Wei, available: Wei },

    #[error("Not token creator")]
    NotCreator,

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Invalid token metadata: {reason}")]
    InvalidMetadata { reason: String },

    #[error("Seed liquidity below minimum: required {required}, provided {provided}")]
    InsufficientLiquidity { required: Wei, provided: Wei },

    #[error("Arithmetic overflow in pool calculation")]
    Overflow,

    #[error("Asset service error: {0}")]
    Asset(#[from] AssetError),

    #[error("Settlement error: {0}")]
    Settlement(#[from] SettlementError),

    #[error("Launchpad custody account cannot be funded directly")]
    CustodyFunding,

    #[error("Launchpad lock poisoned")]
    LockPoisoned,
}
