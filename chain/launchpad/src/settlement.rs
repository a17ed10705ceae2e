//! Settlement adapter — the capability interface to external collaborators
//!
//! The launchpad decides how much moves and to whom; these traits do the
//! moving. Both collaborators are `Journaled` so that an operation touching
//! asset balances, native balances and the sale record commits or rolls back
//! as one unit.

use types::ids::{AccountId, AssetId};
use types::numeric::{Units, Wei};

use crate::errors::{AssetError, SettlementError};

/// Checkpoint/rollback protocol for a collaborator's state.
///
/// `begin` opens a journal, `commit` discards it, `rollback` restores the
/// state captured by `begin`. Journals do not nest: a `begin` while a journal
/// is already open keeps recording into the outer journal.
pub trait Journaled {
    fn begin(&mut self);
    fn commit(&mut self);
    fn rollback(&mut self);
}

/// Fungible asset service (ERC-20-like) with delegated transfers.
pub trait AssetService: Journaled {
    /// Issue a new asset with `total_supply` units minted to `owner`.
    fn issue(
        &mut self,
        name: &str,
        symbol: &str,
        total_supply: Units,
        owner: AccountId,
    ) -> Result<AssetId, AssetError>;

    fn balance_of(&self, asset_id: AssetId, account: AccountId) -> Result<Units, AssetError>;

    /// Units `spender` may still move out of `owner`'s balance.
    fn allowance(
        &self,
        asset_id: AssetId,
        owner: AccountId,
        spender: AccountId,
    ) -> Result<Units, AssetError>;

    fn approve(
        &mut self,
        asset_id: AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: Units,
    ) -> Result<(), AssetError>;

    /// Move `amount` units from `from` to `to` on `spender`'s allowance.
    fn transfer_from(
        &mut self,
        asset_id: AssetId,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Units,
    ) -> Result<(), AssetError>;
}

/// Native-currency balances.
///
/// Inbound payment attached to a call is a transfer from the caller to the
/// launchpad's own account; outbound payment is the reverse.
pub trait NativeCurrency: Journaled {
    fn balance_of(&self, account: AccountId) -> Wei;

    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Wei)
        -> Result<(), SettlementError>;
}
