//! Shared handle for concurrent callers
//!
//! Every call holds the lock for the whole operation, so operations on the
//! same token are serialized: two buys can never both read the creator's
//! available units from the same snapshot.

use std::sync::{Arc, Mutex, MutexGuard};

use types::ids::{AccountId, AssetId};
use types::numeric::{Units, Wei};

use crate::errors::LaunchpadError;
use crate::launchpad::{BuyReceipt, Launchpad, TokenParams};
use crate::registry::SaleRecord;
use crate::settlement::{AssetService, NativeCurrency};

/// Cloneable, thread-safe handle to one `Launchpad`.
#[derive(Debug)]
pub struct SharedLaunchpad<A, N> {
    inner: Arc<Mutex<Launchpad<A, N>>>,
}

impl<A, N> Clone for SharedLaunchpad<A, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: AssetService, N: NativeCurrency> SharedLaunchpad<A, N> {
    pub fn new(launchpad: Launchpad<A, N>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(launchpad)),
        }
    }

    pub fn create_token(
        &self,
        creator: AccountId,
        params: TokenParams,
    ) -> Result<AssetId, LaunchpadError> {
        self.lock()?.create_token(creator, params)
    }

    pub fn buy(
        &self,
        asset_id: AssetId,
        buyer: AccountId,
        payment: Wei,
    ) -> Result<BuyReceipt, LaunchpadError> {
        self.lock()?.buy(asset_id, buyer, payment)
    }

    pub fn sell(
        &self,
        asset_id: AssetId,
        seller: AccountId,
        units: Units,
    ) -> Result<Wei, LaunchpadError> {
        self.lock()?.sell(asset_id, seller, units)
    }

    pub fn withdraw(
        &self,
        asset_id: AssetId,
        caller: AccountId,
        amount: Wei,
    ) -> Result<(), LaunchpadError> {
        self.lock()?.withdraw(asset_id, caller, amount)
    }

    /// Snapshot of a sale record.
    pub fn get_token_info(&self, asset_id: AssetId) -> Result<SaleRecord, LaunchpadError> {
        self.lock()?.get_token_info(asset_id).cloned()
    }

    /// Run `f` with exclusive access, e.g. for approvals or funding.
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut Launchpad<A, N>) -> R,
    ) -> Result<R, LaunchpadError> {
        let mut guard = self.lock()?;
        Ok(f(&mut *guard))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Launchpad<A, N>>, LaunchpadError> {
        self.inner.lock().map_err(|_| LaunchpadError::LockPoisoned)
    }
}
