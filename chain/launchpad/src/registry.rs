//! Asset registry — one sale record per launched token
//!
//! Records are created once and never deleted. Everything except the pool
//! balance is immutable after creation; the pool is only rewritten by the
//! launchpad after an operation has committed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::ids::{AccountId, AssetId};
use types::numeric::{Units, Wei};

use crate::errors::LaunchpadError;

/// Sale state of one launched token.
///
/// Units available for sale are not stored: they are read from the
/// asset service (the creator's allowance and balance) on every buy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    asset_id: AssetId,
    creator: AccountId,
    name: String,
    symbol: String,
    total_supply: Units,
    price_per_unit: Wei,
    eth_pool: Wei,
    created_at: DateTime<Utc>,
}

impl SaleRecord {
    /// Build a record for a freshly issued asset.
    ///
    /// Rejects a zero price; all other validation happens before the asset
    /// is issued.
    pub fn new(
        asset_id: AssetId,
        creator: AccountId,
        name: impl Into<String>,
        symbol: impl Into<String>,
        total_supply: Units,
        price_per_unit: Wei,
        seed_liquidity: Wei,
    ) -> Result<Self, LaunchpadError> {
        if price_per_unit.is_zero() {
            return Err(LaunchpadError::InvalidPrice);
        }
        Ok(Self {
            asset_id,
            creator,
            name: name.into(),
            symbol: symbol.into(),
            total_supply,
            price_per_unit,
            eth_pool: seed_liquidity,
            created_at: Utc::now(),
        })
    }

    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    pub fn creator(&self) -> AccountId {
        self.creator
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn total_supply(&self) -> Units {
        self.total_supply
    }

    pub fn price_per_unit(&self) -> Wei {
        self.price_per_unit
    }

    pub fn eth_pool(&self) -> Wei {
        self.eth_pool
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn with_eth_pool(&self, eth_pool: Wei) -> Self {
        Self {
            eth_pool,
            ..self.clone()
        }
    }
}

/// Map of asset id to sale record, iterable in creation order.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    records: HashMap<AssetId, SaleRecord>,
    order: Vec<AssetId>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new record. An asset id can be registered once.
    pub fn insert(&mut self, record: SaleRecord) -> Result<(), LaunchpadError> {
        let asset_id = record.asset_id();
        if self.records.contains_key(&asset_id) {
            return Err(LaunchpadError::AlreadyRegistered { asset_id });
        }
        self.order.push(asset_id);
        self.records.insert(asset_id, record);
        Ok(())
    }

    pub fn get(&self, asset_id: AssetId) -> Result<&SaleRecord, LaunchpadError> {
        self.records
            .get(&asset_id)
            .ok_or(LaunchpadError::NotFound { asset_id })
    }

    pub fn contains(&self, asset_id: AssetId) -> bool {
        self.records.contains_key(&asset_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in creation order.
    pub fn records(&self) -> impl Iterator<Item = &SaleRecord> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Overwrite an existing record after a committed operation.
    pub(crate) fn replace(&mut self, record: SaleRecord) -> Result<(), LaunchpadError> {
        let asset_id = record.asset_id();
        match self.records.get_mut(&asset_id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(LaunchpadError::NotFound { asset_id }),
        }
    }
}
