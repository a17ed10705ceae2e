//! Launchpad events and the append-only event log
//!
//! Events are immutable records of committed operations. A failed operation
//! never appends an event. `TokenCreated` is the only way external code
//! learns a new asset id, so the log supports filtering by event kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::ids::{AccountId, AssetId};
use types::numeric::{Units, Wei};

/// A new token was issued and its sale record created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreated {
    pub asset_id: AssetId,
    pub creator: AccountId,
    pub name: String,
    pub symbol: String,
    pub total_supply: Units,
    pub price_per_unit: Wei,
    pub eth_pool: Wei,
}

/// Units were bought from the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensPurchased {
    pub asset_id: AssetId,
    pub buyer: AccountId,
    pub units: Units,
    pub cost: Wei,
    pub refund: Wei,
}

/// Units were sold back to the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensSold {
    pub asset_id: AssetId,
    pub seller: AccountId,
    pub units: Units,
    pub payout: Wei,
}

/// The creator withdrew native currency from the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolWithdrawn {
    pub asset_id: AssetId,
    pub creator: AccountId,
    pub amount: Wei,
}

/// Enum wrapper for all launchpad events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    TokenCreated(TokenCreated),
    TokensPurchased(TokensPurchased),
    TokensSold(TokensSold),
    PoolWithdrawn(PoolWithdrawn),
}

/// Discriminant used to filter the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    TokenCreated,
    TokensPurchased,
    TokensSold,
    PoolWithdrawn,
}

impl ContractEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ContractEvent::TokenCreated(_) => EventKind::TokenCreated,
            ContractEvent::TokensPurchased(_) => EventKind::TokensPurchased,
            ContractEvent::TokensSold(_) => EventKind::TokensSold,
            ContractEvent::PoolWithdrawn(_) => EventKind::PoolWithdrawn,
        }
    }

    /// The asset the event concerns.
    pub fn asset_id(&self) -> AssetId {
        match self {
            ContractEvent::TokenCreated(e) => e.asset_id,
            ContractEvent::TokensPurchased(e) => e.asset_id,
            ContractEvent::TokensSold(e) => e.asset_id,
            ContractEvent::PoolWithdrawn(e) => e.asset_id,
        }
    }
}

/// A logged event with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Zero-based, strictly increasing, never reused.
    pub sequence: u64,
    pub emitted_at: DateTime<Utc>,
    pub event: ContractEvent,
}

/// Append-only event log.
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
    next_sequence: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return its sequence number.
    pub fn emit(&mut self, event: ContractEvent) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.records.push(EventRecord {
            sequence,
            emitted_at: Utc::now(),
            event,
        });
        sequence
    }

    /// All retained events in emission order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Events of one kind, in emission order.
    pub fn query(&self, kind: EventKind) -> impl Iterator<Item = &ContractEvent> + '_ {
        self.records
            .iter()
            .map(|r| &r.event)
            .filter(move |e| e.kind() == kind)
    }

    /// Events concerning one asset, in emission order.
    pub fn for_asset(&self, asset_id: AssetId) -> impl Iterator<Item = &ContractEvent> + '_ {
        self.records
            .iter()
            .map(|r| &r.event)
            .filter(move |e| e.asset_id() == asset_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drain all events (consume and clear). Sequence numbers keep counting.
    pub fn drain(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.records)
    }
}
