//! State digest — a SHA-256 root over every sale record
//!
//! Two launchpads with the same records in the same creation order have the
//! same root. Failed operations must leave the root unchanged.

use sha2::{Digest, Sha256};

use crate::registry::SaleRecord;

/// SHA-256 of arbitrary bytes.
pub fn compute_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Fold the records into one root, in the order given.
pub fn state_root<'a>(records: impl IntoIterator<Item = &'a SaleRecord>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for record in records {
        hash_record(&mut hasher, record);
    }
    hasher.finalize().into()
}

/// Lower-case hex rendering of a root, for logs.
pub fn to_hex(root: &[u8; 32]) -> String {
    root.iter().map(|b| format!("{b:02x}")).collect()
}

fn hash_record(hasher: &mut Sha256, record: &SaleRecord) {
    hasher.update(record.asset_id().as_uuid().as_bytes());
    hasher.update(record.creator().as_uuid().as_bytes());
    // length-prefix variable fields so ("ab","c") and ("a","bc") differ
    for field in [record.name(), record.symbol()] {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
    hasher.update(record.total_supply().to_le_bytes());
    hasher.update(record.price_per_unit().as_wei().to_le_bytes());
    hasher.update(record.eth_pool().as_wei().to_le_bytes());
    hasher.update(record.created_at().timestamp_micros().to_le_bytes());
}
