//! Fixed-price token launchpad
//!
//! A creator issues a fungible token with a fixed per-unit price and seeds it
//! with a native-currency pool. Buyers and sellers then trade against that
//! pool at the fixed price; only the creator may withdraw from it.
//!
//! # Modules
//! - `errors`: Launchpad and collaborator error types
//! - `events`: Launchpad events and the queryable event log
//! - `config`: Creation limits
//! - `registry`: Sale records, one per token
//! - `ledger`: Fixed-price buy/sell arithmetic
//! - `security`: Creator-only access guard
//! - `settlement`: Asset service and native-currency interfaces
//! - `memory`: In-memory asset service and native-currency bank
//! - `digest`: SHA-256 state root over sale records
//! - `launchpad`: The `Launchpad` facade
//! - `shared`: Thread-safe handle serializing concurrent callers

pub mod errors;
pub mod events;
pub mod config;
pub mod registry;
pub mod ledger;
pub mod security;
pub mod settlement;
pub mod memory;
pub mod digest;
pub mod launchpad;
pub mod shared;

pub use crate::launchpad::{BuyReceipt, Launchpad, TokenParams};
pub use crate::shared::SharedLaunchpad;

/// Launchpad ABI version, frozen after release
pub const LAUNCHPAD_ABI_VERSION: &str = "1.0.0";
