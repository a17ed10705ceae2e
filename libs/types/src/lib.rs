//! Types library for the fixed-price token launchpad
//!
//! Core type definitions shared by the launchpad crates: identifiers and
//! exact integer money amounts.
//!
//! # Modules
//! - `ids`: Unique identifiers (AccountId, AssetId)
//! - `numeric`: Wei amounts, whole asset units, ether conversion
//! - `errors`: Conversion error taxonomy

pub mod ids;
pub mod numeric;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::errors::*;
}
