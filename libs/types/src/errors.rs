//! Error types shared across the launchpad crates
//!
//! Only conversion failures live here; operation errors belong to the
//! crate that performs the operation.

use thiserror::Error;

/// Failures converting between human-readable amounts and wei.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("Negative amount not allowed: {value}")]
    Negative { value: String },

    #[error("Amount finer than one wei: {value}")]
    TooPrecise { value: String },

    #[error("Amount out of range: {value}")]
    Overflow { value: String },

    #[error("Cannot parse amount {input:?}: {reason}")]
    Parse { input: String, reason: String },
}
