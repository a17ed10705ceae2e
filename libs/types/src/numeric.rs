//! Exact integer money types
//!
//! Native currency is accounted in wei (`u128`), never in floating point or
//! scaled decimals. `rust_decimal` is used only at the edges, to convert
//! human-readable ether amounts ("0.01") into wei and back.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::NumericError;

/// Whole units of a launched asset. Fractional units do not exist.
pub type Units = u128;

/// Number of wei in one ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Decimal places between ether and wei.
pub const ETHER_DECIMALS: u32 = 18;

/// An amount of native currency in wei.
///
/// Serialized as a decimal string because `u128` exceeds the integer range
/// JSON consumers can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Wei(u128);

impl Wei {
    pub const ZERO: Wei = Wei(0);

    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    pub const fn as_wei(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert an ether amount into wei.
    ///
    /// Rejects negative amounts and amounts with more than 18 decimal places
    /// rather than rounding them.
    pub fn from_ether(ether: Decimal) -> Result<Self, NumericError> {
        if ether.is_sign_negative() && !ether.is_zero() {
            return Err(NumericError::Negative {
                value: ether.to_string(),
            });
        }
        let wei = ether
            .checked_mul(Decimal::new(WEI_PER_ETHER as i64, 0))
            .ok_or_else(|| NumericError::Overflow {
                value: ether.to_string(),
            })?;
        if !wei.fract().is_zero() {
            return Err(NumericError::TooPrecise {
                value: ether.to_string(),
            });
        }
        wei.to_u128().map(Self).ok_or_else(|| NumericError::Overflow {
            value: ether.to_string(),
        })
    }

    /// Parse a human-readable ether string such as `"0.05"`.
    pub fn parse_ether(s: &str) -> Result<Self, NumericError> {
        let ether = Decimal::from_str_exact(s.trim()).map_err(|e| NumericError::Parse {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_ether(ether)
    }

    /// Express this amount in ether.
    ///
    /// Fails only for amounts above the 96-bit mantissa `Decimal` can hold.
    pub fn to_ether(&self) -> Result<Decimal, NumericError> {
        let overflow = || NumericError::Overflow {
            value: self.0.to_string(),
        };
        let signed = i128::try_from(self.0).map_err(|_| overflow())?;
        Decimal::try_from_i128_with_scale(signed, ETHER_DECIMALS)
            .map(|d| d.normalize())
            .map_err(|_| overflow())
    }

    pub fn checked_add(self, rhs: Wei) -> Option<Wei> {
        self.0.checked_add(rhs.0).map(Wei)
    }

    pub fn checked_sub(self, rhs: Wei) -> Option<Wei> {
        self.0.checked_sub(rhs.0).map(Wei)
    }

    /// Price of `units` at `self` per unit.
    pub fn checked_mul_units(self, units: Units) -> Option<Wei> {
        self.0.checked_mul(units).map(Wei)
    }

    /// Whole units affordable with `self` at `price` per unit (truncating).
    ///
    /// `None` when `price` is zero.
    pub fn units_at(self, price: Wei) -> Option<Units> {
        self.0.checked_div(price.0)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

impl From<u128> for Wei {
    fn from(wei: u128) -> Self {
        Self(wei)
    }
}

impl From<Wei> for String {
    fn from(wei: Wei) -> Self {
        wei.0.to_string()
    }
}

impl TryFrom<String> for Wei {
    type Error = NumericError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Wei {
    type Err = NumericError;

    /// Parse a raw wei integer string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u128::from_str(s.trim())
            .map(Wei)
            .map_err(|e| NumericError::Parse {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}
