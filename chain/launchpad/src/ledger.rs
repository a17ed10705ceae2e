//! Price ledger — fixed-price buy/sell arithmetic
//!
//! Pure functions over a sale record's price and pool. They decide how many
//! units and how much native currency move; `Launchpad` applies the result.
//!
//! Rounding: a buyer always receives the floor number of whole units for the
//! payment, and the remainder is refunded exactly. Nothing is retained as
//! rounding profit.

use serde::{Deserialize, Serialize};
use types::numeric::{Units, Wei};

use crate::errors::LaunchpadError;

/// Outcome of pricing a buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyQuote {
    /// Units the payment could buy with unlimited supply.
    pub requested_units: Units,
    /// Units actually transferred: `min(requested_units, available)`.
    pub units: Units,
    /// Added to the pool: `units * price`.
    pub cost: Wei,
    /// Returned to the buyer: `payment - cost`.
    pub refund: Wei,
}

/// Outcome of pricing a sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellQuote {
    pub units: Units,
    /// Paid from the pool: `units * price`.
    pub payout: Wei,
    pub pool_after: Wei,
}

/// Units the creator has made available: limited by both what the launchpad
/// may move and what the creator still holds.
pub fn available_units(allowance: Units, creator_balance: Units) -> Units {
    allowance.min(creator_balance)
}

/// Price a buy of `payment` at `price` per unit against `available` units.
pub fn quote_buy(price: Wei, payment: Wei, available: Units) -> Result<BuyQuote, LaunchpadError> {
    let requested_units = payment.units_at(price).ok_or(LaunchpadError::InvalidPrice)?;
    let units = requested_units.min(available);
    if units == 0 {
        return Err(LaunchpadError::ZeroUnits);
    }

    // units <= payment / price, so cost <= payment
    let cost = price
        .checked_mul_units(units)
        .ok_or(LaunchpadError::Overflow)?;
    let refund = payment.checked_sub(cost).ok_or(LaunchpadError::Overflow)?;

    Ok(BuyQuote {
        requested_units,
        units,
        cost,
        refund,
    })
}

/// Price a sell of `units` at `price` per unit against a pool of `eth_pool`.
pub fn quote_sell(price: Wei, units: Units, eth_pool: Wei) -> Result<SellQuote, LaunchpadError> {
    if units == 0 {
        return Err(LaunchpadError::InvalidAmount);
    }
    let payout = price
        .checked_mul_units(units)
        .ok_or(LaunchpadError::Overflow)?;
    let pool_after = debit_pool(eth_pool, payout)?;

    Ok(SellQuote {
        units,
        payout,
        pool_after,
    })
}

/// Pool balance after paying out `amount`.
pub fn debit_pool(eth_pool: Wei, amount: Wei) -> Result<Wei, LaunchpadError> {
    eth_pool
        .checked_sub(amount)
        .ok_or(LaunchpadError::InsufficientPool {
            required: amount,
            available: eth_pool,
        })
}

/// Pool balance after receiving `amount`.
pub fn credit_pool(eth_pool: Wei, amount: Wei) -> Result<Wei, LaunchpadError> {
    eth_pool.checked_add(amount).ok_or(LaunchpadError::Overflow)
}
