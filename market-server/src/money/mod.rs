//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done with `Decimal` internally, then converted
//! to `f64` for storage/serialization. Gateway amounts travel as integer
//! minor units (amount × 100) to stay float-free on the wire.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed quantity per order line
pub const MAX_QUANTITY: i64 = 9999;

/// Convert f64 to Decimal for calculation
///
/// Input values should be validated finite at the boundary. If NaN/Infinity
/// somehow reaches here, logs an error and returns ZERO to avoid silent data
/// corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp from catalog-sourced amounts
        // is always within f64 representable range
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Line total: captured unit price × quantity
#[inline]
pub fn line_total(price: f64, quantity: i64) -> Decimal {
    to_decimal(price) * Decimal::from(quantity)
}

/// Express an amount in the gateway's minor unit (amount × 100, integer).
///
/// `round` rather than truncate: 1999.999 f64 artifacts must not drop a cent.
pub fn to_minor_units(amount: f64) -> i64 {
    let minor = to_decimal(amount) * Decimal::ONE_HUNDRED;
    minor
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_else(|| {
            tracing::error!(amount = ?amount, "Amount overflows minor-unit range, defaulting to zero");
            0
        })
}
