//! Amount calculation using rust_decimal for precision

use rust_decimal::prelude::*;

/// Currency precision (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Non-finite input becomes zero; handlers reject it before it gets here.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in amount calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Payable amount for one delivery: `liters × fat × base_rate`, rounded to 2dp
///
/// `fat` is the raw percentage reading (4.5, not 0.045). No validation here;
/// negative input yields a negative amount.
pub fn compute_amount(liters: f64, fat: f64, base_rate: f64) -> f64 {
    to_f64(to_decimal(liters) * to_decimal(fat) * to_decimal(base_rate))
}
