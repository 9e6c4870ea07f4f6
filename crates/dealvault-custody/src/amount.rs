//! Conversion between smallest-unit integers and human-readable decimals.

use rust_decimal::Decimal;

/// Render `amount` smallest units as a decimal with `decimals` places.
///
/// Returns `None` when the value does not fit `Decimal` (96-bit mantissa,
/// at most 28 places).
#[must_use]
pub fn to_decimal(amount: u128, decimals: u32) -> Option<Decimal> {
    let mantissa = i128::try_from(amount).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, decimals).ok()
}

/// Parse a human amount into smallest units. Extra precision is rejected.
#[must_use]
pub fn from_decimal(value: Decimal, decimals: u32) -> Option<u128> {
    if value.is_sign_negative() || value.scale() > decimals {
        return None;
    }
    let mut scaled = value;
    scaled.rescale(decimals);
    u128::try_from(scaled.mantissa()).ok()
}
