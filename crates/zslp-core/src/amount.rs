//! Decimal amount scaling between display units and base units.
//!
//! Token quantities on chain are integers in base units (`display * 10^decimals`).
//! All conversions go through [`Decimal`] so no value ever touches floating point.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::AmountError;

/// Largest scale a [`Decimal`] can carry.
const MAX_SCALE: u8 = 28;

/// Convert a display-unit token amount to base units.
///
/// The amount is first rounded half-up to `decimals` places, then shifted by
/// `10^decimals`. A result of zero is returned as-is; callers decide whether
/// it is below the token's minimum.
pub fn scale_token_amount(amount: Decimal, decimals: u8) -> Result<u64, AmountError> {
    if decimals > MAX_SCALE {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::NotPositive);
    }

    let rounded =
        amount.round_dp_with_strategy(u32::from(decimals), RoundingStrategy::MidpointAwayFromZero);
    let factor = Decimal::from_i128_with_scale(10i128.pow(u32::from(decimals)), 0);
    let scaled = rounded
        .checked_mul(factor)
        .ok_or_else(|| AmountError::OutOfRange(amount.to_string()))?;

    scaled
        .trunc()
        .to_u64()
        .ok_or_else(|| AmountError::OutOfRange(amount.to_string()))
}

/// Convert base units back to a display-unit decimal.
pub fn to_display_amount(base_units: u64, decimals: u8) -> Result<Decimal, AmountError> {
    if decimals > MAX_SCALE {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    Decimal::try_from_i128_with_scale(i128::from(base_units), u32::from(decimals))
        .map(|d| d.normalize())
        .map_err(|e| AmountError::OutOfRange(e.to_string()))
}

/// Interpret a native amount as whole satoshis, dropping any fraction.
pub fn native_satoshis(amount: Decimal) -> Result<u64, AmountError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::NotPositive);
    }
    let sats = amount
        .trunc()
        .to_u64()
        .ok_or_else(|| AmountError::OutOfRange(amount.to_string()))?;
    if sats == 0 {
        return Err(AmountError::NotPositive);
    }
    Ok(sats)
}
