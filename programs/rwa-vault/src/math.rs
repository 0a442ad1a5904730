//! Fixed-point arithmetic helpers
//!
//! All ledger values are u128 wads (18 decimals). Multiplications happen
//! before divisions and division truncates toward zero; nothing here ever
//! rounds in the user's favor.

use crate::error::RwaVaultError;

/// Computes a * b / denominator with flooring division
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> Result<u128, RwaVaultError> {
    if denominator == 0 {
        return Err(RwaVaultError::DivisionByZero);
    }
    a.checked_mul(b)
        .ok_or(RwaVaultError::MathOverflow)
        .map(|product| product / denominator)
}

/// Power of ten for a decimal count, rejecting anything above 18
pub fn pow10(decimals: u8) -> Result<u128, RwaVaultError> {
    if decimals > 18 {
        return Err(RwaVaultError::UnsupportedFeedDecimals);
    }
    Ok(10u128.pow(decimals as u32))
}

/// Scales a raw feed value with `decimals` decimals up to 18-decimal wad.
///
/// Exact for decimals <= 18; feeds with more precision are an unsupported
/// configuration and are rejected rather than truncated.
pub fn scale_to_wad(raw: u128, decimals: u8) -> Result<u128, RwaVaultError> {
    if decimals > 18 {
        return Err(RwaVaultError::UnsupportedFeedDecimals);
    }
    let scale = pow10(18 - decimals)?;
    raw.checked_mul(scale).ok_or(RwaVaultError::MathOverflow)
}

/// Applies a basis-point rate: amount * bps / 10000
pub fn apply_bps(amount: u128, bps: u128) -> Result<u128, RwaVaultError> {
    mul_div_floor(amount, bps, crate::constants::BPS_DIVISOR)
}
