//! Liquidation sizing and seizure math

use crate::constants::{
    BPS_DIVISOR, LIQUIDATION_THRESHOLD, LIQUIDATOR_BONUS_BPS, PROTOCOL_LIQUIDATION_FEE_BPS,
    TARGET_HEALTH_FACTOR, TOTAL_LIQUIDATION_PENALTY_BPS,
};
use crate::error::RwaVaultError;
use crate::health::AccountTotals;
use crate::math::mul_div_floor;

/// Read-only view for off-chain liquidation bots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidationInfo {
    pub is_liquidatable: bool,
    pub health_factor: u128,
    /// Largest repay (wad) a liquidator can submit for this asset
    pub max_liquidatable_wad: u128,
    /// Total penalty rate in basis points
    pub penalty_bps: u128,
}

/// An account is liquidatable strictly below the threshold
pub fn is_liquidatable(health_factor: u128) -> bool {
    health_factor < LIQUIDATION_THRESHOLD
}

/// The repay amount (wad) that restores the aggregate health factor to
/// exactly the target.
///
/// Seizing collateral at 1 + penalty per unit of repaid debt, the target
/// ratio gives `a = (target*D - 100*C) / (target - 100 - penalty_pct)`.
/// The required fraction of debt varies with how far below threshold the
/// account is; this is not a fixed close factor.
pub fn target_restoration_amount(totals: &AccountTotals) -> Result<u128, RwaVaultError> {
    let target_debt = totals
        .debt_wad
        .checked_mul(TARGET_HEALTH_FACTOR)
        .ok_or(RwaVaultError::MathOverflow)?;
    let scaled_collateral = totals
        .collateral_value_wad
        .checked_mul(100)
        .ok_or(RwaVaultError::MathOverflow)?;

    // Already at or above target; nothing to restore
    let numerator = match target_debt.checked_sub(scaled_collateral) {
        Some(n) => n,
        None => return Ok(0),
    };
    let denominator = TARGET_HEALTH_FACTOR - 100 - TOTAL_LIQUIDATION_PENALTY_BPS / 100;
    Ok(numerator / denominator)
}

/// Actual repay: the caller's request, capped by the target-restoration
/// amount and by the asset's outstanding debt
pub fn effective_repay_amount(
    requested_wad: u128,
    target_restoration_wad: u128,
    asset_debt_wad: u128,
) -> u128 {
    requested_wad
        .min(target_restoration_wad)
        .min(asset_debt_wad)
}

/// Collateral units moved by one liquidation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeizureBreakdown {
    /// Repaid debt converted to collateral units at the current price,
    /// before any clamping against the position's balance
    pub principal: u64,

    /// Principal plus the 4% incentive, transferred to the liquidator
    pub liquidator_share: u64,

    /// 1% of principal, retained by the protocol in the vault
    pub protocol_share: u64,

    /// Total removed from the position's collateral
    pub total_seized: u64,
}

/// Splits the seized collateral between liquidator and protocol.
///
/// Both shares are clamped so their sum never exceeds the position's
/// collateral; the liquidator share absorbs any shortfall.
pub fn seizure_split(
    repay_wad: u128,
    price_wad: u128,
    asset_scale: u128,
    position_collateral: u64,
) -> Result<SeizureBreakdown, RwaVaultError> {
    let principal_units = mul_div_floor(repay_wad, asset_scale, price_wad)?;
    let liquidator_units = mul_div_floor(
        principal_units,
        BPS_DIVISOR + LIQUIDATOR_BONUS_BPS,
        BPS_DIVISOR,
    )?;
    let protocol_units = mul_div_floor(principal_units, PROTOCOL_LIQUIDATION_FEE_BPS, BPS_DIVISOR)?;

    let collateral = position_collateral as u128;
    let protocol_share = protocol_units.min(collateral);
    let liquidator_share = liquidator_units.min(collateral - protocol_share);
    let total_seized = liquidator_share + protocol_share;

    Ok(SeizureBreakdown {
        principal: u64::try_from(principal_units).map_err(|_| RwaVaultError::MathOverflow)?,
        liquidator_share: liquidator_share as u64,
        protocol_share: protocol_share as u64,
        total_seized: total_seized as u64,
    })
}

/// Read-only helper for off-chain bots deciding whether and how much to
/// liquidate
pub fn get_liquidation_info(
    totals: &AccountTotals,
    asset_debt_wad: u128,
    health_factor: u128,
) -> Result<LiquidationInfo, RwaVaultError> {
    let liquidatable = is_liquidatable(health_factor);
    let max_liquidatable_wad = if liquidatable {
        target_restoration_amount(totals)?.min(asset_debt_wad)
    } else {
        0
    };
    Ok(LiquidationInfo {
        is_liquidatable: liquidatable,
        health_factor,
        max_liquidatable_wad,
        penalty_bps: TOTAL_LIQUIDATION_PENALTY_BPS,
    })
}
