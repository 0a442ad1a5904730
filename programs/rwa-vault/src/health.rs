//! Health factor engine
//!
//! Aggregates an account's collateral value and debt across all positions
//! into a single integer-percentage solvency ratio. Totals are always
//! recomputed from the position set; nothing here is cached.

use solana_program::pubkey::Pubkey;

use crate::error::RwaVaultError;
use crate::ledger::state::UserPositions;
use crate::math::{mul_div_floor, pow10};
use crate::registry::CollateralRegistry;

/// Aggregate collateral value and debt for one account
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccountTotals {
    pub collateral_value_wad: u128,
    pub debt_wad: u128,
}

/// Sums collateral value and debt across all of an account's positions.
///
/// `price_of` resolves the current robust price (wad) for an asset mint;
/// every position must price, otherwise the whole read fails.
pub fn account_totals<F>(
    positions: &UserPositions,
    registry: &CollateralRegistry,
    price_of: F,
) -> Result<AccountTotals, RwaVaultError>
where
    F: Fn(&Pubkey) -> Result<u128, RwaVaultError>,
{
    let mut totals = AccountTotals::default();
    for position in &positions.positions {
        let asset = registry
            .asset(&position.asset_mint)
            .ok_or(RwaVaultError::AssetNotWhitelisted)?;
        let price_wad = price_of(&position.asset_mint)?;
        let scale = pow10(asset.decimals)?;
        let value = mul_div_floor(position.collateral_amount as u128, price_wad, scale)?;
        totals.collateral_value_wad = totals
            .collateral_value_wad
            .checked_add(value)
            .ok_or(RwaVaultError::MathOverflow)?;
        totals.debt_wad = totals
            .debt_wad
            .checked_add(position.debt_amount)
            .ok_or(RwaVaultError::MathOverflow)?;
    }
    Ok(totals)
}

/// Integer-percentage solvency ratio.
///
/// 100 means collateral value exactly covers debt 1:1, independent of the
/// LTV used at issuance. Zero debt reads as maximal solvency and never
/// triggers liquidation.
pub fn health_factor(totals: &AccountTotals) -> u128 {
    if totals.debt_wad == 0 {
        return u128::MAX;
    }
    totals
        .collateral_value_wad
        .saturating_mul(100)
        / totals.debt_wad
}

/// Keeper surface: health factor straight from account data
pub fn get_health_factor<F>(
    positions: &UserPositions,
    registry: &CollateralRegistry,
    price_of: F,
) -> Result<u128, RwaVaultError>
where
    F: Fn(&Pubkey) -> Result<u128, RwaVaultError>,
{
    Ok(health_factor(&account_totals(positions, registry, price_of)?))
}

/// Keeper surface: one position as (asset, amount, debt, deposit_time)
pub fn get_user_position(
    positions: &UserPositions,
    asset_mint: &Pubkey,
) -> Option<(Pubkey, u64, u128, i64)> {
    positions.position(asset_mint).map(|p| {
        (
            p.asset_mint,
            p.collateral_amount,
            p.debt_amount,
            p.deposit_time,
        )
    })
}

/// Keeper surface: all positions as parallel vectors
pub fn get_all_user_positions(
    positions: &UserPositions,
) -> (Vec<Pubkey>, Vec<u64>, Vec<u128>) {
    let assets = positions.positions.iter().map(|p| p.asset_mint).collect();
    let amounts = positions
        .positions
        .iter()
        .map(|p| p.collateral_amount)
        .collect();
    let debts = positions.positions.iter().map(|p| p.debt_amount).collect();
    (assets, amounts, debts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRICE_PRECISION;
    use crate::registry::CollateralAsset;

    fn setup(price_usd: u128) -> (UserPositions, CollateralRegistry, Pubkey) {
        let mint = Pubkey::new_unique();
        let mut registry = CollateralRegistry::new(Pubkey::new_unique(), Pubkey::new_unique());
        registry.assets.push(CollateralAsset {
            mint,
            oracle: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            tier: 1,
            ltv_ratio_bps: 8000,
            mint_discount_bps: 0,
            decimals: 6,
            active: true,
            protocol_reserve: 0,
        });

        let mut positions = UserPositions::new(Pubkey::new_unique());
        // 10 units at $price_usd, 80% LTV issuance
        positions
            .apply_deposit(
                &mint,
                10_000_000,
                10 * price_usd * PRICE_PRECISION * 8000 / 10_000,
                0,
            )
            .unwrap();
        (positions, registry, mint)
    }

    #[test]
    fn test_zero_debt_is_max_health() {
        let totals = AccountTotals {
            collateral_value_wad: 123,
            debt_wad: 0,
        };
        assert_eq!(health_factor(&totals), u128::MAX);
    }

    #[test]
    fn test_health_factor_at_issuance() {
        // 80% LTV issuance starts at health factor 125
        let (positions, registry, _mint) = setup(1000);
        let hf = get_health_factor(&positions, &registry, |_| {
            Ok(1000 * PRICE_PRECISION)
        })
        .unwrap();
        assert_eq!(hf, 125);
    }

    #[test]
    fn test_health_factor_after_price_drop() {
        // Price drops $1000 -> $800: collateral 8000 against debt 8000
        let (positions, registry, _mint) = setup(1000);
        let hf = get_health_factor(&positions, &registry, |_| {
            Ok(800 * PRICE_PRECISION)
        })
        .unwrap();
        assert_eq!(hf, 100);
    }

    #[test]
    fn test_ltv_to_initial_health() {
        for (ltv, expected_hf) in [(8000u16, 125u128), (6500, 153), (5000, 200)] {
            let mint = Pubkey::new_unique();
            let mut registry =
                CollateralRegistry::new(Pubkey::new_unique(), Pubkey::new_unique());
            registry.assets.push(CollateralAsset {
                mint,
                oracle: Pubkey::new_unique(),
                vault: Pubkey::new_unique(),
                tier: 0,
                ltv_ratio_bps: ltv,
                mint_discount_bps: 0,
                decimals: 6,
                active: true,
                protocol_reserve: 0,
            });
            let mut positions = UserPositions::new(Pubkey::new_unique());
            positions
                .apply_deposit(
                    &mint,
                    1_000_000,
                    1000 * PRICE_PRECISION * ltv as u128 / 10_000,
                    0,
                )
                .unwrap();
            let hf = get_health_factor(&positions, &registry, |_| {
                Ok(1000 * PRICE_PRECISION)
            })
            .unwrap();
            assert_eq!(hf, expected_hf);
        }
    }

    #[test]
    fn test_failed_price_fails_the_read() {
        let (positions, registry, _mint) = setup(1000);
        let err = get_health_factor(&positions, &registry, |_| {
            Err(RwaVaultError::NoValidPriceSource)
        })
        .unwrap_err();
        assert_eq!(err, RwaVaultError::NoValidPriceSource);
    }

    #[test]
    fn test_keeper_views() {
        let (positions, _registry, mint) = setup(1000);
        let (asset, amount, debt, _ts) = get_user_position(&positions, &mint).unwrap();
        assert_eq!(asset, mint);
        assert_eq!(amount, 10_000_000);
        assert_eq!(debt, 8_000 * PRICE_PRECISION);

        let (assets, amounts, debts) = get_all_user_positions(&positions);
        assert_eq!(assets, vec![mint]);
        assert_eq!(amounts, vec![10_000_000]);
        assert_eq!(debts, vec![8_000 * PRICE_PRECISION]);
    }
}
