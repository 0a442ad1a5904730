//! Collateral deposit and debt issuance

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvar::Sysvar,
};

use crate::constants::{BPS_DIVISOR, DEBT_TOKEN_SCALE};
use crate::cpi::{
    create_pda_account, expect_token_account_mint, token_mint_to_signed, token_transfer,
};
use crate::error::RwaVaultError;
use crate::ledger::state::UserPositions;
use crate::math::{mul_div_floor, pow10};
use crate::oracle::price::resolve_price;
use crate::pda::{
    derive_debt_mint_authority_pda, derive_registry_pda, derive_sequencer_pda,
    derive_user_positions_pda, DEBT_MINT_AUTHORITY_SEED, USER_POSITIONS_SEED,
};
use crate::registry::CollateralRegistry;

/// Collateral value and debt issued for one deposit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Issuance {
    /// Deposit value in wad at the current robust price
    pub collateral_value_wad: u128,

    /// Debt to issue in wad, floored
    pub debt_wad: u128,
}

/// Sizes the debt issued for a deposit.
///
/// Multiplications before divisions; division truncates toward zero, so
/// issuance never rounds in the depositor's favor.
pub fn compute_issuance(
    amount: u64,
    price_wad: u128,
    asset_decimals: u8,
    ltv_ratio_bps: u16,
) -> Result<Issuance, RwaVaultError> {
    let scale = pow10(asset_decimals)?;
    let collateral_value_wad = mul_div_floor(amount as u128, price_wad, scale)?;
    let debt_wad = mul_div_floor(collateral_value_wad, ltv_ratio_bps as u128, BPS_DIVISOR)?;
    Ok(Issuance {
        collateral_value_wad,
        debt_wad,
    })
}

/// Converts ledger debt (wad) to debt-token units, floored. Used on the
/// burn side.
pub fn wad_to_debt_tokens(debt_wad: u128) -> Result<u64, RwaVaultError> {
    u64::try_from(debt_wad / DEBT_TOKEN_SCALE).map_err(|_| RwaVaultError::MathOverflow)
}

/// Converts ledger debt (wad) to debt-token units, rounded up. Minting
/// rounds up so the tokens issued across any sequence of deposits always
/// cover the floored burn of their summed debt.
pub fn wad_to_debt_tokens_ceil(debt_wad: u128) -> Result<u64, RwaVaultError> {
    let units = debt_wad
        .checked_add(DEBT_TOKEN_SCALE - 1)
        .ok_or(RwaVaultError::MathOverflow)?
        / DEBT_TOKEN_SCALE;
    u64::try_from(units).map_err(|_| RwaVaultError::MathOverflow)
}

/// Accounts:
/// 0. `[signer, writable]` Depositor (pays rent on first deposit)
/// 1. `[writable]` User positions PDA
/// 2. `[]` Registry PDA
/// 3. `[]` Collateral asset mint
/// 4. `[]` Oracle PDA for the asset
/// 5. `[]` Reference feed PDA for the asset
/// 6. `[]` Sequencer status PDA
/// 7. `[writable]` Depositor collateral token account
/// 8. `[writable]` Vault collateral token account
/// 9. `[writable]` Debt token mint
/// 10. `[writable]` Depositor debt token account
/// 11. `[]` Debt mint authority PDA
/// 12. `[]` Token program
/// 13. `[]` System program
pub fn process_deposit_rwa(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u64,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let depositor = next_account_info(account_iter)?;
    let positions_account = next_account_info(account_iter)?;
    let registry_account = next_account_info(account_iter)?;
    let asset_mint = next_account_info(account_iter)?;
    let oracle_account = next_account_info(account_iter)?;
    let feed_account = next_account_info(account_iter)?;
    let sequencer_account = next_account_info(account_iter)?;
    let depositor_collateral = next_account_info(account_iter)?;
    let vault_collateral = next_account_info(account_iter)?;
    let debt_mint = next_account_info(account_iter)?;
    let depositor_debt = next_account_info(account_iter)?;
    let debt_mint_authority = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;
    let system_program_account = next_account_info(account_iter)?;

    if !depositor.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if amount == 0 {
        return Err(RwaVaultError::ZeroAmount.into());
    }

    let (expected_registry, _) = derive_registry_pda(program_id);
    if registry_account.key != &expected_registry {
        return Err(ProgramError::InvalidSeeds);
    }
    let (expected_sequencer, _) = derive_sequencer_pda(program_id);
    if sequencer_account.key != &expected_sequencer {
        return Err(ProgramError::InvalidSeeds);
    }

    let registry = CollateralRegistry::load(registry_account)?;
    registry.require_not_paused()?;
    let asset = registry.active_asset(asset_mint.key)?;
    if asset.oracle != *oracle_account.key {
        return Err(RwaVaultError::InvalidOracleAccount.into());
    }
    if registry.debt_mint != *debt_mint.key {
        return Err(ProgramError::InvalidAccountData);
    }
    // Collateral must land in the asset's registered vault, and the source
    // must actually hold the asset
    asset.require_vault(vault_collateral.key)?;
    expect_token_account_mint(depositor_collateral, asset_mint.key)?;

    // Any oracle failure aborts here, before any state mutation
    let clock = Clock::get()?;
    let snapshot = resolve_price(oracle_account, feed_account, sequencer_account, &clock)?;

    let issuance = compute_issuance(
        amount,
        snapshot.price_wad,
        asset.decimals,
        asset.ltv_ratio_bps,
    )?;

    let (expected_positions, bump) = derive_user_positions_pda(program_id, depositor.key);
    if positions_account.key != &expected_positions {
        return Err(ProgramError::InvalidSeeds);
    }

    let mut positions = if positions_account.data_is_empty() {
        create_pda_account(
            depositor,
            positions_account,
            UserPositions::MAX_SIZE,
            program_id,
            system_program_account,
            &[USER_POSITIONS_SEED, depositor.key.as_ref(), &[bump]],
        )?;
        UserPositions::new(*depositor.key)
    } else {
        let positions = UserPositions::load(positions_account)?;
        if positions.owner != *depositor.key {
            return Err(RwaVaultError::Unauthorized.into());
        }
        positions
    };

    positions.apply_deposit(
        asset_mint.key,
        amount,
        issuance.debt_wad,
        clock.unix_timestamp,
    )?;

    // Effects before token CPIs
    positions.save(positions_account)?;

    token_transfer(
        token_program,
        depositor_collateral,
        vault_collateral,
        depositor,
        amount,
    )?;

    let (_, mint_authority_bump) = derive_debt_mint_authority_pda(program_id);
    token_mint_to_signed(
        token_program,
        debt_mint,
        depositor_debt,
        debt_mint_authority,
        wad_to_debt_tokens_ceil(issuance.debt_wad)?,
        &[DEBT_MINT_AUTHORITY_SEED, &[mint_authority_bump]],
    )?;

    msg!(
        "Deposited {} collateral at price {}, issued {} debt",
        amount,
        snapshot.price_wad,
        issuance.debt_wad
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRICE_PRECISION;

    #[test]
    fn test_issuance_at_80_percent_ltv() {
        // 10 units of a 6-decimal asset at $1000, 80% LTV
        let issuance = compute_issuance(
            10_000_000,
            1000 * PRICE_PRECISION,
            6,
            8000,
        )
        .unwrap();
        assert_eq!(issuance.collateral_value_wad, 10_000 * PRICE_PRECISION);
        assert_eq!(issuance.debt_wad, 8_000 * PRICE_PRECISION);
    }

    #[test]
    fn test_issuance_floors() {
        // 1 base unit at a price that does not divide evenly
        let issuance = compute_issuance(1, 999_999_999_999_999_999, 6, 6500).unwrap();
        assert_eq!(issuance.collateral_value_wad, 999_999_999_999);
        // floor(999_999_999_999 * 6500 / 10000)
        assert_eq!(issuance.debt_wad, 649_999_999_999);
    }

    #[test]
    fn test_permissive_ltv_above_10000() {
        // >100% LTV is accepted; the result is immediately liquidatable,
        // not an issuance error
        let issuance =
            compute_issuance(1_000_000, PRICE_PRECISION, 6, 12_000).unwrap();
        assert_eq!(issuance.debt_wad, 12 * PRICE_PRECISION / 10);
    }

    #[test]
    fn test_wad_to_debt_tokens() {
        assert_eq!(
            wad_to_debt_tokens(8_000 * PRICE_PRECISION).unwrap(),
            8_000_000_000_000
        );
        assert_eq!(wad_to_debt_tokens(999_999_999).unwrap(), 0);
        assert_eq!(wad_to_debt_tokens_ceil(999_999_999).unwrap(), 1);
        assert_eq!(
            wad_to_debt_tokens_ceil(8_000 * PRICE_PRECISION).unwrap(),
            8_000_000_000_000
        );
    }

    #[test]
    fn test_minted_tokens_cover_the_burn() {
        // Two deposits whose individually-floored token amounts sum below
        // the floor of the combined debt; the ceil-minted total still
        // covers a full-redeem burn
        let d1 = 1_999_999_999u128;
        let d2 = 1_999_999_999u128;
        let minted = wad_to_debt_tokens_ceil(d1).unwrap() + wad_to_debt_tokens_ceil(d2).unwrap();
        let burned = wad_to_debt_tokens(d1 + d2).unwrap();
        assert!(minted >= burned);
        // Flooring both sides would have under-minted here
        assert!(wad_to_debt_tokens(d1).unwrap() + wad_to_debt_tokens(d2).unwrap() < burned);
    }
}
