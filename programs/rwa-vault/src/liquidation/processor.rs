//! Liquidate instruction processor

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvar::Sysvar,
};

use crate::cpi::{expect_token_account_mint, token_burn, token_transfer_signed};
use crate::error::RwaVaultError;
use crate::health::{health_factor, AccountTotals};
use crate::ledger::deposit::wad_to_debt_tokens;
use crate::ledger::state::UserPositions;
use crate::liquidation::engine::{
    effective_repay_amount, is_liquidatable, seizure_split, target_restoration_amount,
};
use crate::math::{mul_div_floor, pow10};
use crate::oracle::price::resolve_price;
use crate::pda::{
    derive_registry_pda, derive_sequencer_pda, derive_user_positions_pda,
    derive_vault_authority_pda, VAULT_AUTHORITY_SEED,
};
use crate::registry::CollateralRegistry;

/// Accounts:
/// 0. `[signer]` Liquidator
/// 1. `[writable]` Target user positions PDA
/// 2. `[writable]` Registry PDA
/// 3. `[]` Target collateral asset mint
/// 4. `[]` Sequencer status PDA
/// 5. `[writable]` Debt token mint
/// 6. `[writable]` Liquidator debt token account
/// 7. `[writable]` Vault collateral token account (target asset)
/// 8. `[writable]` Liquidator collateral token account
/// 9. `[]` Vault authority PDA
/// 10. `[]` Token program
/// 11... `[]` One (oracle PDA, reference feed PDA) pair per open position,
///        in position order
pub fn process_liquidate(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    repay_amount_wad: u128,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let liquidator = next_account_info(account_iter)?;
    let positions_account = next_account_info(account_iter)?;
    let registry_account = next_account_info(account_iter)?;
    let asset_mint = next_account_info(account_iter)?;
    let sequencer_account = next_account_info(account_iter)?;
    let debt_mint = next_account_info(account_iter)?;
    let liquidator_debt = next_account_info(account_iter)?;
    let vault_collateral = next_account_info(account_iter)?;
    let liquidator_collateral = next_account_info(account_iter)?;
    let vault_authority = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;

    if !liquidator.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if repay_amount_wad == 0 {
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

    let mut registry = CollateralRegistry::load(registry_account)?;
    registry.require_not_paused()?;
    if registry.debt_mint != *debt_mint.key {
        return Err(ProgramError::InvalidAccountData);
    }

    let mut positions = UserPositions::load(positions_account)?;
    let (expected_positions, _) = derive_user_positions_pda(program_id, &positions.owner);
    if positions_account.key != &expected_positions {
        return Err(ProgramError::InvalidSeeds);
    }

    let target_debt_wad = positions
        .position(asset_mint.key)
        .map(|p| p.debt_amount)
        .unwrap_or(0);
    if target_debt_wad == 0 {
        return Err(RwaVaultError::NoDebtToLiquidate.into());
    }

    // Price every position once, within this single atomic read
    let clock = Clock::get()?;
    let mut totals = AccountTotals::default();
    let mut target_price_wad: Option<u128> = None;
    for position in &positions.positions {
        let oracle_account = next_account_info(account_iter)?;
        let feed_account = next_account_info(account_iter)?;

        let asset = registry
            .asset(&position.asset_mint)
            .ok_or(RwaVaultError::AssetNotWhitelisted)?;
        if asset.oracle != *oracle_account.key {
            return Err(RwaVaultError::InvalidOracleAccount.into());
        }

        let snapshot = resolve_price(oracle_account, feed_account, sequencer_account, &clock)?;
        let scale = pow10(asset.decimals).map_err(ProgramError::from)?;
        let value = mul_div_floor(position.collateral_amount as u128, snapshot.price_wad, scale)
            .map_err(ProgramError::from)?;
        totals.collateral_value_wad = totals
            .collateral_value_wad
            .checked_add(value)
            .ok_or(RwaVaultError::MathOverflow)?;
        totals.debt_wad = totals
            .debt_wad
            .checked_add(position.debt_amount)
            .ok_or(RwaVaultError::MathOverflow)?;

        if position.asset_mint == *asset_mint.key {
            target_price_wad = Some(snapshot.price_wad);
        }
    }
    let target_price_wad = target_price_wad.ok_or(RwaVaultError::PositionNotFound)?;

    let hf = health_factor(&totals);
    if !is_liquidatable(hf) {
        msg!("Health factor {} is above the liquidation threshold", hf);
        return Err(RwaVaultError::PositionNotLiquidatable.into());
    }

    let target_restoration = target_restoration_amount(&totals).map_err(ProgramError::from)?;
    let repay_wad = effective_repay_amount(repay_amount_wad, target_restoration, target_debt_wad);

    let asset = registry
        .asset(asset_mint.key)
        .ok_or(RwaVaultError::AssetNotWhitelisted)?;
    // Seized collateral leaves the target asset's own vault and must land
    // in an account holding that asset
    asset.require_vault(vault_collateral.key)?;
    expect_token_account_mint(liquidator_collateral, asset_mint.key)?;
    let asset_scale = pow10(asset.decimals).map_err(ProgramError::from)?;

    let position = positions
        .position_mut(asset_mint.key)
        .ok_or(RwaVaultError::PositionNotFound)?;
    let split = seizure_split(
        repay_wad,
        target_price_wad,
        asset_scale,
        position.collateral_amount,
    )
    .map_err(ProgramError::from)?;

    position.debt_amount -= repay_wad;
    position.collateral_amount -= split.total_seized;

    // Closing a position seizes whatever collateral remains; the residue
    // stays in the vault as protocol reserve
    let mut protocol_gain = split.protocol_share;
    if position.debt_amount == 0 {
        protocol_gain = protocol_gain
            .checked_add(position.collateral_amount)
            .ok_or(RwaVaultError::MathOverflow)?;
        position.collateral_amount = 0;
    }
    positions.prune_closed();

    let asset = registry
        .asset_mut(asset_mint.key)
        .ok_or(RwaVaultError::AssetNotWhitelisted)?;
    asset.protocol_reserve = asset
        .protocol_reserve
        .checked_add(protocol_gain)
        .ok_or(RwaVaultError::MathOverflow)?;

    // Effects before token CPIs
    positions.save(positions_account)?;
    registry.save(registry_account)?;

    token_burn(
        token_program,
        liquidator_debt,
        debt_mint,
        liquidator,
        wad_to_debt_tokens(repay_wad)?,
    )?;

    let (expected_vault_authority, vault_bump) = derive_vault_authority_pda(program_id);
    if vault_authority.key != &expected_vault_authority {
        return Err(ProgramError::InvalidSeeds);
    }
    token_transfer_signed(
        token_program,
        vault_collateral,
        liquidator_collateral,
        vault_authority,
        split.liquidator_share,
        &[VAULT_AUTHORITY_SEED, &[vault_bump]],
    )?;

    msg!(
        "Liquidated {} debt at health factor {}: liquidator {} protocol {}",
        repay_wad,
        hf,
        split.liquidator_share,
        split.protocol_share
    );
    Ok(())
}
