//! Collateral redemption

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvar::Sysvar,
};

use crate::constants::{REDEEM_COOLDOWN, REDEMPTION_FEE_BPS};
use crate::cpi::{expect_token_account_mint, token_burn, token_transfer_signed};
use crate::error::RwaVaultError;
use crate::ledger::deposit::wad_to_debt_tokens;
use crate::ledger::state::{Position, UserPositions};
use crate::math::apply_bps;
use crate::pda::{derive_registry_pda, derive_vault_authority_pda, VAULT_AUTHORITY_SEED};
use crate::registry::CollateralRegistry;

/// Amounts moved by one redemption
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Redemption {
    /// Debt to burn, proportional to the collateral fraction withdrawn
    pub debt_to_burn_wad: u128,

    /// Redemption fee in collateral units, retained by the protocol
    pub fee: u64,

    /// Collateral returned to the caller
    pub payout: u64,
}

/// Checks the cooldown measured from the position's last deposit
pub fn cooldown_met(position: &Position, now: i64) -> bool {
    now.saturating_sub(position.deposit_time) >= REDEEM_COOLDOWN
}

/// Sizes a redemption against the current position.
///
/// The position is decreased by the full pre-fee amount; the fee comes out
/// of the caller's payout.
pub fn compute_redemption(position: &Position, amount: u64) -> Result<Redemption, RwaVaultError> {
    if amount == 0 {
        return Err(RwaVaultError::ZeroAmount);
    }
    if amount > position.collateral_amount {
        return Err(RwaVaultError::InsufficientCollateral);
    }

    // Proportional debt; a full redeem burns the exact remaining debt
    let debt_to_burn_wad = if amount == position.collateral_amount {
        position.debt_amount
    } else {
        position
            .debt_amount
            .checked_mul(amount as u128)
            .ok_or(RwaVaultError::MathOverflow)?
            / position.collateral_amount as u128
    };

    let fee = apply_bps(amount as u128, REDEMPTION_FEE_BPS)? as u64;
    let payout = amount - fee;

    Ok(Redemption {
        debt_to_burn_wad,
        fee,
        payout,
    })
}

/// Accounts:
/// 0. `[signer]` Position owner
/// 1. `[writable]` User positions PDA
/// 2. `[writable]` Registry PDA
/// 3. `[]` Collateral asset mint
/// 4. `[writable]` Owner collateral token account
/// 5. `[writable]` Vault collateral token account
/// 6. `[]` Vault authority PDA
/// 7. `[writable]` Debt token mint
/// 8. `[writable]` Owner debt token account
/// 9. `[]` Token program
pub fn process_redeem_rwa(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u64,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let owner = next_account_info(account_iter)?;
    let positions_account = next_account_info(account_iter)?;
    let registry_account = next_account_info(account_iter)?;
    let asset_mint = next_account_info(account_iter)?;
    let owner_collateral = next_account_info(account_iter)?;
    let vault_collateral = next_account_info(account_iter)?;
    let vault_authority = next_account_info(account_iter)?;
    let debt_mint = next_account_info(account_iter)?;
    let owner_debt = next_account_info(account_iter)?;
    let token_program = next_account_info(account_iter)?;

    if !owner.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (expected_registry, _) = derive_registry_pda(program_id);
    if registry_account.key != &expected_registry {
        return Err(ProgramError::InvalidSeeds);
    }

    let mut registry = CollateralRegistry::load(registry_account)?;
    registry.require_not_paused()?;
    if registry.debt_mint != *debt_mint.key {
        return Err(ProgramError::InvalidAccountData);
    }
    // Redemption stays open for deactivated assets; only the whitelist entry
    // must exist
    let asset = registry
        .asset(asset_mint.key)
        .ok_or(RwaVaultError::AssetNotWhitelisted)?;
    // The payout must come out of this asset's own vault and land in an
    // account holding this asset
    asset.require_vault(vault_collateral.key)?;
    expect_token_account_mint(owner_collateral, asset_mint.key)?;

    let mut positions = UserPositions::load(positions_account)?;
    if positions.owner != *owner.key {
        return Err(RwaVaultError::Unauthorized.into());
    }

    let clock = Clock::get()?;
    let position = positions
        .position(asset_mint.key)
        .ok_or(RwaVaultError::PositionNotFound)?;
    if !cooldown_met(position, clock.unix_timestamp) {
        return Err(RwaVaultError::CooldownNotMet.into());
    }

    let redemption = compute_redemption(position, amount)?;

    {
        let position = positions
            .position_mut(asset_mint.key)
            .ok_or(RwaVaultError::PositionNotFound)?;
        position.collateral_amount -= amount;
        position.debt_amount -= redemption.debt_to_burn_wad;
    }
    positions.prune_closed();

    let asset = registry
        .asset_mut(asset_mint.key)
        .ok_or(RwaVaultError::AssetNotWhitelisted)?;
    asset.protocol_reserve = asset
        .protocol_reserve
        .checked_add(redemption.fee)
        .ok_or(RwaVaultError::MathOverflow)?;

    // Effects before token CPIs
    positions.save(positions_account)?;
    registry.save(registry_account)?;

    token_burn(
        token_program,
        owner_debt,
        debt_mint,
        owner,
        wad_to_debt_tokens(redemption.debt_to_burn_wad)?,
    )?;

    let (expected_vault_authority, vault_bump) = derive_vault_authority_pda(program_id);
    if vault_authority.key != &expected_vault_authority {
        return Err(ProgramError::InvalidSeeds);
    }
    token_transfer_signed(
        token_program,
        vault_collateral,
        owner_collateral,
        vault_authority,
        redemption.payout,
        &[VAULT_AUTHORITY_SEED, &[vault_bump]],
    )?;

    msg!(
        "Redeemed {} collateral ({} fee), burned {} debt",
        amount,
        redemption.fee,
        redemption.debt_to_burn_wad
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRICE_PRECISION;

    fn position(collateral: u64, debt_wad: u128, deposit_time: i64) -> Position {
        Position {
            asset_mint: Pubkey::new_unique(),
            collateral_amount: collateral,
            debt_amount: debt_wad,
            deposit_time,
        }
    }

    #[test]
    fn test_cooldown() {
        let p = position(100, 0, 1_000);
        assert!(!cooldown_met(&p, 1_000 + REDEEM_COOLDOWN - 1));
        assert!(cooldown_met(&p, 1_000 + REDEEM_COOLDOWN));
    }

    #[test]
    fn test_full_redeem_round_trip() {
        // Depositing X then redeeming X returns X * (1 - 0.5%)
        let p = position(10_000_000, 8_000 * PRICE_PRECISION, 0);
        let redemption = compute_redemption(&p, 10_000_000).unwrap();
        assert_eq!(redemption.debt_to_burn_wad, 8_000 * PRICE_PRECISION);
        assert_eq!(redemption.fee, 50_000); // 0.5%
        assert_eq!(redemption.payout, 9_950_000);
    }

    #[test]
    fn test_partial_redeem_proportional_debt() {
        let p = position(10_000_000, 8_000 * PRICE_PRECISION, 0);
        let redemption = compute_redemption(&p, 2_500_000).unwrap();
        assert_eq!(redemption.debt_to_burn_wad, 2_000 * PRICE_PRECISION);
        assert_eq!(redemption.fee, 12_500);
        assert_eq!(redemption.payout, 2_487_500);
    }

    #[test]
    fn test_redeem_guards() {
        let p = position(100, 50, 0);
        assert_eq!(
            compute_redemption(&p, 0),
            Err(RwaVaultError::ZeroAmount)
        );
        assert_eq!(
            compute_redemption(&p, 101),
            Err(RwaVaultError::InsufficientCollateral)
        );
    }
}
