//! Collateral registry
//!
//! Whitelist of accepted collateral asset classes, each bound to an oracle,
//! a risk tier, and an LTV ratio. Administrative-only mutation; assets are
//! deactivated, never deleted.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
};

use crate::constants::{
    DISCRIMINATOR_SIZE, MAX_COLLATERAL_ASSETS, REGISTRY_DISCRIMINATOR,
};
use crate::cpi::create_pda_account;
use crate::error::RwaVaultError;
use crate::pda::{derive_registry_pda, derive_vault_authority_pda, REGISTRY_SEED};

/// One whitelisted collateral asset class
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct CollateralAsset {
    /// SPL mint of the collateral asset
    pub mint: Pubkey,

    /// Oracle PDA pricing this asset
    pub oracle: Pubkey,

    /// Token account holding this asset's collateral, owned by the vault
    /// authority PDA
    pub vault: Pubkey,

    /// Risk tier, ordinal and informational
    pub tier: u8,

    /// Issuable debt per unit of collateral value, in basis points
    pub ltv_ratio_bps: u16,

    /// Mint discount in basis points, informational
    pub mint_discount_bps: u16,

    /// Native decimals of the collateral mint
    pub decimals: u8,

    /// Deactivated assets accept no new deposits; positions remain valid
    pub active: bool,

    /// Redemption fees and the protocol's liquidation share, in collateral
    /// units sitting in the vault
    pub protocol_reserve: u64,
}

impl CollateralAsset {
    pub const SIZE: usize = 32 + 32 + 32 + 1 + 2 + 2 + 1 + 1 + 8;

    /// Rejects any vault token account other than the one registered for
    /// this asset
    pub fn require_vault(&self, vault: &Pubkey) -> Result<(), ProgramError> {
        if self.vault != *vault {
            return Err(RwaVaultError::InvalidVaultAccount.into());
        }
        Ok(())
    }
}

/// Singleton registry account
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct CollateralRegistry {
    pub discriminator: [u8; DISCRIMINATOR_SIZE],

    /// Administrative authority
    pub authority: Pubkey,

    /// Debt token mint (18-decimal unit at 9 token decimals)
    pub debt_mint: Pubkey,

    /// Global switch blocking deposit/redeem/liquidate
    pub paused: bool,

    pub assets: Vec<CollateralAsset>,
}

impl CollateralRegistry {
    /// Allocation size with the asset table at capacity
    pub const MAX_SIZE: usize =
        DISCRIMINATOR_SIZE + 32 + 32 + 1 + 4 + MAX_COLLATERAL_ASSETS * CollateralAsset::SIZE;

    pub fn new(authority: Pubkey, debt_mint: Pubkey) -> Self {
        Self {
            discriminator: REGISTRY_DISCRIMINATOR,
            authority,
            debt_mint,
            paused: false,
            assets: Vec::new(),
        }
    }

    pub fn load(account: &AccountInfo) -> Result<Self, ProgramError> {
        if account.owner != &crate::id() {
            return Err(ProgramError::IncorrectProgramId);
        }
        let data = account.data.borrow();
        let registry = Self::deserialize(&mut &data[..])
            .map_err(|_| ProgramError::InvalidAccountData)?;
        if registry.discriminator != REGISTRY_DISCRIMINATOR {
            return Err(RwaVaultError::InvalidDiscriminator.into());
        }
        Ok(registry)
    }

    pub fn save(&self, account: &AccountInfo) -> Result<(), ProgramError> {
        let mut data = account.data.borrow_mut();
        self.serialize(&mut &mut data[..])
            .map_err(|_| ProgramError::AccountDataTooSmall)?;
        Ok(())
    }

    pub fn asset(&self, mint: &Pubkey) -> Option<&CollateralAsset> {
        self.assets.iter().find(|a| a.mint == *mint)
    }

    pub fn asset_mut(&mut self, mint: &Pubkey) -> Option<&mut CollateralAsset> {
        self.assets.iter_mut().find(|a| a.mint == *mint)
    }

    /// Adds an asset, or updates an existing entry in place and
    /// reactivates it. The accumulated protocol reserve survives a
    /// re-add.
    #[allow(clippy::too_many_arguments)]
    pub fn upsert_asset(
        &mut self,
        mint: &Pubkey,
        oracle: &Pubkey,
        vault: &Pubkey,
        tier: u8,
        ltv_ratio_bps: u16,
        mint_discount_bps: u16,
        decimals: u8,
    ) -> Result<(), RwaVaultError> {
        if ltv_ratio_bps == 0 {
            return Err(RwaVaultError::InvalidLtvRatio);
        }
        match self.asset_mut(mint) {
            Some(asset) => {
                asset.oracle = *oracle;
                asset.vault = *vault;
                asset.tier = tier;
                asset.ltv_ratio_bps = ltv_ratio_bps;
                asset.mint_discount_bps = mint_discount_bps;
                asset.active = true;
            }
            None => {
                if self.assets.len() >= MAX_COLLATERAL_ASSETS {
                    return Err(RwaVaultError::RegistryFull);
                }
                self.assets.push(CollateralAsset {
                    mint: *mint,
                    oracle: *oracle,
                    vault: *vault,
                    tier,
                    ltv_ratio_bps,
                    mint_discount_bps,
                    decimals,
                    active: true,
                    protocol_reserve: 0,
                });
            }
        }
        Ok(())
    }

    /// Fails unless the asset is whitelisted and accepting deposits
    pub fn active_asset(&self, mint: &Pubkey) -> Result<&CollateralAsset, ProgramError> {
        let asset = self
            .asset(mint)
            .ok_or(RwaVaultError::AssetNotWhitelisted)?;
        if !asset.active {
            return Err(RwaVaultError::AssetInactive.into());
        }
        Ok(asset)
    }

    pub fn require_authority(&self, signer: &AccountInfo) -> Result<(), ProgramError> {
        if !signer.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        if self.authority != *signer.key {
            return Err(RwaVaultError::Unauthorized.into());
        }
        Ok(())
    }

    pub fn require_not_paused(&self) -> Result<(), ProgramError> {
        if self.paused {
            return Err(RwaVaultError::ProtocolPaused.into());
        }
        Ok(())
    }
}

/// Accounts:
/// 0. `[signer, writable]` Protocol authority (pays rent)
/// 1. `[writable]` Registry PDA
/// 2. `[]` Debt token mint
/// 3. `[]` System program
pub fn process_init_protocol(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let authority = next_account_info(account_iter)?;
    let registry_account = next_account_info(account_iter)?;
    let debt_mint = next_account_info(account_iter)?;
    let system_program_account = next_account_info(account_iter)?;

    if !authority.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (expected, bump) = derive_registry_pda(program_id);
    if registry_account.key != &expected {
        return Err(ProgramError::InvalidSeeds);
    }
    if !registry_account.data_is_empty() {
        return Err(RwaVaultError::AlreadyInitialized.into());
    }

    create_pda_account(
        authority,
        registry_account,
        CollateralRegistry::MAX_SIZE,
        program_id,
        system_program_account,
        &[REGISTRY_SEED, &[bump]],
    )?;

    let registry = CollateralRegistry::new(*authority.key, *debt_mint.key);
    registry.save(registry_account)?;

    msg!("Protocol initialized, authority {}", authority.key);
    Ok(())
}

/// Accounts:
/// 0. `[signer]` Protocol authority
/// 1. `[writable]` Registry PDA
/// 2. `[]` Collateral asset mint
/// 3. `[]` Oracle PDA for the asset
/// 4. `[]` Vault token account for the asset
pub fn process_add_collateral_asset(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    tier: u8,
    ltv_ratio_bps: u16,
    mint_discount_bps: u16,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let authority = next_account_info(account_iter)?;
    let registry_account = next_account_info(account_iter)?;
    let asset_mint = next_account_info(account_iter)?;
    let oracle_account = next_account_info(account_iter)?;
    let vault_account = next_account_info(account_iter)?;

    let mut registry = CollateralRegistry::load(registry_account)?;
    registry.require_authority(authority)?;

    let mint_state = spl_token::state::Mint::unpack(&asset_mint.data.borrow())?;

    // All deposits and payouts for this asset go through this one token
    // account; it must hold the asset and answer to the vault authority
    let vault_state = spl_token::state::Account::unpack(&vault_account.data.borrow())?;
    if vault_state.mint != *asset_mint.key {
        return Err(RwaVaultError::TokenMintMismatch.into());
    }
    let (vault_authority, _) = derive_vault_authority_pda(program_id);
    if vault_state.owner != vault_authority {
        return Err(RwaVaultError::InvalidVaultAccount.into());
    }

    // An LTV >= 10000 makes positions immediately liquidatable; that is a
    // permitted misconfiguration, only zero is rejected
    registry.upsert_asset(
        asset_mint.key,
        oracle_account.key,
        vault_account.key,
        tier,
        ltv_ratio_bps,
        mint_discount_bps,
        mint_state.decimals,
    )?;

    registry.save(registry_account)?;
    msg!(
        "Collateral asset registered: {} tier {} ltv {} bps",
        asset_mint.key,
        tier,
        ltv_ratio_bps
    );
    Ok(())
}

/// Accounts:
/// 0. `[signer]` Protocol authority
/// 1. `[writable]` Registry PDA
/// 2. `[]` Collateral asset mint
pub fn process_remove_collateral_asset(accounts: &[AccountInfo]) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let authority = next_account_info(account_iter)?;
    let registry_account = next_account_info(account_iter)?;
    let asset_mint = next_account_info(account_iter)?;

    let mut registry = CollateralRegistry::load(registry_account)?;
    registry.require_authority(authority)?;

    let asset = registry
        .asset_mut(asset_mint.key)
        .ok_or(RwaVaultError::AssetNotWhitelisted)?;
    asset.active = false;

    registry.save(registry_account)?;
    msg!("Collateral asset deactivated: {}", asset_mint.key);
    Ok(())
}

/// Accounts:
/// 0. `[signer]` Protocol authority
/// 1. `[writable]` Registry PDA
pub fn process_set_pause(accounts: &[AccountInfo], paused: bool) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let authority = next_account_info(account_iter)?;
    let registry_account = next_account_info(account_iter)?;

    let mut registry = CollateralRegistry::load(registry_account)?;
    registry.require_authority(authority)?;

    registry.paused = paused;
    registry.save(registry_account)?;
    msg!("Protocol paused: {}", paused);
    Ok(())
}
