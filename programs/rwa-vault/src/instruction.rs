//! Instruction definitions

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub enum RwaVaultInstruction {
    /// Initialize the protocol registry
    /// Accounts:
    /// 0. `[signer, writable]` Protocol authority (pays rent)
    /// 1. `[writable]` Registry PDA
    /// 2. `[]` Debt token mint
    /// 3. `[]` System program
    InitProtocol,

    /// Whitelist a collateral asset class, or update and reactivate an
    /// existing one
    /// Accounts:
    /// 0. `[signer]` Protocol authority
    /// 1. `[writable]` Registry PDA
    /// 2. `[]` Collateral asset mint
    /// 3. `[]` Oracle PDA for the asset
    /// 4. `[]` Vault token account for the asset, owned by the vault
    ///    authority PDA
    AddCollateralAsset {
        tier: u8,
        ltv_ratio_bps: u16,
        mint_discount_bps: u16,
    },

    /// Deactivate a collateral asset; existing positions stay valid
    /// Accounts:
    /// 0. `[signer]` Protocol authority
    /// 1. `[writable]` Registry PDA
    /// 2. `[]` Collateral asset mint
    RemoveCollateralAsset,

    /// Block or unblock deposit/redeem/liquidate protocol-wide
    /// Accounts:
    /// 0. `[signer]` Protocol authority
    /// 1. `[writable]` Registry PDA
    SetPause { paused: bool },

    /// Create the keeper-pushed reference feed for an asset
    /// Accounts:
    /// 0. `[signer, writable]` Feed authority (pays rent)
    /// 1. `[writable]` Reference feed PDA
    /// 2. `[]` Asset mint
    /// 3. `[]` System program
    InitReferenceFeed { decimals: u8 },

    /// Push a reference feed round
    /// Accounts:
    /// 0. `[signer]` Feed authority
    /// 1. `[writable]` Reference feed PDA
    UpdateReferenceFeed { round_id: u64, answer: i64 },

    /// Create the sequencer availability feed
    /// Accounts:
    /// 0. `[signer, writable]` Status authority (pays rent)
    /// 1. `[writable]` Sequencer status PDA
    /// 2. `[]` System program
    InitSequencerStatus,

    /// Flip sequencer availability; the timestamp only moves on
    /// transitions
    /// Accounts:
    /// 0. `[signer]` Status authority
    /// 1. `[writable]` Sequencer status PDA
    UpdateSequencerStatus { is_down: bool },

    /// Create the per-asset oracle binding feed and NAV updater
    /// Accounts:
    /// 0. `[signer, writable]` Admin (pays rent)
    /// 1. `[writable]` Oracle PDA
    /// 2. `[]` Asset mint
    /// 3. `[]` Reference feed PDA for the asset
    /// 4. `[]` System program
    InitOracle {
        nav_updater: Pubkey,
        nav_decimals: u8,
    },

    /// Record a curated NAV opinion; zero means "no opinion yet"
    /// Accounts:
    /// 0. `[signer]` NAV updater
    /// 1. `[writable]` Oracle PDA
    UpdateNav { value: u128 },

    /// Deposit collateral and mint debt against it at the asset's LTV
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
    DepositRwa { amount: u64 },

    /// Burn proportional debt and withdraw collateral after the cooldown
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
    RedeemRwa { amount: u64 },

    /// Repay an undercollateralized account's debt for a penalty-boosted
    /// share of its collateral
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
    /// 11... `[]` One (oracle, reference feed) pair per open position,
    ///        in position order
    Liquidate { repay_amount_wad: u128 },
}

impl RwaVaultInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }
}
