//! Oracle account state

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey};

use crate::constants::{
    DISCRIMINATOR_SIZE, ORACLE_DISCRIMINATOR, REFERENCE_FEED_DISCRIMINATOR,
    SEQUENCER_DISCRIMINATOR,
};
use crate::error::RwaVaultError;

/// Keeper-pushed general market price feed, one per asset class
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct ReferenceFeed {
    pub discriminator: [u8; DISCRIMINATOR_SIZE],

    /// Keeper allowed to push rounds
    pub authority: Pubkey,

    /// Asset this feed prices
    pub asset_mint: Pubkey,

    /// Monotonic round counter; zero means "never updated"
    pub round_id: u64,

    /// Raw answer in `decimals` precision
    pub answer: i64,

    /// Feed-declared decimals, at most 18
    pub decimals: u8,

    /// Unix timestamp of the last round
    pub updated_at: i64,
}

impl ReferenceFeed {
    pub const SIZE: usize = DISCRIMINATOR_SIZE + 32 + 32 + 8 + 8 + 1 + 8;

    pub fn new(authority: Pubkey, asset_mint: Pubkey, decimals: u8) -> Self {
        Self {
            discriminator: REFERENCE_FEED_DISCRIMINATOR,
            authority,
            asset_mint,
            round_id: 0,
            answer: 0,
            decimals,
            updated_at: 0,
        }
    }

    pub fn load(account: &AccountInfo) -> Result<Self, ProgramError> {
        if account.owner != &crate::id() {
            return Err(ProgramError::IncorrectProgramId);
        }
        let data = account.data.borrow();
        let feed = Self::deserialize(&mut &data[..])
            .map_err(|_| ProgramError::InvalidAccountData)?;
        if feed.discriminator != REFERENCE_FEED_DISCRIMINATOR {
            return Err(RwaVaultError::InvalidDiscriminator.into());
        }
        Ok(feed)
    }

    pub fn save(&self, account: &AccountInfo) -> Result<(), ProgramError> {
        let mut data = account.data.borrow_mut();
        self.serialize(&mut &mut data[..])
            .map_err(|_| ProgramError::AccountDataTooSmall)?;
        Ok(())
    }
}

/// Per-asset oracle: binds a reference feed to the curated NAV source
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct RwaOracle {
    pub discriminator: [u8; DISCRIMINATOR_SIZE],

    /// Asset this oracle prices
    pub asset_mint: Pubkey,

    /// Reference feed account this oracle trusts
    pub reference_feed: Pubkey,

    /// Sole address allowed to write NAV updates
    pub nav_updater: Pubkey,

    /// Curated NAV in `nav_decimals` precision; zero means "no opinion yet"
    pub nav_value: u128,

    /// NAV-declared decimals, at most 18
    pub nav_decimals: u8,

    /// Unix timestamp of the last NAV write
    pub nav_updated_at: i64,
}

impl RwaOracle {
    pub const SIZE: usize = DISCRIMINATOR_SIZE + 32 + 32 + 32 + 16 + 1 + 8;

    pub fn new(
        asset_mint: Pubkey,
        reference_feed: Pubkey,
        nav_updater: Pubkey,
        nav_decimals: u8,
    ) -> Self {
        Self {
            discriminator: ORACLE_DISCRIMINATOR,
            asset_mint,
            reference_feed,
            nav_updater,
            nav_value: 0,
            nav_decimals,
            nav_updated_at: 0,
        }
    }

    pub fn load(account: &AccountInfo) -> Result<Self, ProgramError> {
        if account.owner != &crate::id() {
            return Err(ProgramError::IncorrectProgramId);
        }
        let data = account.data.borrow();
        let oracle = Self::deserialize(&mut &data[..])
            .map_err(|_| ProgramError::InvalidAccountData)?;
        if oracle.discriminator != ORACLE_DISCRIMINATOR {
            return Err(RwaVaultError::InvalidDiscriminator.into());
        }
        Ok(oracle)
    }

    pub fn save(&self, account: &AccountInfo) -> Result<(), ProgramError> {
        let mut data = account.data.borrow_mut();
        self.serialize(&mut &mut data[..])
            .map_err(|_| ProgramError::AccountDataTooSmall)?;
        Ok(())
    }
}

/// Singleton sequencing-layer availability feed
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct SequencerStatus {
    pub discriminator: [u8; DISCRIMINATOR_SIZE],

    /// Keeper allowed to flip the status
    pub authority: Pubkey,

    pub is_down: bool,

    /// Unix timestamp of the last status transition
    pub status_changed_at: i64,
}

impl SequencerStatus {
    pub const SIZE: usize = DISCRIMINATOR_SIZE + 32 + 1 + 8;

    pub fn new(authority: Pubkey, now: i64) -> Self {
        Self {
            discriminator: SEQUENCER_DISCRIMINATOR,
            authority,
            is_down: false,
            status_changed_at: now,
        }
    }

    pub fn load(account: &AccountInfo) -> Result<Self, ProgramError> {
        if account.owner != &crate::id() {
            return Err(ProgramError::IncorrectProgramId);
        }
        let data = account.data.borrow();
        let status = Self::deserialize(&mut &data[..])
            .map_err(|_| ProgramError::InvalidAccountData)?;
        if status.discriminator != SEQUENCER_DISCRIMINATOR {
            return Err(RwaVaultError::InvalidDiscriminator.into());
        }
        Ok(status)
    }

    pub fn save(&self, account: &AccountInfo) -> Result<(), ProgramError> {
        let mut data = account.data.borrow_mut();
        self.serialize(&mut &mut data[..])
            .map_err(|_| ProgramError::AccountDataTooSmall)?;
        Ok(())
    }
}
