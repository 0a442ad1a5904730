//! Oracle instruction processors

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvar::Sysvar,
};

use crate::cpi::create_pda_account;
use crate::error::RwaVaultError;
use crate::oracle::state::{ReferenceFeed, RwaOracle, SequencerStatus};
use crate::pda::{
    derive_oracle_pda, derive_reference_feed_pda, derive_sequencer_pda, ORACLE_SEED,
    REFERENCE_FEED_SEED, SEQUENCER_SEED,
};

/// Accounts:
/// 0. `[signer, writable]` Feed authority (pays rent)
/// 1. `[writable]` Reference feed PDA
/// 2. `[]` Asset mint
/// 3. `[]` System program
pub fn process_init_reference_feed(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    decimals: u8,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let authority = next_account_info(account_iter)?;
    let feed_account = next_account_info(account_iter)?;
    let asset_mint = next_account_info(account_iter)?;
    let system_program_account = next_account_info(account_iter)?;

    if !authority.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if decimals > 18 {
        return Err(RwaVaultError::UnsupportedFeedDecimals.into());
    }

    let (expected, bump) = derive_reference_feed_pda(program_id, asset_mint.key);
    if feed_account.key != &expected {
        return Err(ProgramError::InvalidSeeds);
    }
    if !feed_account.data_is_empty() {
        return Err(RwaVaultError::AlreadyInitialized.into());
    }

    create_pda_account(
        authority,
        feed_account,
        ReferenceFeed::SIZE,
        program_id,
        system_program_account,
        &[REFERENCE_FEED_SEED, asset_mint.key.as_ref(), &[bump]],
    )?;

    let feed = ReferenceFeed::new(*authority.key, *asset_mint.key, decimals);
    feed.save(feed_account)?;

    msg!("Reference feed initialized: {} decimals", decimals);
    Ok(())
}

/// Accounts:
/// 0. `[signer]` Feed authority
/// 1. `[writable]` Reference feed PDA
pub fn process_update_reference_feed(
    accounts: &[AccountInfo],
    round_id: u64,
    answer: i64,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let authority = next_account_info(account_iter)?;
    let feed_account = next_account_info(account_iter)?;

    if !authority.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut feed = ReferenceFeed::load(feed_account)?;
    if feed.authority != *authority.key {
        return Err(RwaVaultError::Unauthorized.into());
    }

    let clock = Clock::get()?;
    feed.round_id = round_id;
    feed.answer = answer;
    feed.updated_at = clock.unix_timestamp;
    feed.save(feed_account)?;

    msg!("Reference round {}: {}", round_id, answer);
    Ok(())
}

/// Accounts:
/// 0. `[signer, writable]` Status authority (pays rent)
/// 1. `[writable]` Sequencer status PDA
/// 2. `[]` System program
pub fn process_init_sequencer_status(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let authority = next_account_info(account_iter)?;
    let status_account = next_account_info(account_iter)?;
    let system_program_account = next_account_info(account_iter)?;

    if !authority.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (expected, bump) = derive_sequencer_pda(program_id);
    if status_account.key != &expected {
        return Err(ProgramError::InvalidSeeds);
    }
    if !status_account.data_is_empty() {
        return Err(RwaVaultError::AlreadyInitialized.into());
    }

    create_pda_account(
        authority,
        status_account,
        SequencerStatus::SIZE,
        program_id,
        system_program_account,
        &[SEQUENCER_SEED, &[bump]],
    )?;

    let clock = Clock::get()?;
    let status = SequencerStatus::new(*authority.key, clock.unix_timestamp);
    status.save(status_account)?;

    msg!("Sequencer status feed initialized");
    Ok(())
}

/// Accounts:
/// 0. `[signer]` Status authority
/// 1. `[writable]` Sequencer status PDA
pub fn process_update_sequencer_status(accounts: &[AccountInfo], is_down: bool) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let authority = next_account_info(account_iter)?;
    let status_account = next_account_info(account_iter)?;

    if !authority.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut status = SequencerStatus::load(status_account)?;
    if status.authority != *authority.key {
        return Err(RwaVaultError::Unauthorized.into());
    }

    // The grace period is measured from the last transition, so the
    // timestamp only moves when the status actually flips
    if status.is_down != is_down {
        let clock = Clock::get()?;
        status.is_down = is_down;
        status.status_changed_at = clock.unix_timestamp;
        status.save(status_account)?;
        msg!("Sequencer status changed: down={}", is_down);
    }

    Ok(())
}

/// Accounts:
/// 0. `[signer, writable]` Admin (pays rent)
/// 1. `[writable]` Oracle PDA
/// 2. `[]` Asset mint
/// 3. `[]` Reference feed PDA for the asset
/// 4. `[]` System program
pub fn process_init_oracle(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    nav_updater: Pubkey,
    nav_decimals: u8,
) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let admin = next_account_info(account_iter)?;
    let oracle_account = next_account_info(account_iter)?;
    let asset_mint = next_account_info(account_iter)?;
    let feed_account = next_account_info(account_iter)?;
    let system_program_account = next_account_info(account_iter)?;

    if !admin.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if nav_decimals > 18 {
        return Err(RwaVaultError::UnsupportedFeedDecimals.into());
    }

    let (expected, bump) = derive_oracle_pda(program_id, asset_mint.key);
    if oracle_account.key != &expected {
        return Err(ProgramError::InvalidSeeds);
    }
    if !oracle_account.data_is_empty() {
        return Err(RwaVaultError::AlreadyInitialized.into());
    }

    // The oracle is permanently bound to the asset's reference feed
    let (expected_feed, _) = derive_reference_feed_pda(program_id, asset_mint.key);
    if feed_account.key != &expected_feed {
        return Err(RwaVaultError::InvalidOracleAccount.into());
    }

    create_pda_account(
        admin,
        oracle_account,
        RwaOracle::SIZE,
        program_id,
        system_program_account,
        &[ORACLE_SEED, asset_mint.key.as_ref(), &[bump]],
    )?;

    let oracle = RwaOracle::new(*asset_mint.key, *feed_account.key, nav_updater, nav_decimals);
    oracle.save(oracle_account)?;

    msg!("Oracle initialized for asset {}", asset_mint.key);
    Ok(())
}

/// Accounts:
/// 0. `[signer]` NAV updater
/// 1. `[writable]` Oracle PDA
pub fn process_update_nav(accounts: &[AccountInfo], value: u128) -> ProgramResult {
    let account_iter = &mut accounts.iter();
    let updater = next_account_info(account_iter)?;
    let oracle_account = next_account_info(account_iter)?;

    if !updater.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut oracle = RwaOracle::load(oracle_account)?;
    if oracle.nav_updater != *updater.key {
        return Err(RwaVaultError::Unauthorized.into());
    }

    // Zero is a legal write: "no NAV opinion yet"
    let clock = Clock::get()?;
    oracle.nav_value = value;
    oracle.nav_updated_at = clock.unix_timestamp;
    oracle.save(oracle_account)?;

    msg!("NAV updated: {}", value);
    Ok(())
}
