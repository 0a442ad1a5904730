//! Robust price computation
//!
//! Pure validation over the two price sources plus the sequencer feed.
//! Recomputed on every read; a snapshot is never cached across operations.

use solana_program::{account_info::AccountInfo, clock::Clock, program_error::ProgramError};

use crate::constants::{
    CIRCUIT_BREAKER_BPS, BPS_DIVISOR, NAV_FEED_TIMEOUT, REFERENCE_FEED_TIMEOUT,
    SEQUENCER_GRACE_PERIOD,
};
use crate::error::RwaVaultError;
use crate::math::scale_to_wad;
use crate::oracle::state::{ReferenceFeed, RwaOracle, SequencerStatus};

/// One reference feed round as read from its account
#[derive(Debug, Clone, Copy)]
pub struct FeedReading {
    pub round_id: u64,
    pub answer: i64,
    pub decimals: u8,
    pub updated_at: i64,
}

/// Curated NAV opinion as read from the oracle account
#[derive(Debug, Clone, Copy)]
pub struct NavReading {
    /// Raw value in `decimals` precision; zero means "not yet set"
    pub value: u128,
    pub decimals: u8,
    pub updated_at: i64,
}

/// Sequencing-layer availability as read from its account
#[derive(Debug, Clone, Copy)]
pub struct SequencerReading {
    pub is_down: bool,
    pub status_changed_at: i64,
}

/// Derived result of one validated price read
#[derive(Debug, Clone, Copy)]
pub struct PriceSnapshot {
    /// Raw reference answer, if the reference round validated
    pub reference_raw: Option<i64>,

    /// Raw NAV value, if the NAV validated and is set
    pub nav_raw: Option<u128>,

    /// Reference price normalized to wad
    pub reference_wad: Option<u128>,

    /// NAV normalized to wad
    pub nav_wad: Option<u128>,

    /// The robust price in wad
    pub price_wad: u128,

    /// Validation timestamp
    pub validated_at: i64,
}

fn reference_is_valid(feed: &FeedReading, now: i64) -> bool {
    feed.round_id != 0
        && feed.updated_at != 0
        && feed.updated_at <= now
        && feed.answer > 0
        && now - feed.updated_at <= REFERENCE_FEED_TIMEOUT
}

fn nav_is_valid(nav: &NavReading, now: i64) -> bool {
    nav.updated_at != 0 && nav.updated_at <= now && now - nav.updated_at <= NAV_FEED_TIMEOUT
}

/// Computes the robust price from both sources.
///
/// Order of checks matches the oracle contract: sequencer availability,
/// grace period, per-source validation, deviation circuit breaker, then
/// averaging or single-source fallback.
pub fn compute_robust_price(
    reference: &FeedReading,
    nav: &NavReading,
    sequencer: &SequencerReading,
    now: i64,
) -> Result<PriceSnapshot, RwaVaultError> {
    if sequencer.is_down {
        return Err(RwaVaultError::SequencerDown);
    }
    if now - sequencer.status_changed_at < SEQUENCER_GRACE_PERIOD {
        return Err(RwaVaultError::GracePeriodNotOver);
    }

    let reference_wad = if reference_is_valid(reference, now) {
        Some(scale_to_wad(reference.answer as u128, reference.decimals)?)
    } else {
        None
    };

    // A zero NAV is "no opinion yet", not a failure
    let nav_wad = if nav_is_valid(nav, now) && nav.value != 0 {
        Some(scale_to_wad(nav.value, nav.decimals)?)
    } else {
        None
    };

    let price_wad = match (reference_wad, nav_wad) {
        (Some(reference_price), Some(nav_price)) => {
            let deviation = reference_price.abs_diff(nav_price);
            let max_deviation = reference_price
                .checked_mul(CIRCUIT_BREAKER_BPS)
                .ok_or(RwaVaultError::MathOverflow)?
                / BPS_DIVISOR;
            if deviation > max_deviation {
                return Err(RwaVaultError::CircuitBreakerTripped);
            }
            reference_price
                .checked_add(nav_price)
                .ok_or(RwaVaultError::MathOverflow)?
                / 2
        }
        (Some(reference_price), None) => reference_price,
        (None, Some(nav_price)) => nav_price,
        (None, None) => return Err(RwaVaultError::NoValidPriceSource),
    };

    Ok(PriceSnapshot {
        reference_raw: reference_wad.map(|_| reference.answer),
        nav_raw: nav_wad.map(|_| nav.value),
        reference_wad,
        nav_wad,
        price_wad,
        validated_at: now,
    })
}

/// Reads and validates the robust price from on-chain oracle accounts.
///
/// The reference feed account must be the one the oracle was bound to at
/// initialization.
pub fn resolve_price(
    oracle_account: &AccountInfo,
    feed_account: &AccountInfo,
    sequencer_account: &AccountInfo,
    clock: &Clock,
) -> Result<PriceSnapshot, ProgramError> {
    let oracle = RwaOracle::load(oracle_account)?;
    if oracle.reference_feed != *feed_account.key {
        return Err(RwaVaultError::InvalidOracleAccount.into());
    }
    let feed = ReferenceFeed::load(feed_account)?;
    let sequencer = SequencerStatus::load(sequencer_account)?;

    let snapshot = compute_robust_price(
        &FeedReading {
            round_id: feed.round_id,
            answer: feed.answer,
            decimals: feed.decimals,
            updated_at: feed.updated_at,
        },
        &NavReading {
            value: oracle.nav_value,
            decimals: oracle.nav_decimals,
            updated_at: oracle.nav_updated_at,
        },
        &SequencerReading {
            is_down: sequencer.is_down,
            status_changed_at: sequencer.status_changed_at,
        },
        clock.unix_timestamp,
    )?;
    Ok(snapshot)
}
