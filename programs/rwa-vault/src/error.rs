//! Error types for the RWA collateral vault

use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

/// Custom error type for the RWA vault program
#[derive(Clone, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum RwaVaultError {
    // Oracle errors (7000-7019)
    #[error("Sequencer is down")]
    SequencerDown = 7000,

    #[error("Sequencer grace period not over")]
    GracePeriodNotOver = 7001,

    #[error("No valid price source")]
    NoValidPriceSource = 7002,

    #[error("Circuit breaker tripped")]
    CircuitBreakerTripped = 7003,

    #[error("Feed decimals above 18 are unsupported")]
    UnsupportedFeedDecimals = 7004,

    #[error("Oracle account mismatch")]
    InvalidOracleAccount = 7005,

    // Validation errors (7020-7039)
    #[error("Amount must be greater than zero")]
    ZeroAmount = 7020,

    #[error("Asset is not whitelisted")]
    AssetNotWhitelisted = 7021,

    #[error("Asset is deactivated")]
    AssetInactive = 7022,

    #[error("Redemption cooldown not met")]
    CooldownNotMet = 7023,

    #[error("Insufficient collateral in position")]
    InsufficientCollateral = 7024,

    #[error("Protocol is paused")]
    ProtocolPaused = 7025,

    #[error("Position table is full")]
    PositionTableFull = 7026,

    #[error("Position not found")]
    PositionNotFound = 7027,

    #[error("Registry is full")]
    RegistryFull = 7028,

    #[error("Invalid LTV ratio")]
    InvalidLtvRatio = 7029,

    #[error("Vault token account does not match the asset's vault")]
    InvalidVaultAccount = 7030,

    #[error("Token account mint mismatch")]
    TokenMintMismatch = 7031,

    // Authorization errors (7040-7049)
    #[error("Unauthorized")]
    Unauthorized = 7040,

    // Invariant errors (7050-7059)
    #[error("No debt to liquidate")]
    NoDebtToLiquidate = 7050,

    #[error("Position is not liquidatable")]
    PositionNotLiquidatable = 7051,

    // Math errors (7060-7069)
    #[error("Math overflow")]
    MathOverflow = 7060,

    #[error("Division by zero")]
    DivisionByZero = 7061,

    // Account errors (7070-7079)
    #[error("Account already initialized")]
    AlreadyInitialized = 7070,

    #[error("Account not initialized")]
    NotInitialized = 7071,

    #[error("Invalid account discriminator")]
    InvalidDiscriminator = 7072,
}

impl From<RwaVaultError> for ProgramError {
    fn from(e: RwaVaultError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RwaVaultError {
    fn type_of() -> &'static str {
        "RwaVaultError"
    }
}

impl PrintProgramError for RwaVaultError {
    fn print<E>(&self)
    where
        E: 'static + std::error::Error + DecodeError<E> + PrintProgramError + num_traits::FromPrimitive,
    {
        msg!("{}", self);
    }
}
