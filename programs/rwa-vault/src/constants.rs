//! Global constants for the RWA collateral vault
//!
//! Central location for all protocol-wide parameters

/// Internal fixed-point scale (18 decimals, "wad")
pub const PRICE_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Internal price decimals
pub const PRICE_DECIMALS: u8 = 18;

/// Basis point divisor (10000 = 100%)
pub const BPS_DIVISOR: u128 = 10_000;

/// Debt token decimals (SPL amounts are u64, so the on-chain token
/// runs at 9 decimals; the ledger keeps full 18-decimal debt)
pub const DEBT_TOKEN_DECIMALS: u8 = 9;

/// Scale between ledger debt (wad) and debt token units
pub const DEBT_TOKEN_SCALE: u128 = 1_000_000_000;

/// Reference price feed staleness timeout in seconds
pub const REFERENCE_FEED_TIMEOUT: i64 = 3_600; // 1 hour

/// NAV feed staleness timeout in seconds
pub const NAV_FEED_TIMEOUT: i64 = 86_400; // 24 hours

/// Mandatory wait after sequencer recovery in seconds
pub const SEQUENCER_GRACE_PERIOD: i64 = 3_600; // 1 hour

/// Maximum NAV deviation from the reference feed in basis points
pub const CIRCUIT_BREAKER_BPS: u128 = 1_500; // 15%

/// Redemption cooldown measured from the position's last deposit
pub const REDEEM_COOLDOWN: i64 = 604_800; // 7 days

/// Redemption fee in basis points, retained in collateral
pub const REDEMPTION_FEE_BPS: u128 = 50; // 0.5%

/// Health factor below which a position is liquidatable
pub const LIQUIDATION_THRESHOLD: u128 = 115;

/// Health factor a partial liquidation restores the account to
pub const TARGET_HEALTH_FACTOR: u128 = 125;

/// Liquidator incentive in basis points, on top of principal collateral
pub const LIQUIDATOR_BONUS_BPS: u128 = 400; // 4%

/// Protocol share of the liquidation penalty in basis points
pub const PROTOCOL_LIQUIDATION_FEE_BPS: u128 = 100; // 1%

/// Total liquidation penalty in basis points
pub const TOTAL_LIQUIDATION_PENALTY_BPS: u128 =
    LIQUIDATOR_BONUS_BPS + PROTOCOL_LIQUIDATION_FEE_BPS;

/// Maximum number of whitelisted collateral asset classes
pub const MAX_COLLATERAL_ASSETS: usize = 32;

/// Maximum number of open positions per user account
pub const MAX_POSITIONS_PER_USER: usize = 16;

/// Account discriminator size
pub const DISCRIMINATOR_SIZE: usize = 8;

/// Registry discriminator
pub const REGISTRY_DISCRIMINATOR: [u8; 8] = [82, 87, 65, 82, 69, 71, 83, 84]; // "RWAREGST"

/// User positions discriminator
pub const USER_POSITIONS_DISCRIMINATOR: [u8; 8] = [82, 87, 65, 85, 83, 69, 82, 80]; // "RWAUSERP"

/// Oracle discriminator
pub const ORACLE_DISCRIMINATOR: [u8; 8] = [82, 87, 65, 79, 82, 67, 76, 69]; // "RWAORCLE"

/// Reference feed discriminator
pub const REFERENCE_FEED_DISCRIMINATOR: [u8; 8] = [82, 87, 65, 82, 70, 69, 69, 68]; // "RWARFEED"

/// Sequencer status discriminator
pub const SEQUENCER_DISCRIMINATOR: [u8; 8] = [82, 87, 65, 83, 69, 81, 83, 84]; // "RWASEQST"
