//! Position ledger
//!
//! Per-account, per-asset records of deposited collateral and the debt
//! issued against it. The position set is the sole source of truth for
//! outstanding debt.

pub mod deposit;
pub mod redeem;
pub mod state;

pub use state::{Position, UserPositions};
