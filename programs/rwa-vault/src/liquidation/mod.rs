//! Liquidation engine
//!
//! Restores undercollateralized accounts to the target solvency ratio.
//! The sizing and seizure math is pure (`engine`); the instruction
//! processor wires it to the ledger and token CPIs.

pub mod engine;
pub mod processor;

pub use engine::{
    effective_repay_amount, get_liquidation_info, is_liquidatable, seizure_split,
    target_restoration_amount, LiquidationInfo, SeizureBreakdown,
};
