// RWA Collateral Vault for the stable-value protocol
// Native Solana implementation - NO ANCHOR

use solana_program::entrypoint;

pub mod constants;
pub mod cpi;
pub mod error;
pub mod health;
pub mod instruction;
pub mod ledger;
pub mod liquidation;
pub mod math;
pub mod oracle;
pub mod pda;
pub mod processor;
pub mod registry;

pub use error::RwaVaultError;

use processor::process_instruction;

// Declare program ID
solana_program::declare_id!("RwaVau1t11111111111111111111111111111111111");

#[cfg(not(feature = "no-entrypoint"))]
entrypoint!(process_instruction);
