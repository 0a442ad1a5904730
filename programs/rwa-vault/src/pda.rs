//! PDA derivations for all program-owned accounts

use solana_program::pubkey::Pubkey;

pub const REGISTRY_SEED: &[u8] = b"collateral_registry";
pub const USER_POSITIONS_SEED: &[u8] = b"user_positions";
pub const ORACLE_SEED: &[u8] = b"rwa_oracle";
pub const REFERENCE_FEED_SEED: &[u8] = b"reference_feed";
pub const SEQUENCER_SEED: &[u8] = b"sequencer_status";
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";
pub const DEBT_MINT_AUTHORITY_SEED: &[u8] = b"debt_mint_authority";

pub fn derive_registry_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REGISTRY_SEED], program_id)
}

pub fn derive_user_positions_pda(program_id: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[USER_POSITIONS_SEED, owner.as_ref()], program_id)
}

pub fn derive_oracle_pda(program_id: &Pubkey, asset_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ORACLE_SEED, asset_mint.as_ref()], program_id)
}

pub fn derive_reference_feed_pda(program_id: &Pubkey, asset_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REFERENCE_FEED_SEED, asset_mint.as_ref()], program_id)
}

pub fn derive_sequencer_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SEQUENCER_SEED], program_id)
}

pub fn derive_vault_authority_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_AUTHORITY_SEED], program_id)
}

pub fn derive_debt_mint_authority_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[DEBT_MINT_AUTHORITY_SEED], program_id)
}
