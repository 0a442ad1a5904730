//! Instruction dispatch

use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, msg, pubkey::Pubkey,
};

use crate::instruction::RwaVaultInstruction;
use crate::ledger::{deposit::process_deposit_rwa, redeem::process_redeem_rwa};
use crate::liquidation::processor::process_liquidate;
use crate::oracle::handlers::{
    process_init_oracle, process_init_reference_feed, process_init_sequencer_status,
    process_update_nav, process_update_reference_feed, process_update_sequencer_status,
};
use crate::registry::{
    process_add_collateral_asset, process_init_protocol, process_remove_collateral_asset,
    process_set_pause,
};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = RwaVaultInstruction::unpack(instruction_data)?;

    match instruction {
        RwaVaultInstruction::InitProtocol => {
            msg!("Instruction: InitProtocol");
            process_init_protocol(program_id, accounts)
        }

        RwaVaultInstruction::AddCollateralAsset {
            tier,
            ltv_ratio_bps,
            mint_discount_bps,
        } => {
            msg!("Instruction: AddCollateralAsset");
            process_add_collateral_asset(program_id, accounts, tier, ltv_ratio_bps, mint_discount_bps)
        }

        RwaVaultInstruction::RemoveCollateralAsset => {
            msg!("Instruction: RemoveCollateralAsset");
            process_remove_collateral_asset(accounts)
        }

        RwaVaultInstruction::SetPause { paused } => {
            msg!("Instruction: SetPause");
            process_set_pause(accounts, paused)
        }

        RwaVaultInstruction::InitReferenceFeed { decimals } => {
            msg!("Instruction: InitReferenceFeed");
            process_init_reference_feed(program_id, accounts, decimals)
        }

        RwaVaultInstruction::UpdateReferenceFeed { round_id, answer } => {
            msg!("Instruction: UpdateReferenceFeed");
            process_update_reference_feed(accounts, round_id, answer)
        }

        RwaVaultInstruction::InitSequencerStatus => {
            msg!("Instruction: InitSequencerStatus");
            process_init_sequencer_status(program_id, accounts)
        }

        RwaVaultInstruction::UpdateSequencerStatus { is_down } => {
            msg!("Instruction: UpdateSequencerStatus");
            process_update_sequencer_status(accounts, is_down)
        }

        RwaVaultInstruction::InitOracle {
            nav_updater,
            nav_decimals,
        } => {
            msg!("Instruction: InitOracle");
            process_init_oracle(program_id, accounts, nav_updater, nav_decimals)
        }

        RwaVaultInstruction::UpdateNav { value } => {
            msg!("Instruction: UpdateNav");
            process_update_nav(accounts, value)
        }

        RwaVaultInstruction::DepositRwa { amount } => {
            msg!("Instruction: DepositRwa");
            process_deposit_rwa(program_id, accounts, amount)
        }

        RwaVaultInstruction::RedeemRwa { amount } => {
            msg!("Instruction: RedeemRwa");
            process_redeem_rwa(program_id, accounts, amount)
        }

        RwaVaultInstruction::Liquidate { repay_amount_wad } => {
            msg!("Instruction: Liquidate");
            process_liquidate(program_id, accounts, repay_amount_wad)
        }
    }
}
