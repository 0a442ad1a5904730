//! CPI helpers for the system and SPL Token programs

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
    sysvar::Sysvar,
};
use spl_token::instruction as token_instruction;

use crate::error::RwaVaultError;

/// SPL Token program ID
pub const TOKEN_PROGRAM_ID: Pubkey = spl_token::ID;

/// Rejects a token account whose mint is not the expected one.
///
/// The token program only requires transfer source and destination to
/// agree with each other, so every processor must pin the mint itself.
pub fn expect_token_account_mint(
    account: &AccountInfo,
    expected_mint: &Pubkey,
) -> Result<(), ProgramError> {
    let token_account = spl_token::state::Account::unpack(&account.data.borrow())?;
    if token_account.mint != *expected_mint {
        return Err(RwaVaultError::TokenMintMismatch.into());
    }
    Ok(())
}

/// Create a rent-exempt program-owned PDA account
pub fn create_pda_account<'a>(
    payer: &AccountInfo<'a>,
    new_account: &AccountInfo<'a>,
    space: usize,
    owner: &Pubkey,
    system_program_account: &AccountInfo<'a>,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    if system_program_account.key != &system_program::ID {
        return Err(ProgramError::IncorrectProgramId);
    }
    let rent = Rent::get()?;
    let lamports = rent.minimum_balance(space);

    invoke_signed(
        &system_instruction::create_account(
            payer.key,
            new_account.key,
            lamports,
            space as u64,
            owner,
        ),
        &[payer.clone(), new_account.clone(), system_program_account.clone()],
        &[signer_seeds],
    )
}

/// Transfer SPL tokens with the owner signing the transaction
pub fn token_transfer<'a>(
    token_program: &AccountInfo<'a>,
    source: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    authority: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    invoke(
        &token_instruction::transfer(
            token_program.key,
            source.key,
            destination.key,
            authority.key,
            &[],
            amount,
        )?,
        &[
            source.clone(),
            destination.clone(),
            authority.clone(),
            token_program.clone(),
        ],
    )
}

/// Transfer SPL tokens out of a vault owned by a program PDA
pub fn token_transfer_signed<'a>(
    token_program: &AccountInfo<'a>,
    source: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    authority: &AccountInfo<'a>,
    amount: u64,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    invoke_signed(
        &token_instruction::transfer(
            token_program.key,
            source.key,
            destination.key,
            authority.key,
            &[],
            amount,
        )?,
        &[
            source.clone(),
            destination.clone(),
            authority.clone(),
            token_program.clone(),
        ],
        &[signer_seeds],
    )
}

/// Mint debt tokens via the program's mint-authority PDA
pub fn token_mint_to_signed<'a>(
    token_program: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    mint_authority: &AccountInfo<'a>,
    amount: u64,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    invoke_signed(
        &token_instruction::mint_to(
            token_program.key,
            mint.key,
            destination.key,
            mint_authority.key,
            &[],
            amount,
        )?,
        &[
            mint.clone(),
            destination.clone(),
            mint_authority.clone(),
            token_program.clone(),
        ],
        &[signer_seeds],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_program::{account_info::AccountInfo, clock::Epoch};
    use spl_token::state::{Account as TokenAccount, AccountState};

    fn packed_token_account(mint: Pubkey) -> Vec<u8> {
        let mut account = TokenAccount::default();
        account.mint = mint;
        account.owner = Pubkey::new_unique();
        account.state = AccountState::Initialized;
        let mut data = vec![0u8; TokenAccount::LEN];
        TokenAccount::pack(account, &mut data).unwrap();
        data
    }

    #[test]
    fn test_token_account_mint_is_pinned() {
        let mint = Pubkey::new_unique();
        let other_mint = Pubkey::new_unique();
        let key = Pubkey::new_unique();
        let token_owner = spl_token::ID;
        let mut lamports = 0u64;
        let mut data = packed_token_account(mint);
        let info = AccountInfo::new(
            &key,
            false,
            false,
            &mut lamports,
            &mut data,
            &token_owner,
            false,
            Epoch::default(),
        );

        assert!(expect_token_account_mint(&info, &mint).is_ok());
        assert_eq!(
            expect_token_account_mint(&info, &other_mint).unwrap_err(),
            RwaVaultError::TokenMintMismatch.into()
        );
    }
}

/// Burn debt tokens from an account whose owner signed the transaction
pub fn token_burn<'a>(
    token_program: &AccountInfo<'a>,
    source: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    authority: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    invoke(
        &token_instruction::burn(
            token_program.key,
            source.key,
            mint.key,
            authority.key,
            &[],
            amount,
        )?,
        &[
            source.clone(),
            mint.clone(),
            authority.clone(),
            token_program.clone(),
        ],
    )
}
