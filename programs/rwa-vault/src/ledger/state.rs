//! Ledger account state

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey};

use crate::constants::{
    DISCRIMINATOR_SIZE, MAX_POSITIONS_PER_USER, USER_POSITIONS_DISCRIMINATOR,
};
use crate::error::RwaVaultError;

/// One (account, asset) position
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct Position {
    /// Collateral asset mint
    pub asset_mint: Pubkey,

    /// Deposited collateral in asset-native precision
    pub collateral_amount: u64,

    /// Debt issued against it, 18-decimal wad
    pub debt_amount: u128,

    /// Unix timestamp of the last deposit; starts the redemption cooldown
    pub deposit_time: i64,
}

impl Position {
    pub const SIZE: usize = 32 + 8 + 16 + 8;
}

/// Per-user position table
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct UserPositions {
    pub discriminator: [u8; DISCRIMINATOR_SIZE],

    pub owner: Pubkey,

    pub positions: Vec<Position>,
}

impl UserPositions {
    /// Allocation size with the position table at capacity
    pub const MAX_SIZE: usize =
        DISCRIMINATOR_SIZE + 32 + 4 + MAX_POSITIONS_PER_USER * Position::SIZE;

    pub fn new(owner: Pubkey) -> Self {
        Self {
            discriminator: USER_POSITIONS_DISCRIMINATOR,
            owner,
            positions: Vec::new(),
        }
    }

    pub fn load(account: &AccountInfo) -> Result<Self, ProgramError> {
        if account.owner != &crate::id() {
            return Err(ProgramError::IncorrectProgramId);
        }
        let data = account.data.borrow();
        let positions = Self::deserialize(&mut &data[..])
            .map_err(|_| ProgramError::InvalidAccountData)?;
        if positions.discriminator != USER_POSITIONS_DISCRIMINATOR {
            return Err(RwaVaultError::InvalidDiscriminator.into());
        }
        Ok(positions)
    }

    pub fn save(&self, account: &AccountInfo) -> Result<(), ProgramError> {
        let mut data = account.data.borrow_mut();
        self.serialize(&mut &mut data[..])
            .map_err(|_| ProgramError::AccountDataTooSmall)?;
        Ok(())
    }

    pub fn position(&self, asset_mint: &Pubkey) -> Option<&Position> {
        self.positions.iter().find(|p| p.asset_mint == *asset_mint)
    }

    pub fn position_mut(&mut self, asset_mint: &Pubkey) -> Option<&mut Position> {
        self.positions
            .iter_mut()
            .find(|p| p.asset_mint == *asset_mint)
    }

    /// Increases a position by a deposit, creating it if absent.
    ///
    /// Every deposit restarts the redemption cooldown for the pair.
    pub fn apply_deposit(
        &mut self,
        asset_mint: &Pubkey,
        amount: u64,
        debt: u128,
        now: i64,
    ) -> Result<(), RwaVaultError> {
        match self.position_mut(asset_mint) {
            Some(position) => {
                position.collateral_amount = position
                    .collateral_amount
                    .checked_add(amount)
                    .ok_or(RwaVaultError::MathOverflow)?;
                position.debt_amount = position
                    .debt_amount
                    .checked_add(debt)
                    .ok_or(RwaVaultError::MathOverflow)?;
                position.deposit_time = now;
            }
            None => {
                if self.positions.len() >= MAX_POSITIONS_PER_USER {
                    return Err(RwaVaultError::PositionTableFull);
                }
                self.positions.push(Position {
                    asset_mint: *asset_mint,
                    collateral_amount: amount,
                    debt_amount: debt,
                    deposit_time: now,
                });
            }
        }
        Ok(())
    }

    /// Removes entries whose collateral and debt both reached zero
    pub fn prune_closed(&mut self) {
        self.positions
            .retain(|p| p.collateral_amount != 0 || p.debt_amount != 0);
    }
}
