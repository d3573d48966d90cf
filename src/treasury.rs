use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::RegistryError;

/// Outbound fund movement to an account outside the registry.
///
/// Implementations may hand control to code the registry does not trust, so
/// the treasury never calls one while its own ledger is still pending.
pub trait FundTransfer {
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<(), RegistryError>;
}

/// Fees held by the registry, withdrawable only by the fixed administrator.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Treasury {
    admin: Pubkey,
    balance: u64,
    total_collected: u64,
    total_withdrawn: u64,
}

impl Treasury {
    pub fn new(admin: Pubkey) -> Self {
        Self {
            admin,
            balance: 0,
            total_collected: 0,
            total_withdrawn: 0,
        }
    }

    pub fn admin(&self) -> &Pubkey {
        &self.admin
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn total_collected(&self) -> u64 {
        self.total_collected
    }

    pub fn total_withdrawn(&self) -> u64 {
        self.total_withdrawn
    }

    pub(crate) fn credit(&mut self, amount: u64) -> Result<(), RegistryError> {
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(RegistryError::AmountOverflow)?;
        let total_collected = self
            .total_collected
            .checked_add(amount)
            .ok_or(RegistryError::AmountOverflow)?;
        self.balance = balance;
        self.total_collected = total_collected;
        Ok(())
    }

    /// Sends the whole balance to the administrator.
    ///
    /// The ledger is zeroed before `transfer` runs and restored if it fails.
    /// A zero balance still goes through as a zero transfer.
    pub fn withdraw<T: FundTransfer>(
        &mut self,
        caller: &Pubkey,
        transfer: &mut T,
    ) -> Result<u64, RegistryError> {
        if caller != &self.admin {
            return Err(RegistryError::Unauthorized);
        }

        let amount = self.balance;
        let total_withdrawn = self
            .total_withdrawn
            .checked_add(amount)
            .ok_or(RegistryError::AmountOverflow)?;
        let previous = (self.balance, self.total_withdrawn);
        self.balance = 0;
        self.total_withdrawn = total_withdrawn;

        if let Err(e) = transfer.transfer(&self.admin, amount) {
            (self.balance, self.total_withdrawn) = previous;
            return Err(e);
        }
        Ok(amount)
    }
}
