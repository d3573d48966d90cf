use borsh::BorshSerialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, set_return_data},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction, system_program,
};

use crate::{
    error::RegistryError,
    events::{RegistryEvent, Withdrawn},
    instruction::RegistryInstruction,
    registry::{Registry, RegistryConfig},
    state::{RegistryAccount, RegistryHeader},
    treasury::FundTransfer,
};

/// Moves lamports straight out of the program-owned registry account.
struct LamportTransfer<'a, 'info> {
    from: &'a AccountInfo<'info>,
    to: &'a AccountInfo<'info>,
}

impl FundTransfer for LamportTransfer<'_, '_> {
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<(), RegistryError> {
        if self.to.key != to || !self.to.is_writable || self.from.key == self.to.key {
            return Err(RegistryError::TransferFailed);
        }
        let source = self
            .from
            .lamports()
            .checked_sub(amount)
            .ok_or(RegistryError::TransferFailed)?;
        let destination = self
            .to
            .lamports()
            .checked_add(amount)
            .ok_or(RegistryError::TransferFailed)?;

        **self
            .from
            .try_borrow_mut_lamports()
            .map_err(|_| RegistryError::TransferFailed)? = source;
        **self
            .to
            .try_borrow_mut_lamports()
            .map_err(|_| RegistryError::TransferFailed)? = destination;
        Ok(())
    }
}

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction: RegistryInstruction,
    ) -> ProgramResult {
        match instruction {
            RegistryInstruction::Initialize { config } => {
                msg!("Instruction: Initialize");
                Self::process_initialize(program_id, accounts, config)
            }
            RegistryInstruction::Register { name, payment } => {
                msg!("Instruction: Register");
                Self::process_register(program_id, accounts, name, payment)
            }
            RegistryInstruction::SetRecord { name, record } => {
                msg!("Instruction: SetRecord");
                Self::process_set_record(program_id, accounts, name, record)
            }
            RegistryInstruction::Withdraw => {
                msg!("Instruction: Withdraw");
                Self::process_withdraw(program_id, accounts)
            }
            RegistryInstruction::GetOwner { name } => {
                msg!("Instruction: GetOwner");
                Self::process_query(program_id, accounts, |registry| {
                    registry.get_owner(&name).copied().try_to_vec()
                })
            }
            RegistryInstruction::GetRecord { name } => {
                msg!("Instruction: GetRecord");
                Self::process_query(program_id, accounts, |registry| {
                    registry.get_record(&name).map(str::to_string).try_to_vec()
                })
            }
            RegistryInstruction::GetPrice { name } => {
                msg!("Instruction: GetPrice");
                let accounts_iter = &mut accounts.iter();
                let registry_account = next_account_info(accounts_iter)?;
                let state = Self::load(program_id, registry_account)?;
                let price = state.registry.price_of(&name)?;
                set_return_data(&price.to_le_bytes());
                Ok(())
            }
        }
    }

    fn check_owner(program_id: &Pubkey, registry_account: &AccountInfo) -> ProgramResult {
        if registry_account.owner != program_id {
            return Err(ProgramError::IncorrectProgramId);
        }
        Ok(())
    }

    fn load(
        program_id: &Pubkey,
        registry_account: &AccountInfo,
    ) -> Result<RegistryAccount, ProgramError> {
        Self::check_owner(program_id, registry_account)?;
        RegistryAccount::unpack(&registry_account.data.borrow())
    }

    fn process_initialize(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        config: RegistryConfig,
    ) -> ProgramResult {
        let accounts_iter = &mut accounts.iter();
        let admin = next_account_info(accounts_iter)?;
        let registry_account = next_account_info(accounts_iter)?;

        if !admin.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        Self::check_owner(program_id, registry_account)?;
        if !RegistryAccount::is_blank(&registry_account.data.borrow()) {
            return Err(RegistryError::AlreadyInitialized.into());
        }

        let registry = Registry::new(*admin.key, config)?;
        msg!(
            "initialized: admin={} suffix={}",
            registry.admin(),
            registry.config().suffix
        );
        RegistryAccount::new(registry).pack(&mut registry_account.data.borrow_mut())?;

        Ok(())
    }

    fn process_register(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        name: String,
        payment: u64,
    ) -> ProgramResult {
        let accounts_iter = &mut accounts.iter();
        let registrant = next_account_info(accounts_iter)?;
        let registry_account = next_account_info(accounts_iter)?;
        let system_program_account = next_account_info(accounts_iter)?;

        if !registrant.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        if system_program_account.key != &system_program::id() {
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut state = Self::load(program_id, registry_account)?;
        let registered = state.registry.register(*registrant.key, &name, payment)?;

        // Ownership is written before the fee moves.
        state.pack(&mut registry_account.data.borrow_mut())?;

        // Only the price is pulled; the refund never leaves the registrant.
        invoke(
            &system_instruction::transfer(
                registrant.key,
                registry_account.key,
                registered.price,
            ),
            &[
                registrant.clone(),
                registry_account.clone(),
                system_program_account.clone(),
            ],
        )?;

        RegistryEvent::from(registered).emit();
        Ok(())
    }

    fn process_set_record(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        name: String,
        record: String,
    ) -> ProgramResult {
        let accounts_iter = &mut accounts.iter();
        let owner = next_account_info(accounts_iter)?;
        let registry_account = next_account_info(accounts_iter)?;

        if !owner.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut state = Self::load(program_id, registry_account)?;
        let updated = state.registry.set_record(owner.key, &name, &record)?;
        state.pack(&mut registry_account.data.borrow_mut())?;

        RegistryEvent::from(updated).emit();
        Ok(())
    }

    fn process_withdraw(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let accounts_iter = &mut accounts.iter();
        let admin = next_account_info(accounts_iter)?;
        let registry_account = next_account_info(accounts_iter)?;

        if !admin.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        Self::check_owner(program_id, registry_account)?;

        // Only the header is decoded; the name list is never loaded here.
        let mut header = RegistryHeader::unpack(&registry_account.data.borrow())?;
        let mut transfer = LamportTransfer {
            from: registry_account,
            to: admin,
        };
        let amount = header.treasury.withdraw(admin.key, &mut transfer)?;
        header.pack(&mut registry_account.data.borrow_mut())?;

        RegistryEvent::from(Withdrawn {
            admin: *header.treasury.admin(),
            amount,
        })
        .emit();
        Ok(())
    }

    fn process_query<F>(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        query: F,
    ) -> ProgramResult
    where
        F: FnOnce(&Registry) -> std::io::Result<Vec<u8>>,
    {
        let accounts_iter = &mut accounts.iter();
        let registry_account = next_account_info(accounts_iter)?;
        let state = Self::load(program_id, registry_account)?;
        let data = query(&state.registry).map_err(|_| ProgramError::InvalidAccountData)?;
        set_return_data(&data);
        Ok(())
    }
}
