use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::registry::RegistryConfig;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum RegistryInstruction {
    /// Initialize the registry; the signer becomes the administrator
    /// Accounts expected:
    /// 0. `[signer]` The administrator
    /// 1. `[writable]` The registry account
    Initialize {
        config: RegistryConfig,
    },

    /// Register a name, paying its tier price out of `payment`
    /// Accounts expected:
    /// 0. `[signer, writable]` The registrant
    /// 1. `[writable]` The registry account
    /// 2. `[]` The system program
    Register {
        name: String,
        payment: u64,
    },

    /// Replace the record attached to a name
    /// Accounts expected:
    /// 0. `[signer]` The name owner
    /// 1. `[writable]` The registry account
    SetRecord {
        name: String,
        record: String,
    },

    /// Withdraw accumulated fees
    /// Accounts expected:
    /// 0. `[signer, writable]` The administrator
    /// 1. `[writable]` The registry account
    Withdraw,

    /// Return data: `Option<Pubkey>`
    /// Accounts expected:
    /// 0. `[]` The registry account
    GetOwner {
        name: String,
    },

    /// Return data: `Option<String>`
    /// Accounts expected:
    /// 0. `[]` The registry account
    GetRecord {
        name: String,
    },

    /// Return data: `u64` price in lamports
    /// Accounts expected:
    /// 0. `[]` The registry account
    GetPrice {
        name: String,
    },
}

impl RegistryInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }
}

pub fn initialize(
    program_id: &Pubkey,
    admin: &Pubkey,
    registry: &Pubkey,
    config: RegistryConfig,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &RegistryInstruction::Initialize { config },
        vec![
            AccountMeta::new_readonly(*admin, true),
            AccountMeta::new(*registry, false),
        ],
    )
}

pub fn register(
    program_id: &Pubkey,
    registrant: &Pubkey,
    registry: &Pubkey,
    name: &str,
    payment: u64,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &RegistryInstruction::Register {
            name: name.to_string(),
            payment,
        },
        vec![
            AccountMeta::new(*registrant, true),
            AccountMeta::new(*registry, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

pub fn set_record(
    program_id: &Pubkey,
    owner: &Pubkey,
    registry: &Pubkey,
    name: &str,
    record: &str,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &RegistryInstruction::SetRecord {
            name: name.to_string(),
            record: record.to_string(),
        },
        vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(*registry, false),
        ],
    )
}

pub fn withdraw(program_id: &Pubkey, admin: &Pubkey, registry: &Pubkey) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &RegistryInstruction::Withdraw,
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(*registry, false),
        ],
    )
}

pub fn query(program_id: &Pubkey, registry: &Pubkey, query: RegistryInstruction) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &query,
        vec![AccountMeta::new_readonly(*registry, false)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_register() {
        let ix = RegistryInstruction::Register {
            name: "abc".to_string(),
            payment: 500,
        };
        let data = ix.try_to_vec().unwrap();
        assert_eq!(RegistryInstruction::unpack(&data).unwrap(), ix);
    }

    #[test]
    fn unpack_rejects_garbage() {
        assert_eq!(
            RegistryInstruction::unpack(&[42]),
            Err(ProgramError::InvalidInstructionData)
        );
        assert_eq!(
            RegistryInstruction::unpack(&[]),
            Err(ProgramError::InvalidInstructionData)
        );
    }

    #[test]
    fn register_builder_marks_registrant_signer() {
        let program_id = Pubkey::new_unique();
        let registrant = Pubkey::new_unique();
        let registry = Pubkey::new_unique();
        let ix = register(&program_id, &registrant, &registry, "abc", 1);
        assert_eq!(ix.program_id, program_id);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, system_program::id());
    }
}
