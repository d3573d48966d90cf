#![allow(unexpected_cfgs)]

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub mod error;
pub mod events;
pub mod instruction;
pub mod pricing;
pub mod processor;
pub mod registry;
#[cfg(not(target_os = "solana"))]
pub mod shared;
pub mod state;
pub mod treasury;
pub mod validation;

use instruction::RegistryInstruction;
use processor::Processor;

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = RegistryInstruction::unpack(instruction_data)?;
    Processor::process(program_id, accounts, instruction)
}
