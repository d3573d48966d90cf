use solana_program::program_error::ProgramError;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid name format")]
    InvalidName,

    #[error("Name shorter than the cheapest priced tier")]
    NameTooShort,

    #[error("Name already taken")]
    NameTaken,

    #[error("Name not found")]
    NameNotFound,

    #[error("Caller is not authorized")]
    Unauthorized,

    #[error("Insufficient payment")]
    InsufficientPayment,

    #[error("Fund transfer failed")]
    TransferFailed,

    #[error("Registry not initialized")]
    NotInitialized,

    #[error("Registry already initialized")]
    AlreadyInitialized,

    #[error("Invalid price table")]
    InvalidPriceTable,

    #[error("Record too long")]
    RecordTooLong,

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Registry is full")]
    RegistryFull,
}

impl From<RegistryError> for ProgramError {
    fn from(e: RegistryError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
