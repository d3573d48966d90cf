use solana_program::pubkey::Pubkey;

use crate::error::RegistryError;

pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_RECORD_LENGTH: usize = 256;
pub const MAX_SUFFIX_LENGTH: usize = 16;

/// Names are ASCII letters and digits, compared case-sensitively as stored.
/// The display suffix is never part of the name.
pub fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() {
        return Err(RegistryError::InvalidName);
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(RegistryError::InvalidName);
    }
    if !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(RegistryError::InvalidName);
    }
    Ok(())
}

/// The suffix follows the name alphabet.
pub fn validate_suffix(suffix: &str) -> Result<(), RegistryError> {
    if suffix.len() > MAX_SUFFIX_LENGTH {
        return Err(RegistryError::InvalidName);
    }
    validate_name(suffix)
}

pub fn validate_record(record: &str) -> Result<(), RegistryError> {
    if record.len() > MAX_RECORD_LENGTH {
        return Err(RegistryError::RecordTooLong);
    }
    Ok(())
}

pub fn validate_owner(owner: &Pubkey, signer: &Pubkey) -> Result<(), RegistryError> {
    if owner != signer {
        return Err(RegistryError::Unauthorized);
    }
    Ok(())
}
