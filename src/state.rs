use std::io::{self, Write};

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    program_error::ProgramError,
    program_pack::{IsInitialized, Sealed},
};

use crate::{
    error::RegistryError,
    pricing::MAX_PRICE_TIERS,
    registry::{Registry, RegistryConfig, MAX_REGISTRATIONS},
    treasury::Treasury,
    validation::{MAX_NAME_LENGTH, MAX_RECORD_LENGTH, MAX_SUFFIX_LENGTH},
};

// flag + config (suffix, tiers, default price) + treasury (admin, three counters)
const HEADER_MAX_LEN: usize =
    1 + (4 + MAX_SUFFIX_LENGTH) + (4 + MAX_PRICE_TIERS * 9 + 8) + (32 + 3 * 8);
// name + owner + record + index
const REGISTRATION_MAX_LEN: usize = (4 + MAX_NAME_LENGTH) + 32 + (4 + MAX_RECORD_LENGTH) + 8;

/// Layout of the program-owned registry account.
///
/// The Borsh encoding is written at the start of the account data; whatever
/// follows it is slack left for future registrations.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegistryAccount {
    pub is_initialized: bool,
    pub registry: Registry,
}

/// Leading fields of a [`RegistryAccount`], up to and excluding the name list.
///
/// Fixed in size once initialized, so it can be rewritten in place without
/// touching the registrations that follow it.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegistryHeader {
    pub is_initialized: bool,
    pub config: RegistryConfig,
    pub treasury: Treasury,
}

impl Sealed for RegistryAccount {}

impl IsInitialized for RegistryAccount {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl IsInitialized for RegistryHeader {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

/// Measures an encoding without buffering it.
#[derive(Default)]
struct ByteCounter(usize);

impl Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn encoded_len<T: BorshSerialize>(value: &T) -> Result<usize, ProgramError> {
    let mut counter = ByteCounter::default();
    value
        .serialize(&mut counter)
        .map_err(|_| ProgramError::InvalidAccountData)?;
    Ok(counter.0)
}

/// Serializes straight into `dst`, leaving it untouched if it is too small.
fn write_into<T: BorshSerialize>(value: &T, dst: &mut [u8]) -> Result<usize, ProgramError> {
    let len = encoded_len(value)?;
    if len > dst.len() {
        return Err(ProgramError::AccountDataTooSmall);
    }
    let mut cursor = &mut dst[..len];
    value
        .serialize(&mut cursor)
        .map_err(|_| ProgramError::InvalidAccountData)?;
    Ok(len)
}

impl RegistryAccount {
    /// Account size that holds a full registry with every name and record
    /// at its maximum length.
    pub const MAX_LEN: usize =
        HEADER_MAX_LEN + 4 + MAX_REGISTRATIONS * REGISTRATION_MAX_LEN;

    pub fn new(registry: Registry) -> Self {
        Self {
            is_initialized: true,
            registry,
        }
    }

    /// True when the account has never been initialized. A zeroed account
    /// starts with a `false` flag.
    pub fn is_blank(src: &[u8]) -> bool {
        src.first().map_or(true, |&flag| flag == 0)
    }

    pub fn unpack(src: &[u8]) -> Result<Self, ProgramError> {
        if Self::is_blank(src) {
            return Err(RegistryError::NotInitialized.into());
        }
        Self::deserialize(&mut &src[..]).map_err(|_| ProgramError::InvalidAccountData)
    }

    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        write_into(self, dst).map(|_| ())
    }
}

impl RegistryHeader {
    pub fn unpack(src: &[u8]) -> Result<Self, ProgramError> {
        if RegistryAccount::is_blank(src) {
            return Err(RegistryError::NotInitialized.into());
        }
        Self::deserialize(&mut &src[..]).map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Rewrites the header in front of the existing name list.
    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        let current = Self::unpack(dst)?;
        if encoded_len(&current)? != encoded_len(self)? {
            return Err(ProgramError::InvalidAccountData);
        }
        write_into(self, dst).map(|_| ())
    }
}
