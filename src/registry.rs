use std::{
    io::{self, Read, Write},
    slice,
};

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::{
    error::RegistryError,
    events::{RecordUpdated, Registered, Withdrawn},
    pricing::PriceTable,
    treasury::{FundTransfer, Treasury},
    validation::{validate_name, validate_owner, validate_record, validate_suffix},
};

pub const DEFAULT_SUFFIX: &str = "ninja";

/// Upper bound on registrations held by one registry.
///
/// Each instruction decodes the whole list onto the 32 KiB program heap; at
/// this count, with every name and record at its maximum length, a load plus
/// a store stays well inside it.
pub const MAX_REGISTRATIONS: usize = 40;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Top-level suffix appended for display only.
    pub suffix: String,
    pub price_table: PriceTable,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            price_table: PriceTable::default(),
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub owner: Pubkey,
    pub record: String,
    /// Position in registration order.
    pub index: u64,
}

/// Registrations in insertion order.
///
/// Lookups scan the entries; the list never exceeds `MAX_REGISTRATIONS`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct NameBook {
    entries: Vec<Registration>,
}

impl NameBook {
    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|r| r.name == name)
    }

    fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn get(&self, name: &str) -> Option<&Registration> {
        self.entries.iter().find(|r| r.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Registration> {
        self.entries.iter_mut().find(|r| r.name == name)
    }

    fn insert(&mut self, name: &str, owner: Pubkey) -> u64 {
        let index = self.entries.len() as u64;
        // Grow by exactly one slot; the on-chain heap never frees.
        self.entries.reserve_exact(1);
        self.entries.push(Registration {
            name: name.to_string(),
            owner,
            record: String::new(),
            index,
        });
        index
    }
}

impl BorshSerialize for NameBook {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.entries.serialize(writer)
    }
}

impl BorshDeserialize for NameBook {
    fn deserialize_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let entries = Vec::<Registration>::deserialize_reader(reader)?;
        if entries.len() > MAX_REGISTRATIONS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "too many registrations",
            ));
        }
        if entries
            .iter()
            .enumerate()
            .any(|(position, entry)| entry.index != position as u64)
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "registration index out of order",
            ));
        }

        let mut by_name: Vec<&str> = entries.iter().map(|r| r.name.as_str()).collect();
        by_name.sort_unstable();
        if by_name.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "duplicate registration",
            ));
        }

        Ok(Self { entries })
    }
}

/// Restartable view over all registrations in registration order.
///
/// Borrowing the registry freezes it, so a listing always reflects the state
/// at the time it was taken. Clone it to iterate again from the start.
#[derive(Debug, Clone)]
pub struct Listing<'a> {
    inner: slice::Iter<'a, Registration>,
}

impl<'a> Iterator for Listing<'a> {
    type Item = &'a Registration;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Listing<'_> {}

/// The registry state machine: names, records, and the treasury.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    config: RegistryConfig,
    treasury: Treasury,
    names: NameBook,
}

impl Registry {
    pub fn new(admin: Pubkey, config: RegistryConfig) -> Result<Self, RegistryError> {
        validate_suffix(&config.suffix)?;
        config.price_table.check()?;
        Ok(Self {
            config,
            treasury: Treasury::new(admin),
            names: NameBook::default(),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    pub fn admin(&self) -> &Pubkey {
        self.treasury.admin()
    }

    pub fn len(&self) -> usize {
        self.names.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.entries.is_empty()
    }

    pub fn display_name(&self, name: &str) -> String {
        format!("{}.{}", name, self.config.suffix)
    }

    pub fn price_of(&self, name: &str) -> Result<u64, RegistryError> {
        validate_name(name)?;
        self.config.price_table.price_for(name.len())
    }

    /// Claims `name` for `caller`.
    ///
    /// Only the tier price is retained; whatever `payment` offers beyond it is
    /// reported back as `refund` and never enters the treasury.
    pub fn register(
        &mut self,
        caller: Pubkey,
        name: &str,
        payment: u64,
    ) -> Result<Registered, RegistryError> {
        validate_name(name)?;
        if self.names.contains(name) {
            return Err(RegistryError::NameTaken);
        }
        if self.names.entries.len() >= MAX_REGISTRATIONS {
            return Err(RegistryError::RegistryFull);
        }
        let price = self.config.price_table.price_for(name.len())?;
        if payment < price {
            return Err(RegistryError::InsufficientPayment);
        }

        self.treasury.credit(price)?;
        let index = self.names.insert(name, caller);

        Ok(Registered {
            name: name.to_string(),
            owner: caller,
            price,
            refund: payment - price,
            index,
        })
    }

    pub fn set_record(
        &mut self,
        caller: &Pubkey,
        name: &str,
        record: &str,
    ) -> Result<RecordUpdated, RegistryError> {
        let registration = self
            .names
            .get_mut(name)
            .ok_or(RegistryError::NameNotFound)?;
        validate_owner(&registration.owner, caller)?;
        validate_record(record)?;

        registration.record = record.to_string();

        Ok(RecordUpdated {
            name: name.to_string(),
            record: record.to_string(),
        })
    }

    pub fn withdraw<T: FundTransfer>(
        &mut self,
        caller: &Pubkey,
        transfer: &mut T,
    ) -> Result<Withdrawn, RegistryError> {
        let amount = self.treasury.withdraw(caller, transfer)?;
        Ok(Withdrawn {
            admin: *self.treasury.admin(),
            amount,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.names.get(name)
    }

    pub fn get_record(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(|r| r.record.as_str())
    }

    pub fn get_owner(&self, name: &str) -> Option<&Pubkey> {
        self.names.get(name).map(|r| &r.owner)
    }

    pub fn list_all(&self) -> Listing<'_> {
        Listing {
            inner: self.names.entries.iter(),
        }
    }
}
