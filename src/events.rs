use std::fmt;

use solana_program::{msg, pubkey::Pubkey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub name: String,
    pub owner: Pubkey,
    pub price: u64,
    /// Portion of the offered payment that was not retained.
    pub refund: u64,
    pub index: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdated {
    pub name: String,
    pub record: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawn {
    pub admin: Pubkey,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Registered(Registered),
    RecordUpdated(RecordUpdated),
    Withdrawn(Withdrawn),
}

impl RegistryEvent {
    /// Writes the event to the program log.
    pub fn emit(&self) {
        msg!("{}", self);
    }
}

impl fmt::Display for Registered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "registered: name={} owner={} price={} refund={} index={}",
            self.name, self.owner, self.price, self.refund, self.index
        )
    }
}

impl fmt::Display for RecordUpdated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record-updated: name={} record={:?}", self.name, self.record)
    }
}

impl fmt::Display for Withdrawn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "withdrawn: admin={} amount={}", self.admin, self.amount)
    }
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEvent::Registered(e) => e.fmt(f),
            RegistryEvent::RecordUpdated(e) => e.fmt(f),
            RegistryEvent::Withdrawn(e) => e.fmt(f),
        }
    }
}

impl From<Registered> for RegistryEvent {
    fn from(e: Registered) -> Self {
        RegistryEvent::Registered(e)
    }
}

impl From<RecordUpdated> for RegistryEvent {
    fn from(e: RecordUpdated) -> Self {
        RegistryEvent::RecordUpdated(e)
    }
}

impl From<Withdrawn> for RegistryEvent {
    fn from(e: Withdrawn) -> Self {
        RegistryEvent::Withdrawn(e)
    }
}
