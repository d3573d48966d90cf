//! Thread-safe handle for hosting a [`Registry`] off-chain.
//!
//! On-chain the runtime write-locks the registry account for each
//! transaction. Hosts without that guarantee go through this handle, which
//! admits one writer at a time and lets readers share a consistent view.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use solana_program::pubkey::Pubkey;

use crate::{
    error::RegistryError,
    events::{RecordUpdated, Registered, Withdrawn},
    registry::{Registration, Registry},
    treasury::FundTransfer,
};

#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    // Every mutation either applies fully or returns before touching state,
    // so a poisoned lock still guards a consistent registry.
    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(
        &self,
        caller: Pubkey,
        name: &str,
        payment: u64,
    ) -> Result<Registered, RegistryError> {
        self.write().register(caller, name, payment)
    }

    pub fn set_record(
        &self,
        caller: &Pubkey,
        name: &str,
        record: &str,
    ) -> Result<RecordUpdated, RegistryError> {
        self.write().set_record(caller, name, record)
    }

    pub fn withdraw<T: FundTransfer>(
        &self,
        caller: &Pubkey,
        transfer: &mut T,
    ) -> Result<Withdrawn, RegistryError> {
        self.write().withdraw(caller, transfer)
    }

    pub fn get_owner(&self, name: &str) -> Option<Pubkey> {
        self.read().get_owner(name).copied()
    }

    pub fn get_record(&self, name: &str) -> Option<String> {
        self.read().get_record(name).map(str::to_string)
    }

    pub fn price_of(&self, name: &str) -> Result<u64, RegistryError> {
        self.read().price_of(name)
    }

    pub fn balance(&self) -> u64 {
        self.read().treasury().balance()
    }

    /// Owned copy of every registration, in registration order.
    pub fn list_all(&self) -> Vec<Registration> {
        self.read().list_all().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::registry::RegistryConfig;

    const PRICE: u64 = 500_000_000;

    struct Sink(u64);

    impl FundTransfer for Sink {
        fn transfer(&mut self, _to: &Pubkey, amount: u64) -> Result<(), RegistryError> {
            self.0 += amount;
            Ok(())
        }
    }

    fn shared(admin: Pubkey) -> SharedRegistry {
        SharedRegistry::new(Registry::new(admin, RegistryConfig::default()).unwrap())
    }

    #[test]
    fn racing_registrations_admit_one_winner() {
        let registry = shared(Pubkey::new_unique());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    let caller = Pubkey::new_unique();
                    registry.register(caller, "abc", PRICE).map(|_| caller)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners: Vec<Pubkey> = results.iter().filter_map(|r| r.ok()).collect();
        assert_eq!(winners.len(), 1);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| *r == Err(RegistryError::NameTaken)));
        assert_eq!(registry.get_owner("abc"), Some(winners[0]));
        assert_eq!(registry.balance(), PRICE);
        assert_eq!(registry.list_all().len(), 1);
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let admin = Pubkey::new_unique();
        let registry = shared(admin);
        let alice = Pubkey::new_unique();
        registry.register(alice, "abc", PRICE).unwrap();

        let snapshot = registry.list_all();
        registry.set_record(&alice, "abc", "ninja").unwrap();
        registry.register(Pubkey::new_unique(), "later", PRICE).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].record, "");
        assert_eq!(registry.get_record("abc").as_deref(), Some("ninja"));

        let mut sink = Sink(0);
        assert_eq!(
            registry.withdraw(&alice, &mut sink),
            Err(RegistryError::Unauthorized)
        );
        let withdrawn = registry.withdraw(&admin, &mut sink).unwrap();
        assert_eq!(withdrawn.amount, PRICE + 100_000_000);
        assert_eq!(sink.0, withdrawn.amount);
        assert_eq!(registry.balance(), 0);
    }
}
