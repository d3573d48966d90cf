use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::native_token::LAMPORTS_PER_SOL;

use crate::error::RegistryError;

pub const THREE_CHAR_PRICE: u64 = LAMPORTS_PER_SOL / 2;
pub const FOUR_CHAR_PRICE: u64 = LAMPORTS_PER_SOL * 3 / 10;
pub const DEFAULT_PRICE: u64 = LAMPORTS_PER_SOL / 10;
pub const MAX_PRICE_TIERS: usize = 8;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTier {
    pub length: u8,
    pub price: u64,
}

/// Step function from name length to price in lamports.
///
/// Tiers are kept sorted by length. A length between two tiers pays the
/// nearest shorter tier, a length past the last tier pays `default_price`,
/// and anything below the first tier cannot be registered at all.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    tiers: Vec<PriceTier>,
    default_price: u64,
}

impl PriceTable {
    pub fn new(mut tiers: Vec<PriceTier>, default_price: u64) -> Result<Self, RegistryError> {
        if tiers.is_empty() || tiers.iter().any(|t| t.length == 0) {
            return Err(RegistryError::InvalidPriceTable);
        }
        tiers.sort_by_key(|t| t.length);
        let table = Self { tiers, default_price };
        table.check()?;
        Ok(table)
    }

    /// Re-checks the invariants `new` establishes. Used on tables that
    /// arrive over the wire, where the constructor was bypassed.
    pub fn check(&self) -> Result<(), RegistryError> {
        if self.tiers.is_empty() || self.tiers.len() > MAX_PRICE_TIERS {
            return Err(RegistryError::InvalidPriceTable);
        }
        for pair in self.tiers.windows(2) {
            if pair[0].length >= pair[1].length || pair[0].price < pair[1].price {
                return Err(RegistryError::InvalidPriceTable);
            }
        }
        let last = &self.tiers[self.tiers.len() - 1];
        if self.tiers[0].length == 0 || self.default_price > last.price {
            return Err(RegistryError::InvalidPriceTable);
        }
        Ok(())
    }

    pub fn min_length(&self) -> usize {
        self.tiers.first().map_or(usize::MAX, |t| usize::from(t.length))
    }

    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    pub fn default_price(&self) -> u64 {
        self.default_price
    }

    pub fn price_for(&self, length: usize) -> Result<u64, RegistryError> {
        if length < self.min_length() {
            return Err(RegistryError::NameTooShort);
        }
        let last = &self.tiers[self.tiers.len() - 1];
        if length > usize::from(last.length) {
            return Ok(self.default_price);
        }
        let price = self
            .tiers
            .iter()
            .rev()
            .find(|t| usize::from(t.length) <= length)
            .map_or(self.default_price, |t| t.price);
        Ok(price)
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                PriceTier { length: 3, price: THREE_CHAR_PRICE },
                PriceTier { length: 4, price: FOUR_CHAR_PRICE },
            ],
            default_price: DEFAULT_PRICE,
        }
    }
}
