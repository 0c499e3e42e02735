//! Initial quantities loaded at process start.

use std::collections::BTreeMap;

use thiserror::Error;

use stockline_core::Item;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("malformed seed entry `{0}` (expected item=quantity)")]
    Malformed(String),

    #[error("unknown item in seed: {0}")]
    UnknownItem(String),

    #[error("seed quantity for {item} must be a non-negative integer, got `{raw}`")]
    InvalidQuantity { item: Item, raw: String },

    #[error("item {0} appears more than once in seed")]
    Duplicate(Item),
}

/// Seed quantities for every item in the vocabulary.
///
/// Items not mentioned when parsing start at zero, so the ledger always holds
/// exactly one entry per vocabulary item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSeed {
    quantities: BTreeMap<Item, i64>,
}

impl StockSeed {
    /// Parse `tshirts=20,pants=15` (whitespace tolerated, items case-insensitive).
    pub fn parse(raw: &str) -> Result<Self, SeedError> {
        let mut quantities: BTreeMap<Item, i64> = Item::ALL.into_iter().map(|i| (i, 0)).collect();
        let mut seen: Vec<Item> = Vec::new();

        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, qty) = entry
                .split_once('=')
                .ok_or_else(|| SeedError::Malformed(entry.to_string()))?;

            let item = Item::parse(name).map_err(|_| SeedError::UnknownItem(name.trim().to_string()))?;
            if seen.contains(&item) {
                return Err(SeedError::Duplicate(item));
            }
            seen.push(item);

            let qty = qty.trim();
            let value: i64 = qty
                .parse()
                .ok()
                .filter(|v| *v >= 0)
                .ok_or_else(|| SeedError::InvalidQuantity {
                    item,
                    raw: qty.to_string(),
                })?;
            quantities.insert(item, value);
        }

        Ok(Self { quantities })
    }

    pub fn quantity(&self, item: Item) -> i64 {
        self.quantities.get(&item).copied().unwrap_or(0)
    }

    pub(crate) fn into_quantities(self) -> BTreeMap<Item, i64> {
        self.quantities
    }
}

impl Default for StockSeed {
    /// `tshirts=20, pants=15`.
    fn default() -> Self {
        Self {
            quantities: BTreeMap::from([(Item::Tshirts, 20), (Item::Pants, 15)]),
        }
    }
}
