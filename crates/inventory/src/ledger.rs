//! The authoritative stock quantities, held in memory.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use stockline_core::{ChangeRequest, Item, StockError, StockResult, StockSnapshot};

use crate::seed::StockSeed;

/// In-memory stock ledger.
///
/// Owned explicitly and shared by reference (typically `Arc<InMemoryStockLedger>`).
/// `apply` performs its read-modify-write under a single write guard, so
/// concurrent writers cannot lose updates or drive a quantity negative.
#[derive(Debug)]
pub struct InMemoryStockLedger {
    inner: RwLock<BTreeMap<Item, i64>>,
}

impl InMemoryStockLedger {
    pub fn new(seed: StockSeed) -> Self {
        Self {
            inner: RwLock::new(seed.into_quantities()),
        }
    }

    /// Current quantities of every item. Never mutates.
    pub fn get(&self) -> StockSnapshot {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.iter().map(|(item, qty)| (*item, *qty)).collect()
    }

    /// Adjust `item` by a signed `change`, returning the updated snapshot.
    ///
    /// State is left untouched on every error path.
    pub fn apply(&self, item: &str, change: i64) -> StockResult<StockSnapshot> {
        let item = Item::parse(item)?;

        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let current = map.get(&item).copied().unwrap_or(0);

        let updated = current
            .checked_add(change)
            .ok_or(StockError::QuantityOverflow {
                item,
                available: current,
                change,
            })?;
        if updated < 0 {
            return Err(StockError::InsufficientStock {
                item,
                available: current,
            });
        }

        map.insert(item, updated);
        tracing::debug!(item = %item, change, quantity = updated, "stock adjusted");

        Ok(map.iter().map(|(item, qty)| (*item, *qty)).collect())
    }

    pub fn apply_request(&self, request: &ChangeRequest) -> StockResult<StockSnapshot> {
        self.apply(&request.item, request.change)
    }
}

impl Default for InMemoryStockLedger {
    fn default() -> Self {
        Self::new(StockSeed::default())
    }
}
