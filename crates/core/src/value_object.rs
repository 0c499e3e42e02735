//! Value objects exchanged between the ledger, the dispatcher and HTTP callers.
//!
//! Value objects have **no identity**: two values with the same fields are equal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::item::Item;

/// A requested signed adjustment of one item's quantity.
///
/// `item` is kept as the caller wrote it; the ledger validates it against the
/// closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChangeRequest {
    pub item: String,
    pub change: i64,
}

impl ChangeRequest {
    pub fn new(item: impl Into<String>, change: i64) -> Self {
        Self {
            item: item.into(),
            change,
        }
    }
}

/// Point-in-time view of every stocked item.
///
/// Serializes as a flat JSON object (`{"pants": 15, "tshirts": 20}`). Keys are
/// strings so that snapshots received over HTTP deserialize without loss.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct StockSnapshot(BTreeMap<String, i64>);

impl StockSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, item: Item) -> Option<i64> {
        self.0.get(item.as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(Item, i64)> for StockSnapshot {
    fn from_iter<T: IntoIterator<Item = (Item, i64)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(item, qty)| (item.as_str().to_string(), qty))
                .collect(),
        )
    }
}
