//! The closed item vocabulary.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::StockError;

/// An item tracked by the stock ledger.
///
/// The set is closed: there is no way to construct an `Item` for anything
/// outside it. Parsing is case-insensitive and ignores surrounding whitespace;
/// the canonical form is lower-case.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    Tshirts,
    Pants,
}

impl Item {
    /// Every item, in seed order.
    pub const ALL: [Item; 2] = [Item::Tshirts, Item::Pants];

    pub fn as_str(&self) -> &'static str {
        match self {
            Item::Tshirts => "tshirts",
            Item::Pants => "pants",
        }
    }

    /// Parse an item name, mapping a miss to [`StockError::InvalidItem`].
    pub fn parse(raw: &str) -> Result<Self, StockError> {
        raw.parse()
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Item {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Item::ALL
            .into_iter()
            .find(|item| item.as_str() == normalized)
            .ok_or_else(|| StockError::invalid_item(s))
    }
}
