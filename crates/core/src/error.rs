//! Stock error model.

use thiserror::Error;

use crate::item::Item;

/// Result type used by stock operations.
pub type StockResult<T> = Result<T, StockError>;

/// Deterministic business failures of the stock ledger.
///
/// Every variant is a client error: the request was understood but rejected.
/// Display strings are client-facing and end up in HTTP `detail` fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    /// The item is not part of the closed vocabulary.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Applying the change would drive the quantity below zero.
    #[error("Insufficient stock: only {available} {item} left")]
    InsufficientStock { item: Item, available: i64 },

    /// Applying the change would overflow the stored quantity.
    #[error("Quantity overflow: cannot add {change} to {available} {item}")]
    QuantityOverflow {
        item: Item,
        available: i64,
        change: i64,
    },
}

impl StockError {
    pub fn invalid_item(item: impl Into<String>) -> Self {
        Self::InvalidItem(item.into())
    }

    /// Stable machine-readable code (used as the `error` field of HTTP bodies).
    pub fn code(&self) -> &'static str {
        match self {
            StockError::InvalidItem(_) => "invalid_item",
            StockError::InsufficientStock { .. } => "insufficient_stock",
            StockError::QuantityOverflow { .. } => "quantity_overflow",
        }
    }
}
