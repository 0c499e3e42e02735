//! Stock ledger: the in-memory source of truth for item quantities.
//!
//! This crate contains business rules for stock (non-negativity, closed
//! vocabulary) over an owned, lock-guarded map. No HTTP lives here.

pub mod ledger;
pub mod seed;

pub use ledger::InMemoryStockLedger;
pub use seed::{SeedError, StockSeed};
