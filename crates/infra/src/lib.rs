//! Infrastructure layer: configuration, the stock ledger port and its
//! adapters, and the action dispatcher that routes parsed intents.

pub mod action_dispatcher;
pub mod config;
pub mod ledger;

pub use action_dispatcher::{ActionDispatcher, DispatchError};
pub use config::{ConfigError, ControlPlaneConfig, InventoryServiceConfig, OracleSettings};
pub use ledger::{HttpStockLedger, LedgerError, StockLedger};
