//! `stockline-core`: shared stock vocabulary and value types.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP).

pub mod error;
pub mod item;
pub mod value_object;

pub use error::{StockError, StockResult};
pub use item::Item;
pub use value_object::{ChangeRequest, StockSnapshot};
