pub mod inventory;
pub mod query;
pub mod system;
