//! Data models
//!
//! Shared between pos-server and its clients (via API).
//! All IDs are snowflake `i64`; timestamps are UTC milliseconds.

pub mod bill;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod role;
pub mod user;

// Re-exports
pub use bill::*;
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use role::*;
pub use user::*;
