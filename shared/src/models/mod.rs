//! Data models
//!
//! Shared between harvest-server and clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); timestamps are epoch
//! milliseconds; money is integer cents.

pub mod farm;
pub mod order;
pub mod product;
pub mod user;

// Re-exports
pub use farm::*;
pub use order::*;
pub use product::*;
pub use user::*;
