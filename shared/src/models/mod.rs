//! Data models
//!
//! Shared between order-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod menu;
pub mod site;

// Re-exports
pub use menu::*;
pub use site::*;
