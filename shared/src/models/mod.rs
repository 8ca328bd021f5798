//! Data models
//!
//! Shared between market-server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod address;
pub mod order;
pub mod payment;
pub mod product;
pub mod user;

// Re-exports
pub use address::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use user::*;
