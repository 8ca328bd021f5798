//! Shared types for the marketplace backend
//!
//! Domain models and DTOs used by the server crate and its tests.
//! DB row types are feature-gated behind `db` (sqlx derives).

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
