//! Repository Module
//!
//! CRUD and query helpers over the SQLite tables. Functions take
//! `impl SqliteExecutor<'_>` so they run equally against the pool or
//! inside an open transaction (`&mut *tx`).

// Accounts
pub mod address;
pub mod user;

// Catalog
pub mod inventory;
pub mod product;

// Orders
pub mod order;

// Settlement
pub mod payment;
pub mod payout;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
