//! Address Model

use serde::{Deserialize, Serialize};

/// Saved shipping address (address book entry)
///
/// Orders never reference this row directly: checkout copies the fields
/// into an immutable shipping snapshot, so later edits here do not rewrite
/// order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub phone: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    pub country: Option<String>,
    /// Auto-selected in checkout when the request names no address
    pub is_default: bool,
    pub created_at: i64,
}
