//! User Model

use serde::{Deserialize, Serialize};

/// User entity (买家和卖家共用同一张表)
///
/// `balance` is the stored-value wallet: debited when a buyer pays with
/// `WALLET`, credited when a seller receives a payout. No other code path
/// writes this field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    /// Set once the user lists products for sale
    pub shop_name: Option<String>,
    /// Wallet balance in currency units
    pub balance: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Seller dashboard statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerStats {
    /// Sum of COMPLETED payout amounts
    pub total_revenue: f64,
    /// Number of ACTIVE product listings
    pub active_listings: i64,
    /// Number of payout events (one per order containing this seller's items)
    pub total_sales: i64,
}
