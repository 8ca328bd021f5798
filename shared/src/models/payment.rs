//! Payment and Payout Models
//!
//! 两张只追加的审计表：payment 与 order 一对一，payout 按卖家拆分、
//! 与 order 一对多。创建后不再修改。

use serde::{Deserialize, Serialize};

/// Payment status values (set at creation, never revised)
pub const PAYMENT_STATUS_SUCCESS: &str = "SUCCESS";

/// Payout status values
pub const PAYOUT_STATUS_COMPLETED: &str = "COMPLETED";

/// Payment record: exactly one per successfully paid order
/// (UNIQUE index on `order_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub amount: f64,
    pub method: String,
    pub status: String,
    pub paid_at: i64,
}

/// Payout record: one seller's credited share of one order's total
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payout {
    pub id: i64,
    pub order_id: i64,
    pub seller_id: i64,
    pub amount: f64,
    pub status: String,
    pub arrival_at: i64,
}
