//! Product Model
//!
//! Catalog CRUD lives upstream; checkout only needs the read-side view of a
//! variant joined with its owning product.

use serde::{Deserialize, Serialize};

/// Product listing status stored as TEXT
pub const PRODUCT_STATUS_ACTIVE: &str = "ACTIVE";

/// Variant joined with its owning product: the view checkout needs to
/// capture price and seller in one read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VariantForSale {
    pub variant_id: i64,
    pub product_id: i64,
    pub seller_id: i64,
    pub product_name: String,
    pub base_price: f64,
    pub stock_quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}
