//! Product Repository

use super::RepoResult;
use shared::models::{PRODUCT_STATUS_ACTIVE, VariantForSale};
use sqlx::SqliteExecutor;

/// Resolve a variant together with its owning product: one read capturing
/// everything checkout needs: current price, seller, stock.
pub async fn find_variant_for_sale(
    exec: impl SqliteExecutor<'_>,
    variant_id: i64,
) -> RepoResult<Option<VariantForSale>> {
    let row = sqlx::query_as::<_, VariantForSale>(
        "SELECT v.id AS variant_id, v.product_id, p.seller_id, p.name AS product_name, p.base_price, v.stock_quantity, v.size, v.color \
         FROM product_variant v JOIN product p ON v.product_id = p.id \
         WHERE v.id = ?",
    )
    .bind(variant_id)
    .fetch_optional(exec)
    .await?;
    Ok(row)
}

/// 卖家在售商品数（seller stats 用）
pub async fn count_active_by_seller(
    exec: impl SqliteExecutor<'_>,
    seller_id: i64,
) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE seller_id = ? AND status = ?")
            .bind(seller_id)
            .bind(PRODUCT_STATUS_ACTIVE)
            .fetch_one(exec)
            .await?;
    Ok(count)
}
