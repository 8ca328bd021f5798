//! Inventory Ledger
//!
//! Stock reservation for checkout. The reserve is an optimistic,
//! non-reversible decrement: stock leaves the counter at order creation and
//! only a rollback of the enclosing transaction puts it back.

use super::RepoResult;
use sqlx::SqliteExecutor;

/// Atomically reserve `quantity` units of a variant.
///
/// The availability check and the decrement are one conditional UPDATE, so
/// two concurrent reservations of the last unit cannot both succeed: the
/// second sees `rows_affected == 0` and the caller maps that to an
/// insufficient-stock failure.
pub async fn reserve(
    exec: impl SqliteExecutor<'_>,
    variant_id: i64,
    quantity: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE product_variant SET stock_quantity = stock_quantity - ?1 \
         WHERE id = ?2 AND stock_quantity >= ?1",
    )
    .bind(quantity)
    .bind(variant_id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Current stock count for a variant
pub async fn stock_of(exec: impl SqliteExecutor<'_>, variant_id: i64) -> RepoResult<Option<i64>> {
    let stock: Option<i64> =
        sqlx::query_scalar("SELECT stock_quantity FROM product_variant WHERE id = ?")
            .bind(variant_id)
            .fetch_optional(exec)
            .await?;
    Ok(stock)
}
