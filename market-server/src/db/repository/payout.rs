//! Payout Repository
//!
//! 只追加：每个 (order, seller) 组合最多一行，由 settlement 在
//! paid 转换边上创建。

use super::RepoResult;
use shared::models::Payout;
use sqlx::SqliteExecutor;

pub async fn insert(exec: impl SqliteExecutor<'_>, payout: &Payout) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO payout (id, order_id, seller_id, amount, status, arrival_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(payout.id)
    .bind(payout.order_id)
    .bind(payout.seller_id)
    .bind(payout.amount)
    .bind(&payout.status)
    .bind(payout.arrival_at)
    .execute(exec)
    .await?;
    Ok(())
}

/// Defensive duplicate-invocation guard: payouts already recorded for this order?
pub async fn exists_for_order(exec: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payout WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(exec)
        .await?;
    Ok(count > 0)
}

pub async fn list_by_order(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<Payout>> {
    let payouts = sqlx::query_as::<_, Payout>(
        "SELECT id, order_id, seller_id, amount, status, arrival_at \
         FROM payout WHERE order_id = ? ORDER BY seller_id",
    )
    .bind(order_id)
    .fetch_all(exec)
    .await?;
    Ok(payouts)
}

pub async fn list_by_seller(
    exec: impl SqliteExecutor<'_>,
    seller_id: i64,
) -> RepoResult<Vec<Payout>> {
    let payouts = sqlx::query_as::<_, Payout>(
        "SELECT id, order_id, seller_id, amount, status, arrival_at \
         FROM payout WHERE seller_id = ? ORDER BY arrival_at DESC",
    )
    .bind(seller_id)
    .fetch_all(exec)
    .await?;
    Ok(payouts)
}
