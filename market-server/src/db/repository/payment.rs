//! Payment Repository
//!
//! 只追加：payment 行创建后不再修改。order_id 上的 UNIQUE 索引
//! 是幂等检查之外的最后一道防线。

use super::RepoResult;
use shared::models::Payment;
use sqlx::SqliteExecutor;

pub async fn insert(exec: impl SqliteExecutor<'_>, payment: &Payment) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO payment (id, order_id, amount, method, status, paid_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(payment.id)
    .bind(payment.order_id)
    .bind(payment.amount)
    .bind(&payment.method)
    .bind(&payment.status)
    .bind(payment.paid_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_by_order(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Option<Payment>> {
    let payment = sqlx::query_as::<_, Payment>(
        "SELECT id, order_id, amount, method, status, paid_at FROM payment WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_optional(exec)
    .await?;
    Ok(payment)
}
