//! User Repository
//!
//! 钱包约束：余额只有两个写入口 —— checkout 的 WALLET 扣款（debit_balance）
//! 和 settlement 的卖家分账入账（credit_balance）。

use super::RepoResult;
use shared::models::User;
use sqlx::SqliteExecutor;

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, display_name, shop_name, balance, created_at, updated_at FROM user WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(exec)
    .await?;
    Ok(user)
}

/// Conditionally debit a wallet balance.
///
/// Single atomic statement: the `balance >= amount` guard and the decrement
/// cannot be separated by a concurrent writer. Returns `false` when the
/// balance is insufficient (no row updated).
pub async fn debit_balance(
    exec: impl SqliteExecutor<'_>,
    user_id: i64,
    amount: f64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user SET balance = balance - ?1, updated_at = ?2 WHERE id = ?3 AND balance >= ?1",
    )
    .bind(amount)
    .bind(now)
    .bind(user_id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Credit a seller balance (payout settlement only).
pub async fn credit_balance(
    exec: impl SqliteExecutor<'_>,
    user_id: i64,
    amount: f64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE user SET balance = balance + ?1, updated_at = ?2 WHERE id = ?3")
        .bind(amount)
        .bind(now)
        .bind(user_id)
        .execute(exec)
        .await?;
    Ok(())
}
