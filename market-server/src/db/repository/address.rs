//! Address Repository

use super::RepoResult;
use shared::models::Address;
use sqlx::SqliteExecutor;

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Address>> {
    let address = sqlx::query_as::<_, Address>(
        "SELECT id, user_id, full_name, phone, street_address, city, postal_code, country, is_default, created_at FROM address WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(exec)
    .await?;
    Ok(address)
}
