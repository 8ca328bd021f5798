//! Order Repository
//!
//! Orders are written once at checkout; afterwards only `status` moves
//! (and the shipping row's fulfillment fields, outside this core).

use super::RepoResult;
use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderItem, Shipping};
use sqlx::SqliteExecutor;

pub async fn insert(exec: impl SqliteExecutor<'_>, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, buyer_id, total_amount, status, payment_method, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(order.id)
    .bind(order.buyer_id)
    .bind(order.total_amount)
    .bind(&order.status)
    .bind(&order.payment_method)
    .bind(order.created_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn insert_item(exec: impl SqliteExecutor<'_>, item: &OrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, variant_id, quantity, price) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.variant_id)
    .bind(item.quantity)
    .bind(item.price)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn insert_shipping(exec: impl SqliteExecutor<'_>, shipping: &Shipping) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO shipping (id, order_id, receiver_name, receiver_phone, shipping_address, tracking_number, carrier, status, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(shipping.id)
    .bind(shipping.order_id)
    .bind(&shipping.receiver_name)
    .bind(&shipping.receiver_phone)
    .bind(&shipping.shipping_address)
    .bind(&shipping.tracking_number)
    .bind(&shipping.carrier)
    .bind(&shipping.status)
    .bind(shipping.created_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, buyer_id, total_amount, status, payment_method, created_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(exec)
    .await?;
    Ok(order)
}

pub async fn set_status(exec: impl SqliteExecutor<'_>, id: i64, status: &str) -> RepoResult<()> {
    sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(exec)
        .await?;
    Ok(())
}

/// 买家订单历史，新单在前
pub async fn list_by_buyer(exec: impl SqliteExecutor<'_>, buyer_id: i64) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT id, buyer_id, total_amount, status, payment_method, created_at \
         FROM orders WHERE buyer_id = ? ORDER BY created_at DESC",
    )
    .bind(buyer_id)
    .fetch_all(exec)
    .await?;
    Ok(orders)
}

/// 卖家销售历史：包含该卖家任一商品的订单，新单在前
pub async fn list_by_seller(exec: impl SqliteExecutor<'_>, seller_id: i64) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT DISTINCT o.id, o.buyer_id, o.total_amount, o.status, o.payment_method, o.created_at \
         FROM orders o \
         JOIN order_item oi ON oi.order_id = o.id \
         JOIN product_variant v ON oi.variant_id = v.id \
         JOIN product p ON v.product_id = p.id \
         WHERE p.seller_id = ? ORDER BY o.created_at DESC",
    )
    .bind(seller_id)
    .fetch_all(exec)
    .await?;
    Ok(orders)
}

pub async fn find_shipping(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Option<Shipping>> {
    let shipping = sqlx::query_as::<_, Shipping>(
        "SELECT id, order_id, receiver_name, receiver_phone, shipping_address, tracking_number, carrier, status, created_at \
         FROM shipping WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_optional(exec)
    .await?;
    Ok(shipping)
}

/// Order line joined with variant and product. Carries the owning seller so
/// callers can split by seller or filter to one seller's view.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItemDetailRow {
    pub order_id: i64,
    pub variant_id: i64,
    pub product_name: String,
    pub seller_id: i64,
    pub price: f64,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}

pub async fn list_item_details(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<OrderItemDetailRow>> {
    let rows = sqlx::query_as::<_, OrderItemDetailRow>(
        "SELECT oi.order_id, oi.variant_id, p.name AS product_name, p.seller_id, oi.price, oi.quantity, v.size, v.color \
         FROM order_item oi \
         JOIN product_variant v ON oi.variant_id = v.id \
         JOIN product p ON v.product_id = p.id \
         WHERE oi.order_id = ? ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(exec)
    .await?;
    Ok(rows)
}
