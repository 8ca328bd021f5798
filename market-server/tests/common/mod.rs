//! Shared test fixtures: temp database + seed data helpers
#![allow(dead_code)] // each test binary uses its own subset of the fixtures

use market_server::db::DbService;
use market_server::vnpay::VnpayConfig;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Open a fresh migrated database in a temp directory.
/// The TempDir must stay alive for the duration of the test.
pub async fn test_pool() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("test.db");
    let db = DbService::new(path.to_str().expect("utf8 path"))
        .await
        .expect("open test database");
    (db.pool, dir)
}

pub fn test_gateway() -> VnpayConfig {
    VnpayConfig {
        tmn_code: "TESTTMN1".into(),
        hash_secret: "testhashsecret".into(),
        api_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".into(),
        return_url: "http://localhost:8080/api/payment/vnpay-callback".into(),
    }
}

pub async fn seed_user(pool: &SqlitePool, id: i64, email: &str, balance: f64) {
    sqlx::query(
        "INSERT INTO user (id, email, display_name, shop_name, balance, created_at, updated_at) \
         VALUES (?1, ?2, ?3, NULL, ?4, 0, 0)",
    )
    .bind(id)
    .bind(email)
    .bind(email.split('@').next().unwrap_or("user"))
    .bind(balance)
    .execute(pool)
    .await
    .expect("seed user");
}

pub async fn seed_product(pool: &SqlitePool, id: i64, seller_id: i64, name: &str, price: f64) {
    sqlx::query(
        "INSERT INTO product (id, seller_id, name, base_price, status, created_at) \
         VALUES (?1, ?2, ?3, ?4, 'ACTIVE', 0)",
    )
    .bind(id)
    .bind(seller_id)
    .bind(name)
    .bind(price)
    .execute(pool)
    .await
    .expect("seed product");
}

pub async fn seed_variant(pool: &SqlitePool, id: i64, product_id: i64, stock: i64) {
    sqlx::query(
        "INSERT INTO product_variant (id, product_id, size, color, stock_quantity) \
         VALUES (?1, ?2, 'M', 'black', ?3)",
    )
    .bind(id)
    .bind(product_id)
    .bind(stock)
    .execute(pool)
    .await
    .expect("seed variant");
}

pub async fn seed_address(pool: &SqlitePool, id: i64, user_id: i64) {
    sqlx::query(
        "INSERT INTO address (id, user_id, full_name, phone, street_address, city, postal_code, country, is_default, created_at) \
         VALUES (?1, ?2, 'Nguyen Van A', '0901234567', '12 Hang Gai', 'Hanoi', '100000', 'VN', 1, 0)",
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await
    .expect("seed address");
}

pub async fn balance_of(pool: &SqlitePool, user_id: i64) -> f64 {
    sqlx::query_scalar("SELECT balance FROM user WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("balance")
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count")
}
