//! Payout API 模块

mod handler;

use axum::{Router, routing::post};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/payouts/{order_id}", post(handler::process_payout))
}
