//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::place).get(handler::my_history))
        .route("/sales", get(handler::sales_history))
        .route("/{id}", get(handler::detail))
}
