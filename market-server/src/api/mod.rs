//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`identity`] - 上游身份提取器
//! - [`orders`] - 下单与订单查询接口
//! - [`payments`] - 支付接口（含 VNPay 回调）
//! - [`payouts`] - 分账接口
//! - [`sellers`] - 卖家统计接口

pub mod health;
pub mod identity;

pub mod orders;
pub mod payments;
pub mod payouts;
pub mod sellers;

use axum::Router;
use axum::routing::get;
use http::HeaderMap;
use tower_http::trace::TraceLayer;

use crate::core::AppState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(orders::router())
        .merge(payments::router())
        .merge(payouts::router())
        .merge(sellers::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Best-effort client IP: proxy header first, loopback fallback.
/// Only feeds the gateway's vnp_IpAddr parameter, never an access decision.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "127.0.0.1".to_string())
}
