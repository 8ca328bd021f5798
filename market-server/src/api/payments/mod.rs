//! Payment API 模块
//!
//! 手动支付触发 + VNPay 回调端点。回调路径保持网关侧注册的
//! `/api/payment/vnpay-callback`（单数），与其他资源路由分开。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/payments/{order_id}", post(handler::pay))
        .route("/api/payment/vnpay-callback", get(handler::vnpay_callback))
}
