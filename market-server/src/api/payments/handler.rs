//! Payment API Handlers
//!
//! The VNPay callback is the public-facing return endpoint: it must always
//! answer within the gateway's callback window with an HTTP redirect to a
//! frontend landing page, so error cases redirect rather than hang or 5xx.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use http::{StatusCode, header};
use serde::Deserialize;
use std::collections::HashMap;

use crate::api::identity::CurrentUser;
use crate::core::AppState;
use crate::security_log;
use crate::settlement::{self, GatewayEcho, SettlementError};
use crate::utils::{AppError, AppResult};
use crate::vnpay;
use shared::models::{Payment, PaymentMethod};

#[derive(Debug, Deserialize)]
pub struct PayQuery {
    pub method: PaymentMethod,
}

/// POST /api/payments/:order_id?method=WALLET - 手动触发支付处理
///
/// Gateway payments never come through here; they arrive signature-verified
/// on the callback endpoint.
pub async fn pay(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(order_id): Path<i64>,
    Query(query): Query<PayQuery>,
) -> AppResult<Json<Payment>> {
    if query.method == PaymentMethod::Vnpay {
        return Err(AppError::validation(
            "VNPAY payments are finalized via the gateway callback",
        ));
    }

    let payment = settlement::process_payment(&state.pool, order_id, query.method).await?;
    Ok(Json(payment))
}

/// GET /api/payment/vnpay-callback - VNPay 支付结果回调
///
/// Verifies the signature, hands the verified fields to the payment
/// processor, and 302-redirects the customer to the frontend result page.
pub async fn vnpay_callback(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    tracing::info!("Received VNPay callback notification");

    let gateway = state.vnpay_config();
    let frontend = &state.config.frontend_url;

    let verified = match vnpay::verify_callback(&gateway, &params) {
        Ok(v) => v,
        Err(e) => {
            security_log!(
                WARN,
                "vnpay_signature_invalid",
                error = %e,
                txn_ref = params.get("vnp_TxnRef").map(String::as_str).unwrap_or("?")
            );
            return redirect(&format!("{frontend}/payment-error?reason=invalid_signature"));
        }
    };

    let order_id = verified.txn_ref;
    let echo = GatewayEcho {
        amount_minor: verified.amount_minor,
        response_code: verified.response_code,
    };

    match settlement::process_gateway_payment(&state.pool, order_id, echo).await {
        Ok(_) => {
            tracing::info!(order_id, "VNPay payment success");
            redirect(&format!("{frontend}/payment-success?orderId={order_id}"))
        }
        Err(SettlementError::GatewayDeclined { code }) => {
            tracing::warn!(order_id, code, "VNPay payment failed");
            redirect(&format!("{frontend}/payment-failed?orderId={order_id}"))
        }
        Err(e) => {
            // AmountMismatch already logged as a security event by settlement
            tracing::error!(order_id, error = %e, "VNPay callback processing failed");
            redirect(&format!("{frontend}/payment-error?reason=processing_failed"))
        }
    }
}

/// 302 FOUND redirect (the status the gateway expects from return URLs)
fn redirect(url: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response()
}
