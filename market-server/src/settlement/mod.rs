//! Settlement: payment processing and seller payout splitting
//!
//! `process_payment` is the single state-transition edge that marks an order
//! paid, whatever triggered it (wallet finalize, manual trigger, verified
//! gateway callback). The payout split runs inside the same transaction, so
//! an order can never end up PAID without its payout trail.

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::db::repository::{RepoError, order, payment, payout, user};
use crate::money;
use crate::security_log;
use crate::utils::AppError;
use crate::vnpay::VNP_RESPONSE_SUCCESS;
use shared::models::{
    OrderStatus, PAYMENT_STATUS_SUCCESS, PAYOUT_STATUS_COMPLETED, Payment, PaymentMethod, Payout,
};

/// Settlement failures
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Payment declined by gateway (code {code})")]
    GatewayDeclined { code: String },

    /// Security-relevant: the signed callback amount does not match the order
    #[error("Payment amount mismatch: expected {expected} minor units, got {got}")]
    AmountMismatch { expected: i64, got: i64 },

    #[error("Order {0} is not paid")]
    OrderNotPaid(i64),

    /// Programming error: a VNPAY settlement reached the processor without
    /// its verified gateway echo
    #[error("Gateway echo missing for VNPAY payment")]
    MissingGatewayEcho,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<SettlementError> for AppError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::OrderNotFound(id) => AppError::not_found(format!("Order {id}")),
            SettlementError::GatewayDeclined { .. } => AppError::business_rule(e.to_string()),
            SettlementError::AmountMismatch { .. } => AppError::business_rule(e.to_string()),
            SettlementError::OrderNotPaid(_) => AppError::business_rule(e.to_string()),
            SettlementError::MissingGatewayEcho => AppError::internal(e.to_string()),
            SettlementError::Repo(r) => AppError::database(r.to_string()),
        }
    }
}

/// Signature-verified fields echoed by the gateway, cross-checked against
/// the order before any transition.
#[derive(Debug, Clone)]
pub struct GatewayEcho {
    pub amount_minor: i64,
    pub response_code: String,
}

/// Finalize a non-gateway payment (WALLET, or a manual trigger).
pub async fn process_payment(
    pool: &SqlitePool,
    order_id: i64,
    method: PaymentMethod,
) -> Result<Payment, SettlementError> {
    process_payment_inner(pool, order_id, method, None).await
}

/// Finalize a gateway payment from a verified callback.
///
/// Caller contract: `echo` MUST come out of `vnpay::verify_callback`;
/// the processor trusts its fields.
pub async fn process_gateway_payment(
    pool: &SqlitePool,
    order_id: i64,
    echo: GatewayEcho,
) -> Result<Payment, SettlementError> {
    process_payment_inner(pool, order_id, PaymentMethod::Vnpay, Some(echo)).await
}

async fn process_payment_inner(
    pool: &SqlitePool,
    order_id: i64,
    method: PaymentMethod,
    echo: Option<GatewayEcho>,
) -> Result<Payment, SettlementError> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let order = order::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or(SettlementError::OrderNotFound(order_id))?;
    let already_paid = order.status == OrderStatus::Paid.as_db();

    if method == PaymentMethod::Vnpay {
        let echo = echo.ok_or(SettlementError::MissingGatewayEcho)?;

        if echo.response_code != VNP_RESPONSE_SUCCESS {
            // Persist the failed transition, but never regress a paid order
            // (a stale declined webhook can arrive after a successful one).
            if !already_paid {
                order::set_status(&mut *tx, order_id, OrderStatus::FailedPayment.as_db()).await?;
                tx.commit().await.map_err(RepoError::from)?;
            }
            return Err(SettlementError::GatewayDeclined {
                code: echo.response_code,
            });
        }

        let expected = money::to_minor_units(order.total_amount);
        if echo.amount_minor != expected {
            security_log!(
                ERROR,
                "payment_amount_mismatch",
                order_id = order_id,
                expected = expected,
                got = echo.amount_minor
            );
            return Err(SettlementError::AmountMismatch {
                expected,
                got: echo.amount_minor,
            });
        }
    }

    // Idempotency guard: replaying a duplicate callback is a no-op, not an
    // error. Return the payment recorded by the first delivery.
    if already_paid
        && let Some(existing) = payment::find_by_order(&mut *tx, order_id).await?
    {
        tracing::info!(order_id, payment_id = existing.id, "Duplicate payment delivery, returning existing payment");
        return Ok(existing);
    }

    let now = shared::util::now_millis();
    let record = Payment {
        id: shared::util::snowflake_id(),
        order_id,
        amount: order.total_amount,
        method: method.as_db().to_string(),
        status: PAYMENT_STATUS_SUCCESS.to_string(),
        paid_at: now,
    };
    payment::insert(&mut *tx, &record).await?;
    order::set_status(&mut *tx, order_id, OrderStatus::Paid.as_db()).await?;

    split_payouts(&mut tx, order_id, now).await?;

    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        order_id,
        amount = record.amount,
        method = method.as_db(),
        "Payment recorded, order settled"
    );

    Ok(record)
}

/// Split an order's proceeds among its sellers and credit their balances.
///
/// Runs on the paid-transition edge inside the caller's transaction. The
/// duplicate-invocation guard is defensive: the design only ever invokes
/// this once per order.
async fn split_payouts(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    order_id: i64,
    now: i64,
) -> Result<(), SettlementError> {
    if payout::exists_for_order(&mut **tx, order_id).await? {
        tracing::warn!(order_id, "Payouts already recorded for order, skipping split");
        return Ok(());
    }

    let items = order::list_item_details(&mut **tx, order_id).await?;

    // Group line totals by owning seller (BTreeMap: deterministic order)
    let mut subtotals: BTreeMap<i64, Decimal> = BTreeMap::new();
    for item in &items {
        *subtotals.entry(item.seller_id).or_default() +=
            money::line_total(item.price, item.quantity);
    }

    for (seller_id, subtotal) in &subtotals {
        let amount = money::to_f64(*subtotal);
        tracing::debug!(order_id, seller_id, amount, "Creating seller payout");

        let record = Payout {
            id: shared::util::snowflake_id(),
            order_id,
            seller_id: *seller_id,
            amount,
            status: PAYOUT_STATUS_COMPLETED.to_string(),
            arrival_at: now,
        };
        payout::insert(&mut **tx, &record).await?;
        user::credit_balance(&mut **tx, *seller_id, amount).await?;
    }

    tracing::info!(
        order_id,
        sellers = subtotals.len(),
        "Order proceeds split into payouts"
    );
    Ok(())
}

/// Manually trigger the payout split for a paid order.
///
/// Normally the split runs on the paid transition; this entry point re-runs
/// it for operational recovery and is a no-op when payouts already exist.
pub async fn create_payout(
    pool: &SqlitePool,
    order_id: i64,
) -> Result<Vec<Payout>, SettlementError> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let order = order::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or(SettlementError::OrderNotFound(order_id))?;
    if order.status != OrderStatus::Paid.as_db() {
        return Err(SettlementError::OrderNotPaid(order_id));
    }

    let now = shared::util::now_millis();
    split_payouts(&mut tx, order_id, now).await?;
    tx.commit().await.map_err(RepoError::from)?;

    let payouts = payout::list_by_order(pool, order_id).await?;
    Ok(payouts)
}
