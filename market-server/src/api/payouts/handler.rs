//! Payout API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::identity::CurrentUser;
use crate::core::AppState;
use crate::settlement;
use crate::utils::AppResult;
use shared::models::Payout;

/// POST /api/payouts/:order_id - 手动触发分账
///
/// The split normally runs on the paid transition; this endpoint re-runs it
/// for operational recovery. Re-invoking for an already-split order is a
/// no-op (existing payouts are returned, nobody is credited twice).
pub async fn process_payout(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(order_id): Path<i64>,
) -> AppResult<Json<Vec<Payout>>> {
    let payouts = settlement::create_payout(&state.pool, order_id).await?;
    Ok(Json(payouts))
}
