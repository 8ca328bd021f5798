//! Seller API Handlers

use axum::{Json, extract::State};
use rust_decimal::Decimal;

use crate::api::identity::CurrentUser;
use crate::core::AppState;
use crate::db::repository::{payout, product};
use crate::money;
use crate::utils::AppResult;
use shared::models::{PAYOUT_STATUS_COMPLETED, SellerStats};

/// GET /api/sellers/stats - 卖家面板统计
pub async fn stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<SellerStats>> {
    let active_listings = product::count_active_by_seller(&state.pool, user.id).await?;

    let payouts = payout::list_by_seller(&state.pool, user.id).await?;

    // Revenue counts completed payouts only; total sales is the number of
    // payout events (one per order containing this seller's items).
    let revenue: Decimal = payouts
        .iter()
        .filter(|p| p.status == PAYOUT_STATUS_COMPLETED)
        .map(|p| money::to_decimal(p.amount))
        .sum();

    Ok(Json(SellerStats {
        total_revenue: money::to_f64(revenue),
        active_listings,
        total_sales: payouts.len() as i64,
    }))
}
