//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::HeaderMap;
use rust_decimal::Decimal;

use crate::api::identity::CurrentUser;
use crate::checkout;
use crate::core::AppState;
use crate::db::repository::order;
use crate::money;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Order, OrderCreate, OrderDetail, OrderItemView, OrderResponse};

/// POST /api/orders - 下单
pub async fn place(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
    Json(req): Json<OrderCreate>,
) -> AppResult<Json<OrderResponse>> {
    validate_optional_text(&req.receiver_name, "receiver_name", MAX_NAME_LEN)?;
    validate_optional_text(&req.receiver_phone, "receiver_phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.street_address, "street_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&req.city, "city", MAX_NAME_LEN)?;
    validate_optional_text(&req.postal_code, "postal_code", MAX_SHORT_TEXT_LEN)?;

    let client_ip = crate::api::client_ip(&headers);
    let gateway = state.vnpay_config();

    let response = checkout::place_order(&state.pool, &gateway, user.id, req, &client_ip).await?;
    Ok(Json(response))
}

/// GET /api/orders - 买家订单历史
pub async fn my_history(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let orders = order::list_by_buyer(&state.pool, user.id).await?;

    let mut history = Vec::with_capacity(orders.len());
    for o in orders {
        let items = order::list_item_details(&state.pool, o.id).await?;
        let summaries = items
            .iter()
            .map(|i| format!("{}x {}", i.quantity, i.product_name))
            .collect();
        history.push(to_response(&o, summaries));
    }
    Ok(Json(history))
}

/// GET /api/orders/sales - 卖家销售历史（只显示自己卖出的部分）
pub async fn sales_history(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let orders = order::list_by_seller(&state.pool, user.id).await?;

    let mut history = Vec::with_capacity(orders.len());
    for o in orders {
        let items = order::list_item_details(&state.pool, o.id).await?;

        // Only this seller's lines: their subtotal replaces the order total
        let mine: Vec<_> = items.iter().filter(|i| i.seller_id == user.id).collect();
        let subtotal: Decimal = mine
            .iter()
            .map(|i| money::line_total(i.price, i.quantity))
            .sum();
        let summaries = mine
            .iter()
            .map(|i| format!("{}x {}", i.quantity, i.product_name))
            .collect();

        let mut response = to_response(&o, summaries);
        response.total_amount = money::to_f64(subtotal);
        history.push(response);
    }
    Ok(Json(history))
}

/// GET /api/orders/:id - 订单详情（按买家/卖家身份过滤行项目）
pub async fn detail(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let order_row = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;
    let items = order::list_item_details(&state.pool, id).await?;

    let is_buyer = order_row.buyer_id == user.id;
    let is_seller = items.iter().any(|i| i.seller_id == user.id);
    if !is_buyer && !is_seller {
        return Err(AppError::forbidden(
            "You do not have permission to view this order",
        ));
    }

    let shipping = order::find_shipping(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::internal(format!("Order {id} has no shipping snapshot")))?;

    // Buyers see every line; sellers only the lines they own
    let visible: Vec<_> = items
        .iter()
        .filter(|i| is_buyer || i.seller_id == user.id)
        .collect();

    // Sellers see their subtotal, not the whole order's total
    let total_amount = if is_buyer {
        order_row.total_amount
    } else {
        let subtotal: Decimal = visible
            .iter()
            .map(|i| money::line_total(i.price, i.quantity))
            .sum();
        money::to_f64(subtotal)
    };

    Ok(Json(OrderDetail {
        order_id: order_row.id,
        total_amount,
        status: order_row.status,
        payment_method: order_row.payment_method,
        created_at: order_row.created_at,
        receiver_name: shipping.receiver_name,
        shipping_address: shipping.shipping_address,
        items: visible
            .into_iter()
            .map(|i| OrderItemView {
                product_name: i.product_name.clone(),
                price: i.price,
                quantity: i.quantity,
                size: i.size.clone(),
                color: i.color.clone(),
            })
            .collect(),
    }))
}

fn to_response(order: &Order, item_summaries: Vec<String>) -> OrderResponse {
    OrderResponse {
        order_id: order.id,
        total_amount: order.total_amount,
        status: order.status.clone(),
        payment_method: order.payment_method.clone(),
        created_at: order.created_at,
        receiver_name: None,
        shipping_address: None,
        item_summaries,
        payment_url: None,
    }
}
