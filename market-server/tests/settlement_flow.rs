//! 结算流程集成测试
//!
//! 覆盖网关支付处理、金额交叉校验、幂等重放、多卖家分账。

mod common;

use common::*;
use market_server::checkout;
use market_server::db::repository::{order, payout};
use market_server::settlement::{self, GatewayEcho, SettlementError};
use shared::models::{OrderCreate, OrderItemInput, PaymentMethod};

fn vnpay_cart(items: Vec<OrderItemInput>) -> OrderCreate {
    OrderCreate {
        items,
        payment_method: PaymentMethod::Vnpay,
        address_id: None,
        receiver_name: Some("Tran Thi B".into()),
        receiver_phone: Some("0907654321".into()),
        street_address: Some("45 Le Loi".into()),
        city: Some("Da Nang".into()),
        postal_code: Some("550000".into()),
    }
}

/// Two sellers: A sells one item at 100, B sells two at 125 (order total 350).
async fn seed_two_seller_order(pool: &sqlx::SqlitePool) -> i64 {
    seed_user(pool, 1, "buyer@example.com", 0.0).await;
    seed_user(pool, 2, "seller-a@example.com", 0.0).await;
    seed_user(pool, 3, "seller-b@example.com", 0.0).await;
    seed_product(pool, 10, 2, "Denim jacket", 100.0).await;
    seed_product(pool, 11, 3, "Leather boots", 125.0).await;
    seed_variant(pool, 100, 10, 5).await;
    seed_variant(pool, 101, 11, 5).await;

    let placed = checkout::place_order(
        pool,
        &test_gateway(),
        1,
        vnpay_cart(vec![
            OrderItemInput {
                variant_id: 100,
                quantity: 1,
            },
            OrderItemInput {
                variant_id: 101,
                quantity: 2,
            },
        ]),
        "10.0.0.1",
    )
    .await
    .unwrap();
    assert_eq!(placed.total_amount, 350.0);
    placed.order_id
}

#[tokio::test]
async fn gateway_payment_settles_and_splits_per_seller() {
    let (pool, _dir) = test_pool().await;
    let order_id = seed_two_seller_order(&pool).await;

    let payment = settlement::process_gateway_payment(
        &pool,
        order_id,
        GatewayEcho {
            amount_minor: 35_000,
            response_code: "00".into(),
        },
    )
    .await
    .unwrap();

    assert_eq!(payment.amount, 350.0);
    assert_eq!(payment.method, "VNPAY");
    assert_eq!(payment.status, "SUCCESS");

    let order_row = order::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order_row.status, "PAID");

    // One payout per seller, amounts equal each seller's subtotal
    let payouts = payout::list_by_order(&pool, order_id).await.unwrap();
    assert_eq!(payouts.len(), 2);
    let by_seller: std::collections::HashMap<i64, f64> =
        payouts.iter().map(|p| (p.seller_id, p.amount)).collect();
    assert_eq!(by_seller[&2], 100.0);
    assert_eq!(by_seller[&3], 250.0);

    // Sum of payouts equals the order total; balances credited exactly once
    let total: f64 = payouts.iter().map(|p| p.amount).sum();
    assert_eq!(total, 350.0);
    assert_eq!(balance_of(&pool, 2).await, 100.0);
    assert_eq!(balance_of(&pool, 3).await, 250.0);
}

#[tokio::test]
async fn duplicate_gateway_callback_is_idempotent() {
    let (pool, _dir) = test_pool().await;
    let order_id = seed_two_seller_order(&pool).await;

    let echo = GatewayEcho {
        amount_minor: 35_000,
        response_code: "00".into(),
    };
    let first = settlement::process_gateway_payment(&pool, order_id, echo.clone())
        .await
        .unwrap();
    let second = settlement::process_gateway_payment(&pool, order_id, echo)
        .await
        .unwrap();

    // Same payment identity, no extra rows, no double credit
    assert_eq!(first.id, second.id);
    assert_eq!(count_rows(&pool, "payment").await, 1);
    assert_eq!(count_rows(&pool, "payout").await, 2);
    assert_eq!(balance_of(&pool, 2).await, 100.0);
    assert_eq!(balance_of(&pool, 3).await, 250.0);
}

#[tokio::test]
async fn amount_mismatch_is_fatal_and_changes_nothing() {
    let (pool, _dir) = test_pool().await;
    let order_id = seed_two_seller_order(&pool).await;

    let err = settlement::process_gateway_payment(
        &pool,
        order_id,
        GatewayEcho {
            amount_minor: 1_000, // tampered: real total is 35_000 minor units
            response_code: "00".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        SettlementError::AmountMismatch {
            expected: 35_000,
            got: 1_000
        }
    ));

    let order_row = order::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order_row.status, "AWAITING_PAYMENT");
    assert_eq!(count_rows(&pool, "payment").await, 0);
    assert_eq!(count_rows(&pool, "payout").await, 0);
    assert_eq!(balance_of(&pool, 2).await, 0.0);
}

#[tokio::test]
async fn gateway_decline_marks_order_failed() {
    let (pool, _dir) = test_pool().await;
    let order_id = seed_two_seller_order(&pool).await;

    let err = settlement::process_gateway_payment(
        &pool,
        order_id,
        GatewayEcho {
            amount_minor: 35_000,
            response_code: "24".into(), // customer cancelled
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SettlementError::GatewayDeclined { .. }));

    let order_row = order::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order_row.status, "FAILED_PAYMENT");
    assert_eq!(count_rows(&pool, "payment").await, 0);
}

#[tokio::test]
async fn declined_replay_never_regresses_a_paid_order() {
    let (pool, _dir) = test_pool().await;
    let order_id = seed_two_seller_order(&pool).await;

    settlement::process_gateway_payment(
        &pool,
        order_id,
        GatewayEcho {
            amount_minor: 35_000,
            response_code: "00".into(),
        },
    )
    .await
    .unwrap();

    // A stale declined webhook arrives after the successful one
    let err = settlement::process_gateway_payment(
        &pool,
        order_id,
        GatewayEcho {
            amount_minor: 35_000,
            response_code: "24".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SettlementError::GatewayDeclined { .. }));

    // Paid is terminal: status and payment survive
    let order_row = order::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order_row.status, "PAID");
    assert_eq!(count_rows(&pool, "payment").await, 1);
}

#[tokio::test]
async fn minor_unit_free_currency_settles_exactly() {
    // Order total 199000 (minor-unit-free currency), gateway echoes 19900000
    let (pool, _dir) = test_pool().await;
    seed_user(&pool, 1, "buyer@example.com", 0.0).await;
    seed_user(&pool, 2, "seller@example.com", 0.0).await;
    seed_product(&pool, 10, 2, "Ao dai", 199_000.0).await;
    seed_variant(&pool, 100, 10, 1).await;

    let placed = checkout::place_order(
        &pool,
        &test_gateway(),
        1,
        vnpay_cart(vec![OrderItemInput {
            variant_id: 100,
            quantity: 1,
        }]),
        "10.0.0.1",
    )
    .await
    .unwrap();

    settlement::process_gateway_payment(
        &pool,
        placed.order_id,
        GatewayEcho {
            amount_minor: 19_900_000,
            response_code: "00".into(),
        },
    )
    .await
    .unwrap();

    let order_row = order::find_by_id(&pool, placed.order_id).await.unwrap().unwrap();
    assert_eq!(order_row.status, "PAID");
    assert_eq!(count_rows(&pool, "payment").await, 1);
    assert_eq!(balance_of(&pool, 2).await, 199_000.0);
}

#[tokio::test]
async fn payout_requires_paid_order() {
    let (pool, _dir) = test_pool().await;
    seed_user(&pool, 1, "buyer@example.com", 0.0).await;
    seed_user(&pool, 2, "seller@example.com", 0.0).await;
    seed_product(&pool, 10, 2, "Corduroy cap", 30.0).await;
    seed_variant(&pool, 100, 10, 5).await;

    let placed = checkout::place_order(
        &pool,
        &test_gateway(),
        1,
        OrderCreate {
            items: vec![OrderItemInput {
                variant_id: 100,
                quantity: 1,
            }],
            payment_method: PaymentMethod::Cod,
            address_id: None,
            receiver_name: Some("Tran Thi B".into()),
            receiver_phone: Some("0907654321".into()),
            street_address: Some("45 Le Loi".into()),
            city: None,
            postal_code: None,
        },
        "10.0.0.1",
    )
    .await
    .unwrap();

    let err = settlement::create_payout(&pool, placed.order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::OrderNotPaid(_)));
    assert_eq!(count_rows(&pool, "payout").await, 0);
}

#[tokio::test]
async fn repeated_payout_trigger_credits_once() {
    let (pool, _dir) = test_pool().await;
    let order_id = seed_two_seller_order(&pool).await;

    settlement::process_gateway_payment(
        &pool,
        order_id,
        GatewayEcho {
            amount_minor: 35_000,
            response_code: "00".into(),
        },
    )
    .await
    .unwrap();

    // Manual re-trigger after the split already ran on the paid transition
    let payouts = settlement::create_payout(&pool, order_id).await.unwrap();
    assert_eq!(payouts.len(), 2);
    assert_eq!(count_rows(&pool, "payout").await, 2);
    assert_eq!(balance_of(&pool, 2).await, 100.0);
    assert_eq!(balance_of(&pool, 3).await, 250.0);
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let (pool, _dir) = test_pool().await;
    let err = settlement::process_payment(&pool, 424242, PaymentMethod::Wallet)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::OrderNotFound(424242)));
}
