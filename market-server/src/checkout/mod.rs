//! Checkout (order engine)
//!
//! Turns a cart into a durable order in one all-or-nothing transaction:
//! stock reservation, price capture, wallet debit, order + items + shipping
//! snapshot. Any failure rolls the whole thing back, including the stock
//! decrements already applied in the same request.

use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::repository::{RepoError, address, inventory, order, product, user};
use crate::money;
use crate::settlement::{self, SettlementError};
use crate::utils::AppError;
use crate::vnpay::{self, VnpayConfig};
use shared::models::{
    Order, OrderCreate, OrderItem, OrderResponse, OrderStatus, PaymentMethod, Shipping,
};

/// Shipping snapshot initial status
const SHIPPING_STATUS_PENDING: &str = "PENDING";

/// Checkout failures
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid quantity {quantity} for variant {variant_id}")]
    InvalidQuantity { variant_id: i64, quantity: i64 },

    #[error("Buyer {0} not found")]
    BuyerNotFound(i64),

    #[error("Variant not found: {0}")]
    VariantNotFound(i64),

    #[error("Insufficient stock for: {product_name} (variant {variant_id})")]
    InsufficientStock {
        variant_id: i64,
        product_name: String,
    },

    #[error("Insufficient wallet balance")]
    InsufficientBalance,

    #[error("Shipping address details are required")]
    MissingShippingInfo,

    #[error("Address invalid or unauthorized")]
    AddressNotOwned,

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::EmptyCart | CheckoutError::InvalidQuantity { .. } => {
                AppError::validation(e.to_string())
            }
            CheckoutError::MissingShippingInfo => AppError::validation(e.to_string()),
            CheckoutError::AddressNotOwned => AppError::forbidden(e.to_string()),
            CheckoutError::BuyerNotFound(_) | CheckoutError::VariantNotFound(_) => {
                AppError::not_found(e.to_string())
            }
            CheckoutError::InsufficientStock { .. } | CheckoutError::InsufficientBalance => {
                AppError::business_rule(e.to_string())
            }
            CheckoutError::Settlement(s) => s.into(),
            CheckoutError::Repo(r) => AppError::database(r.to_string()),
        }
    }
}

/// Place an order from a cart.
///
/// Steps 1–6 run in one transaction; the VNPay redirect URL (pure
/// computation) and the wallet finalize (its own transactional operation)
/// happen after commit.
pub async fn place_order(
    pool: &SqlitePool,
    gateway: &VnpayConfig,
    buyer_id: i64,
    req: OrderCreate,
    client_ip: &str,
) -> Result<OrderResponse, CheckoutError> {
    if req.items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    for line in &req.items {
        if line.quantity <= 0 || line.quantity > money::MAX_QUANTITY {
            return Err(CheckoutError::InvalidQuantity {
                variant_id: line.variant_id,
                quantity: line.quantity,
            });
        }
    }

    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let buyer = user::find_by_id(&mut *tx, buyer_id)
        .await?
        .ok_or(CheckoutError::BuyerNotFound(buyer_id))?;

    let now = shared::util::now_millis();
    let order_id = shared::util::snowflake_id();

    // Reserve stock and capture prices line by line
    let mut total = Decimal::ZERO;
    let mut items: Vec<OrderItem> = Vec::with_capacity(req.items.len());
    let mut item_summaries: Vec<String> = Vec::with_capacity(req.items.len());

    for line in &req.items {
        let variant = product::find_variant_for_sale(&mut *tx, line.variant_id)
            .await?
            .ok_or(CheckoutError::VariantNotFound(line.variant_id))?;

        // Atomic check-and-decrement; failure aborts the whole order and the
        // dropped transaction returns every prior line's stock.
        if !inventory::reserve(&mut *tx, line.variant_id, line.quantity).await? {
            return Err(CheckoutError::InsufficientStock {
                variant_id: line.variant_id,
                product_name: variant.product_name,
            });
        }

        // Unit price captured from the owning product's current base price
        let price = variant.base_price;
        total += money::line_total(price, line.quantity);

        items.push(OrderItem {
            id: shared::util::snowflake_id(),
            order_id,
            variant_id: line.variant_id,
            quantity: line.quantity,
            price,
        });
        item_summaries.push(format!("{}x {}", line.quantity, variant.product_name));
    }
    let total_amount = money::to_f64(total);

    // Initial status from the payment intent
    let status = match req.payment_method {
        PaymentMethod::Cod => OrderStatus::PlacedCod,
        PaymentMethod::Vnpay => OrderStatus::AwaitingPayment,
        PaymentMethod::Wallet => {
            // Conditional debit: balance check and decrement are one statement
            if !user::debit_balance(&mut *tx, buyer.id, total_amount).await? {
                return Err(CheckoutError::InsufficientBalance);
            }
            OrderStatus::AwaitingPayment
        }
    };

    let order_row = Order {
        id: order_id,
        buyer_id,
        total_amount,
        status: status.as_db().to_string(),
        payment_method: req.payment_method.as_db().to_string(),
        created_at: now,
    };
    order::insert(&mut *tx, &order_row).await?;
    for item in &items {
        order::insert_item(&mut *tx, item).await?;
    }

    let shipping = shipping_snapshot(&mut tx, &req, buyer_id, order_id, now).await?;
    order::insert_shipping(&mut *tx, &shipping).await?;

    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        order_id,
        buyer_id,
        total = total_amount,
        method = req.payment_method.as_db(),
        "Order placed"
    );

    let mut response = OrderResponse {
        order_id,
        total_amount,
        status: order_row.status.clone(),
        payment_method: order_row.payment_method.clone(),
        created_at: now,
        receiver_name: Some(shipping.receiver_name.clone()),
        shipping_address: Some(shipping.shipping_address.clone()),
        item_summaries,
        payment_url: None,
    };

    match req.payment_method {
        PaymentMethod::Vnpay => {
            response.payment_url = Some(vnpay::create_payment_url(
                gateway,
                order_id,
                total_amount,
                client_ip,
            ));
        }
        PaymentMethod::Wallet => {
            // Balance already left the wallet: finalize immediately so the
            // order transitions AWAITING_PAYMENT -> PAID and payouts run.
            let payment =
                settlement::process_payment(pool, order_id, PaymentMethod::Wallet).await?;
            response.status = OrderStatus::Paid.as_db().to_string();
            tracing::debug!(order_id, payment_id = payment.id, "Wallet payment finalized");
        }
        PaymentMethod::Cod => {}
    }

    Ok(response)
}

/// Build the immutable shipping snapshot: either copy a saved address the
/// buyer owns, or take the request's one-time receiver fields.
async fn shipping_snapshot(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    req: &OrderCreate,
    buyer_id: i64,
    order_id: i64,
    now: i64,
) -> Result<Shipping, CheckoutError> {
    let conn: &mut SqliteConnection = &mut *tx;

    let (receiver_name, receiver_phone, shipping_address) = if let Some(address_id) = req.address_id
    {
        let saved = address::find_by_id(&mut *conn, address_id)
            .await?
            .filter(|a| a.user_id == buyer_id)
            .ok_or(CheckoutError::AddressNotOwned)?;
        (
            saved.full_name,
            saved.phone,
            format_address(&saved.street_address, &saved.city, &saved.postal_code),
        )
    } else {
        let street = req
            .street_address
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(CheckoutError::MissingShippingInfo)?;
        let name = req
            .receiver_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(CheckoutError::MissingShippingInfo)?;
        let phone = req
            .receiver_phone
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(CheckoutError::MissingShippingInfo)?;
        (
            name.to_string(),
            phone.to_string(),
            format_address(
                street,
                req.city.as_deref().unwrap_or(""),
                req.postal_code.as_deref().unwrap_or(""),
            ),
        )
    };

    Ok(Shipping {
        id: shared::util::snowflake_id(),
        order_id,
        receiver_name,
        receiver_phone,
        shipping_address,
        tracking_number: None,
        carrier: None,
        status: SHIPPING_STATUS_PENDING.to_string(),
        created_at: now,
    })
}

/// Concatenate address parts, skipping blanks
fn format_address(street: &str, city: &str, postal_code: &str) -> String {
    [street, city, postal_code]
        .iter()
        .filter(|p| !p.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_address_skips_blank_parts() {
        assert_eq!(
            format_address("12 Hang Gai", "Hanoi", "100000"),
            "12 Hang Gai, Hanoi, 100000"
        );
        assert_eq!(format_address("12 Hang Gai", "", ""), "12 Hang Gai");
        assert_eq!(format_address("12 Hang Gai", "Hanoi", " "), "12 Hang Gai, Hanoi");
    }
}
