//! Order Model

use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Transitions are monotonic: once an order reaches `Paid` it never leaves.
/// `PlacedCod` is terminal for the payment pipeline (cash is collected on
/// delivery, outside this system).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// COD order placed, fulfillment proceeds without upfront payment
    PlacedCod,
    /// Waiting for gateway callback or wallet finalize
    AwaitingPayment,
    /// Payment applied, payouts recorded
    Paid,
    /// Gateway declined the payment
    FailedPayment,
}

impl OrderStatus {
    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::PlacedCod => "PLACED_COD",
            Self::AwaitingPayment => "AWAITING_PAYMENT",
            Self::Paid => "PAID",
            Self::FailedPayment => "FAILED_PAYMENT",
        }
    }

    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "PLACED_COD" => Some(Self::PlacedCod),
            "AWAITING_PAYMENT" => Some(Self::AwaitingPayment),
            "PAID" => Some(Self::Paid),
            "FAILED_PAYMENT" => Some(Self::FailedPayment),
            _ => None,
        }
    }
}

/// Checkout payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery
    Cod,
    /// External VNPay gateway redirect
    Vnpay,
    /// Stored wallet balance
    Wallet,
}

impl PaymentMethod {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Cod => "COD",
            Self::Vnpay => "VNPAY",
            Self::Wallet => "WALLET",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "COD" => Some(Self::Cod),
            "VNPAY" => Some(Self::Vnpay),
            "WALLET" => Some(Self::Wallet),
            _ => None,
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub buyer_id: i64,
    /// Sum of captured item price × quantity
    pub total_amount: f64,
    pub status: String,
    pub payment_method: String,
    pub created_at: i64,
}

/// Order line item. `price` is the unit price captured at purchase time,
/// immutable against later catalog repricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub variant_id: i64,
    pub quantity: i64,
    pub price: f64,
}

/// Shipping snapshot: denormalized copy of the receiver details taken at
/// order creation. Never updated from the address book afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shipping {
    pub id: i64,
    pub order_id: i64,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub shipping_address: String,
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub status: String,
    pub created_at: i64,
}

/// One cart line in a checkout request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub variant_id: i64,
    pub quantity: i64,
}

/// Place-order payload
///
/// Shipping comes from either `address_id` (a saved address owned by the
/// buyer) or the one-time receiver fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemInput>,
    pub payment_method: PaymentMethod,
    pub address_id: Option<i64>,
    pub receiver_name: Option<String>,
    pub receiver_phone: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

/// Order summary returned from checkout and history views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: i64,
    pub total_amount: f64,
    pub status: String,
    pub payment_method: String,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    /// "2x Vintage denim jacket" style lines
    pub item_summaries: Vec<String>,
    /// VNPay redirect URL, present only right after a VNPAY checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

/// One line of an order detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemView {
    pub product_name: String,
    pub price: f64,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Full order detail. Items are filtered to the caller's visibility
/// (buyers see all lines, sellers only their own).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_id: i64,
    pub total_amount: f64,
    pub status: String,
    pub payment_method: String,
    pub created_at: i64,
    pub receiver_name: String,
    pub shipping_address: String,
    pub items: Vec<OrderItemView>,
}
