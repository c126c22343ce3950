use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::users::types::UserSummary;

/// Lifecycle state of an order.
///
/// Transitions are driven by external collaborators (payment, fulfilment);
/// the service records whatever state it is told without validating the
/// sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

/// Order header row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Order line row.
///
/// `price_at_purchase` is the product price snapshotted when the order was
/// placed; it never changes afterwards, even if the live product price does.
/// `product_id` is a weak reference: deleting the product later nulls it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub price_at_purchase: Decimal,
}

/// Compact product reference embedded in order line views.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderProductSummary {
    pub id: i64,
    pub name: String,
}

/// One line of a materialized order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineView {
    pub product: Option<OrderProductSummary>,
    pub quantity: i64,
    pub price_at_purchase: Decimal,
}

/// A fully materialized order: header plus resolved user and line items.
/// This is what callers get back after a successful placement (read after
/// write) and from the read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: i64,
    pub user: UserSummary,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}
