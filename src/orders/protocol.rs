use serde::{Deserialize, Serialize};

use super::types::OrderStatus;

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub user_id: i64,
    pub shipping_address: Option<String>,
    /// Processed strictly in the order given. Two items for the same product
    /// are checked sequentially, not merged.
    pub items: Vec<OrderItemRequest>,
}

/// One requested line: a product and how many units of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// Body of `PUT /api/orders/:id/status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}
