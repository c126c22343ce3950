use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use super::protocol::PlaceOrderRequest;
use super::types::{Order, OrderLine, OrderLineView, OrderProductSummary, OrderStatus, OrderView};
use crate::db::router::ConnectionRouter;
use crate::error::StoreError;
use crate::store::tables::Tables;
use crate::users::types::UserSummary;

/// Turns (user, requested lines) into a durable order with consistent stock
/// accounting, as one all-or-nothing transaction against whatever endpoint
/// the router currently designates.
pub struct OrderService {
    router: Arc<ConnectionRouter>,
}

impl OrderService {
    pub fn new(router: Arc<ConnectionRouter>) -> Self {
        Self { router }
    }

    /// Places an order.
    ///
    /// Validation happens before any transaction is opened. Inside the
    /// transaction, lines are processed strictly in request order: each
    /// line's stock check sees the decrements of earlier lines, so a
    /// duplicate product that jointly exceeds stock fails on the later line.
    /// The product price is snapshotted into `price_at_purchase` at this
    /// point and never re-read.
    ///
    /// Any failure after `begin` drops the transaction, which rolls every
    /// mutation back; no partial stock decrement or partial order is ever
    /// visible. On commit the order is re-read and returned materialized.
    pub async fn place_order(&self, req: PlaceOrderRequest) -> Result<OrderView, StoreError> {
        if req.items.is_empty() {
            return Err(StoreError::InvalidRequest(
                "at least one order item is required".to_string(),
            ));
        }
        for item in &req.items {
            if item.quantity <= 0 {
                return Err(StoreError::InvalidRequest(format!(
                    "quantity for product {} must be a positive integer",
                    item.product_id
                )));
            }
        }

        // Captured once; a switch mid-flight does not migrate this call.
        let db = self.router.active().await;
        let mut txn = db.begin().await?;

        if !txn.users.contains_key(&req.user_id) {
            return Err(StoreError::NotFound {
                entity: "user",
                id: req.user_id,
            });
        }

        let mut total = Decimal::ZERO;
        let mut lines = Vec::with_capacity(req.items.len());

        for item in &req.items {
            let product =
                txn.products
                    .get_mut(&item.product_id)
                    .ok_or(StoreError::NotFound {
                        entity: "product",
                        id: item.product_id,
                    })?;

            if product.stock_quantity < item.quantity {
                return Err(StoreError::InsufficientStock {
                    product_id: product.id,
                    available: product.stock_quantity,
                    requested: item.quantity,
                });
            }

            total += product.price * Decimal::from(item.quantity);
            lines.push(OrderLine {
                id: 0,
                order_id: 0,
                product_id: Some(product.id),
                quantity: item.quantity,
                price_at_purchase: product.price,
            });

            product.stock_quantity -= item.quantity;
        }

        let order = Order {
            id: 0,
            user_id: req.user_id,
            total_amount: total,
            status: OrderStatus::Pending,
            shipping_address: req.shipping_address.clone(),
            created_at: Utc::now(),
        };
        let order_id = txn.insert_order(order, lines);

        txn.commit();
        tracing::info!(
            "order {} placed for user {} ({} line(s), total {})",
            order_id,
            req.user_id,
            req.items.len(),
            total
        );

        // Read after write: the caller gets the committed state back.
        let tables = db.read().await?;
        materialize_order(&tables, order_id).ok_or_else(|| {
            StoreError::TransactionFailed(format!("order {order_id} missing after commit"))
        })
    }

    /// Cancels an order: restores each referenced product's stock by the
    /// line quantity, then deletes the order and its lines, all in one
    /// transaction. The restoration is unconditional; it is never possible
    /// to observe a deleted order whose stock was not returned.
    pub async fn cancel_order(&self, order_id: i64) -> Result<(), StoreError> {
        let db = self.router.active().await;
        let mut txn = db.begin().await?;

        if !txn.orders.contains_key(&order_id) {
            return Err(StoreError::NotFound {
                entity: "order",
                id: order_id,
            });
        }

        let lines = txn.lines_for_order(order_id);
        for line in &lines {
            // product_id is None when the product was deleted after the
            // order was placed; there is nothing to restore then.
            if let Some(product_id) = line.product_id
                && let Some(product) = txn.products.get_mut(&product_id)
            {
                product.stock_quantity += line.quantity;
            }
        }

        txn.remove_order(order_id);
        txn.commit();
        tracing::info!("order {} cancelled, stock restored", order_id);

        Ok(())
    }

    pub async fn get_order(&self, order_id: i64) -> Result<OrderView, StoreError> {
        let db = self.router.active().await;
        let tables = db.read().await?;
        materialize_order(&tables, order_id).ok_or(StoreError::NotFound {
            entity: "order",
            id: order_id,
        })
    }

    /// All orders, newest first.
    pub async fn list_orders(&self) -> Result<Vec<OrderView>, StoreError> {
        let db = self.router.active().await;
        let tables = db.read().await?;

        let mut orders: Vec<&Order> = tables.orders.values().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(orders
            .into_iter()
            .filter_map(|order| materialize_order(&tables, order.id))
            .collect())
    }

    /// Records a status change. Transitions are externally driven and not
    /// validated here.
    pub async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<OrderView, StoreError> {
        let db = self.router.active().await;
        let mut txn = db.begin().await?;

        let order = txn.orders.get_mut(&order_id).ok_or(StoreError::NotFound {
            entity: "order",
            id: order_id,
        })?;
        order.status = status;

        txn.commit();

        let tables = db.read().await?;
        materialize_order(&tables, order_id).ok_or_else(|| {
            StoreError::TransactionFailed(format!("order {order_id} missing after commit"))
        })
    }
}

/// Resolves an order header into the full view: user summary plus each line
/// with its product summary (absent when the product was since removed).
pub fn materialize_order(tables: &Tables, order_id: i64) -> Option<OrderView> {
    let order = tables.orders.get(&order_id)?;
    let user = tables.users.get(&order.user_id)?;

    let lines = tables
        .lines_for_order(order_id)
        .into_iter()
        .map(|line| OrderLineView {
            product: line.product_id.and_then(|id| {
                tables.products.get(&id).map(|p| OrderProductSummary {
                    id: p.id,
                    name: p.name.clone(),
                })
            }),
            quantity: line.quantity,
            price_at_purchase: line.price_at_purchase,
        })
        .collect();

    Some(OrderView {
        id: order.id,
        user: UserSummary::from(user),
        total_amount: order.total_amount,
        status: order.status,
        shipping_address: order.shipping_address.clone(),
        created_at: order.created_at,
        lines,
    })
}
