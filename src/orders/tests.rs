//! Order Placement Tests
//!
//! Validates the all-or-nothing transaction: totals, stock accounting,
//! rollback on every failure path, the compensating restoration on cancel,
//! and serialization of concurrent orders competing for the same stock.

#[cfg(test)]
mod tests {
    use crate::catalog::types::Product;
    use crate::db::router::ConnectionRouter;
    use crate::db::types::{DbEndpoint, DbRole};
    use crate::error::StoreError;
    use crate::orders::protocol::{OrderItemRequest, PlaceOrderRequest};
    use crate::orders::service::OrderService;
    use crate::orders::types::OrderStatus;
    use crate::store::memory::MemoryDb;
    use crate::users::types::User;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    fn endpoint(role: DbRole) -> DbEndpoint {
        DbEndpoint::new(role, "127.0.0.1", 0).with_acquire_timeout(Duration::from_millis(500))
    }

    fn product(name: &str, price: Decimal, stock: i64) -> Product {
        Product {
            id: 0,
            name: name.to_string(),
            description: None,
            price,
            stock_quantity: stock,
            category_id: None,
            image_url: None,
        }
    }

    /// Router over a fresh primary/replica pair, seeded with one user and
    /// two products on the primary: Widget at 10.00 (stock 5) and Gadget at
    /// 5.00 (stock 8).
    async fn setup() -> (Arc<ConnectionRouter>, Arc<OrderService>, i64, i64, i64) {
        let primary = MemoryDb::new(endpoint(DbRole::Primary));
        let replica = MemoryDb::new(endpoint(DbRole::Replica));
        let router = ConnectionRouter::connect(primary, replica).await;

        let mut txn = router.endpoint(DbRole::Primary).begin().await.unwrap();
        let user_id = txn.insert_user(User {
            id: 0,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "argon2-hash".to_string(),
            first_name: None,
            last_name: None,
            address: None,
        });
        let widget_id = txn.insert_product(product("Widget", dec!(10.00), 5));
        let gadget_id = txn.insert_product(product("Gadget", dec!(5.00), 8));
        txn.commit();

        let service = Arc::new(OrderService::new(router.clone()));
        (router, service, user_id, widget_id, gadget_id)
    }

    async fn stock_of(router: &ConnectionRouter, product_id: i64) -> i64 {
        router
            .endpoint(DbRole::Primary)
            .read()
            .await
            .unwrap()
            .products
            .get(&product_id)
            .unwrap()
            .stock_quantity
    }

    fn request(user_id: i64, items: Vec<(i64, i64)>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            user_id,
            shipping_address: Some("1 Main St".to_string()),
            items: items
                .into_iter()
                .map(|(product_id, quantity)| OrderItemRequest {
                    product_id,
                    quantity,
                })
                .collect(),
        }
    }

    // ============================================================
    // HAPPY PATH
    // ============================================================

    #[tokio::test]
    async fn test_total_is_sum_of_line_subtotals() {
        let (_, service, user_id, widget_id, gadget_id) = setup().await;

        let order = service
            .place_order(request(user_id, vec![(widget_id, 2), (gadget_id, 1)]))
            .await
            .unwrap();

        assert_eq!(order.total_amount, dec!(25.00));
        let from_lines: Decimal = order
            .lines
            .iter()
            .map(|line| line.price_at_purchase * Decimal::from(line.quantity))
            .sum();
        assert_eq!(order.total_amount, from_lines);
    }

    #[tokio::test]
    async fn test_placement_decrements_stock_and_materializes() {
        let (router, service, user_id, widget_id, gadget_id) = setup().await;

        let order = service
            .place_order(request(user_id, vec![(widget_id, 2), (gadget_id, 3)]))
            .await
            .unwrap();

        assert_eq!(stock_of(&router, widget_id).await, 3);
        assert_eq!(stock_of(&router, gadget_id).await, 5);

        // Read-after-write: resolved user and product summaries.
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user.username, "alice");
        assert_eq!(order.user.email, "alice@example.com");
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].product.as_ref().unwrap().name, "Widget");
        assert_eq!(order.lines[1].product.as_ref().unwrap().name, "Gadget");
        assert_eq!(order.shipping_address.as_deref(), Some("1 Main St"));
    }

    #[tokio::test]
    async fn test_price_snapshot_survives_later_price_change() {
        let (router, service, user_id, widget_id, _) = setup().await;

        let order = service
            .place_order(request(user_id, vec![(widget_id, 1)]))
            .await
            .unwrap();

        let mut txn = router.endpoint(DbRole::Primary).begin().await.unwrap();
        if let Some(widget) = txn.products.get_mut(&widget_id) {
            widget.price = dec!(99.99);
        }
        txn.commit();

        let reread = service.get_order(order.id).await.unwrap();
        assert_eq!(reread.lines[0].price_at_purchase, dec!(10.00));
        assert_eq!(reread.total_amount, dec!(10.00));
    }

    // ============================================================
    // VALIDATION (NO TRANSACTION OPENED)
    // ============================================================

    #[tokio::test]
    async fn test_empty_items_rejected_and_stock_unchanged() {
        let (router, service, user_id, widget_id, gadget_id) = setup().await;

        let err = service
            .place_order(request(user_id, vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidRequest(_)));
        assert_eq!(stock_of(&router, widget_id).await, 5);
        assert_eq!(stock_of(&router, gadget_id).await, 8);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let (router, service, user_id, widget_id, _) = setup().await;

        for quantity in [0, -3] {
            let err = service
                .place_order(request(user_id, vec![(widget_id, quantity)]))
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::InvalidRequest(_)));
        }
        assert_eq!(stock_of(&router, widget_id).await, 5);
    }

    // ============================================================
    // ROLLBACK PATHS
    // ============================================================

    #[tokio::test]
    async fn test_unknown_user_aborts() {
        let (router, service, _, widget_id, _) = setup().await;

        let err = service
            .place_order(request(9999, vec![(widget_id, 1)]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::NotFound {
                entity: "user",
                id: 9999
            }
        );
        assert_eq!(stock_of(&router, widget_id).await, 5);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_earlier_lines() {
        let (router, service, user_id, widget_id, gadget_id) = setup().await;

        // First line is valid and decrements Widget inside the transaction;
        // the second line fails, which must undo that decrement.
        let err = service
            .place_order(request(user_id, vec![(widget_id, 2), (4242, 1)]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::NotFound {
                entity: "product",
                id: 4242
            }
        );
        assert_eq!(stock_of(&router, widget_id).await, 5);
        assert_eq!(stock_of(&router, gadget_id).await, 8);

        let tables = router.endpoint(DbRole::Primary).read().await.unwrap();
        assert!(tables.orders.is_empty());
        assert!(tables.order_lines.is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_stock_carries_details() {
        let (router, service, user_id, widget_id, _) = setup().await;

        let err = service
            .place_order(request(user_id, vec![(widget_id, 6)]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::InsufficientStock {
                product_id: widget_id,
                available: 5,
                requested: 6
            }
        );
        assert_eq!(stock_of(&router, widget_id).await, 5);
    }

    #[tokio::test]
    async fn test_duplicate_product_lines_are_checked_sequentially() {
        let (router, service, user_id, widget_id, _) = setup().await;

        // Stock is 5. Each line fits alone; together they need 6. The
        // second line sees the first decrement and fails on available 2.
        let err = service
            .place_order(request(user_id, vec![(widget_id, 3), (widget_id, 3)]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::InsufficientStock {
                product_id: widget_id,
                available: 2,
                requested: 3
            }
        );
        assert_eq!(stock_of(&router, widget_id).await, 5);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_surfaces_without_redirect() {
        let (router, service, user_id, widget_id, _) = setup().await;
        router.endpoint(DbRole::Primary).set_online(false);

        let err = service
            .place_order(request(user_id, vec![(widget_id, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::EndpointUnreachable(_)));
        // The router still points at the primary; no silent failover.
        assert_eq!(router.active_role().await, DbRole::Primary);
    }

    // ============================================================
    // CANCELLATION
    // ============================================================

    #[tokio::test]
    async fn test_cancel_restores_stock_and_deletes_order() {
        let (router, service, user_id, widget_id, gadget_id) = setup().await;

        let order = service
            .place_order(request(user_id, vec![(widget_id, 2), (gadget_id, 3)]))
            .await
            .unwrap();
        assert_eq!(stock_of(&router, widget_id).await, 3);

        service.cancel_order(order.id).await.unwrap();

        assert_eq!(stock_of(&router, widget_id).await, 5);
        assert_eq!(stock_of(&router, gadget_id).await, 8);

        let err = service.get_order(order.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "order", .. }));

        let tables = router.endpoint(DbRole::Primary).read().await.unwrap();
        assert!(tables.order_lines.is_empty(), "lines cascade with the order");
    }

    #[tokio::test]
    async fn test_cancel_unknown_order_is_not_found() {
        let (_, service, _, _, _) = setup().await;
        let err = service.cancel_order(777).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                entity: "order",
                id: 777
            }
        );
    }

    #[tokio::test]
    async fn test_cancel_skips_products_deleted_after_placement() {
        let (router, service, user_id, widget_id, _) = setup().await;

        let order = service
            .place_order(request(user_id, vec![(widget_id, 2)]))
            .await
            .unwrap();

        let mut txn = router.endpoint(DbRole::Primary).begin().await.unwrap();
        txn.remove_product(widget_id);
        txn.commit();

        // Nothing left to restore, but cancellation still succeeds.
        service.cancel_order(order.id).await.unwrap();
        let tables = router.endpoint(DbRole::Primary).read().await.unwrap();
        assert!(tables.orders.is_empty());
    }

    // ============================================================
    // CONCURRENCY
    // ============================================================

    #[tokio::test]
    async fn test_concurrent_orders_for_last_units_serialize() {
        let (router, service, user_id, widget_id, _) = setup().await;

        // Stock 5, two concurrent requests for 3 each: exactly one wins.
        let first = service.place_order(request(user_id, vec![(widget_id, 3)]));
        let second = service.place_order(request(user_id, vec![(widget_id, 3)]));
        let (a, b) = tokio::join!(first, second);

        assert!(
            a.is_ok() != b.is_ok(),
            "exactly one of the competing orders must succeed"
        );
        let err = if a.is_ok() { b.unwrap_err() } else { a.unwrap_err() };
        match err {
            StoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => {
                assert_eq!(product_id, widget_id);
                assert_eq!(requested, 3);
                assert!(available <= 5);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(stock_of(&router, widget_id).await, 2);
    }

    #[tokio::test]
    async fn test_stock_never_goes_negative_under_contention() {
        let (router, service, user_id, _, gadget_id) = setup().await;

        // Stock 8, twelve concurrent single-unit orders: eight succeed.
        let mut handles = Vec::new();
        for _ in 0..12 {
            let service = service.clone();
            let req = request(user_id, vec![(gadget_id, 1)]);
            handles.push(tokio::spawn(
                async move { service.place_order(req).await },
            ));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 8);
        assert_eq!(stock_of(&router, gadget_id).await, 0);
    }

    // ============================================================
    // READS AND STATUS
    // ============================================================

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let (_, service, user_id, widget_id, gadget_id) = setup().await;

        let first = service
            .place_order(request(user_id, vec![(widget_id, 1)]))
            .await
            .unwrap();
        let second = service
            .place_order(request(user_id, vec![(gadget_id, 1)]))
            .await
            .unwrap();

        let orders = service.list_orders().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, second.id);
        assert_eq!(orders[1].id, first.id);
    }

    #[tokio::test]
    async fn test_status_updates_are_recorded_without_validation() {
        let (_, service, user_id, widget_id, _) = setup().await;

        let order = service
            .place_order(request(user_id, vec![(widget_id, 1)]))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        // Transitions are externally driven; skipping straight to delivered
        // is accepted.
        let updated = service
            .update_status(order.id, OrderStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Delivered);

        let updated = service
            .update_status(order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_status_update_for_unknown_order() {
        let (_, service, _, _, _) = setup().await;
        let err = service
            .update_status(404, OrderStatus::Paid)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "order", .. }));
    }
}
