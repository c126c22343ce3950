//! Connection Router Tests
//!
//! Validates the active-endpoint pointer: startup preference, explicit
//! switching, tolerant probing, and the capture-at-start guarantee for
//! in-flight transactions.

#[cfg(test)]
mod tests {
    use crate::catalog::types::Product;
    use crate::db::router::ConnectionRouter;
    use crate::db::types::{DbEndpoint, DbRole};
    use crate::error::StoreError;
    use crate::store::memory::MemoryDb;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    fn endpoint(role: DbRole) -> DbEndpoint {
        DbEndpoint::new(role, "127.0.0.1", 0).with_acquire_timeout(Duration::from_millis(200))
    }

    fn pair() -> (Arc<MemoryDb>, Arc<MemoryDb>) {
        (
            MemoryDb::new(endpoint(DbRole::Primary)),
            MemoryDb::new(endpoint(DbRole::Replica)),
        )
    }

    fn sample_product() -> Product {
        Product {
            id: 0,
            name: "Widget".to_string(),
            description: None,
            price: dec!(1.00),
            stock_quantity: 1,
            category_id: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_starts_on_primary_when_reachable() {
        let (primary, replica) = pair();
        let router = ConnectionRouter::connect(primary, replica).await;
        assert_eq!(router.active_role().await, DbRole::Primary);
    }

    #[tokio::test]
    async fn test_falls_back_to_replica_when_primary_down() {
        let (primary, replica) = pair();
        primary.set_online(false);

        let router = ConnectionRouter::connect(primary, replica).await;
        assert_eq!(router.active_role().await, DbRole::Replica);
    }

    #[tokio::test]
    async fn test_degraded_start_when_both_down() {
        let (primary, replica) = pair();
        primary.set_online(false);
        replica.set_online(false);

        let router = ConnectionRouter::connect(primary, replica).await;
        // Degraded: stays on primary, operations fail individually.
        assert_eq!(router.active_role().await, DbRole::Primary);
        assert!(matches!(
            router.active().await.begin().await.unwrap_err(),
            StoreError::EndpointUnreachable(_)
        ));
    }

    #[tokio::test]
    async fn test_switch_to_redirects_new_operations() {
        let (primary, replica) = pair();
        let router = ConnectionRouter::connect(primary, replica).await;

        router.switch_to(DbRole::Replica).await;
        assert_eq!(router.active_role().await, DbRole::Replica);

        router.switch_to(DbRole::Primary).await;
        assert_eq!(router.active_role().await, DbRole::Primary);
    }

    #[tokio::test]
    async fn test_probe_swallows_unreachable_endpoint() {
        let (primary, replica) = pair();
        replica.set_online(false);
        let router = ConnectionRouter::connect(primary, replica).await;

        assert!(router.probe(DbRole::Primary).await);
        assert!(!router.probe(DbRole::Replica).await);
    }

    #[tokio::test]
    async fn test_in_flight_transaction_completes_against_captured_endpoint() {
        let (primary, replica) = pair();
        let router = ConnectionRouter::connect(primary, replica).await;

        // Operation captures the active endpoint, then a switch happens
        // while its transaction is still open.
        let captured = router.active().await;
        let mut txn = captured.begin().await.unwrap();
        router.switch_to(DbRole::Replica).await;

        txn.insert_product(sample_product());
        txn.commit();

        // The write landed on the endpoint captured at start.
        let primary_tables = router.endpoint(DbRole::Primary).read().await.unwrap();
        assert_eq!(primary_tables.products.len(), 1);

        let replica_tables = router.endpoint(DbRole::Replica).read().await.unwrap();
        assert!(replica_tables.products.is_empty());

        // New operations target the replica.
        assert_eq!(router.active_role().await, DbRole::Replica);
    }

    #[tokio::test]
    async fn test_active_is_not_auto_redirected_when_unreachable() {
        let (primary, replica) = pair();
        let router = ConnectionRouter::connect(primary.clone(), replica).await;

        primary.set_online(false);

        // Active endpoint failing does not move the pointer; the error
        // surfaces to the caller until an explicit switch.
        assert!(router.active().await.begin().await.is_err());
        assert_eq!(router.active_role().await, DbRole::Primary);

        router.switch_to(DbRole::Replica).await;
        assert!(router.active().await.begin().await.is_ok());
    }
}
