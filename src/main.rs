use axum::{
    Router,
    routing::{get, post, put},
};
use std::net::SocketAddr;
use std::sync::Arc;
use storefront::catalog::handlers::{
    handle_create_category, handle_create_product, handle_delete_category, handle_delete_product,
    handle_get_category, handle_get_product, handle_list_categories, handle_list_products,
    handle_update_product,
};
use storefront::db::handlers::{
    handle_health, handle_switch_to_primary, handle_switch_to_replica,
};
use storefront::db::router::ConnectionRouter;
use storefront::db::types::{DbEndpoint, DbRole};
use storefront::orders::handlers::{
    handle_cancel_order, handle_get_order, handle_list_orders, handle_place_order,
    handle_update_order_status,
};
use storefront::orders::service::OrderService;
use storefront::store::memory::MemoryDb;
use storefront::users::handlers::{
    handle_create_user, handle_delete_user, handle_get_user, handle_list_users,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // 1. Database endpoints (one store per endpoint):
    let primary = MemoryDb::new(DbEndpoint::from_env(DbRole::Primary));
    let replica = MemoryDb::new(DbEndpoint::from_env(DbRole::Replica));
    tracing::info!("primary endpoint: {}", primary.endpoint().address());
    tracing::info!("replica endpoint: {}", replica.endpoint().address());

    // 2. Connection router (prefers primary, falls back to replica):
    let router = ConnectionRouter::connect(primary, replica).await;
    tracing::info!("active endpoint: {}", router.active_role().await);

    // 3. Order service:
    let orders = Arc::new(OrderService::new(router.clone()));

    // 4. HTTP router:
    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/switch-to-primary", post(handle_switch_to_primary))
        .route("/switch-to-replica", post(handle_switch_to_replica))
        .route("/api/orders", post(handle_place_order).get(handle_list_orders))
        .route("/api/orders/:id", get(handle_get_order).delete(handle_cancel_order))
        .route("/api/orders/:id/status", put(handle_update_order_status))
        .route(
            "/api/products",
            post(handle_create_product).get(handle_list_products),
        )
        .route(
            "/api/products/:id",
            get(handle_get_product)
                .put(handle_update_product)
                .delete(handle_delete_product),
        )
        .route(
            "/api/categories",
            post(handle_create_category).get(handle_list_categories),
        )
        .route(
            "/api/categories/:id",
            get(handle_get_category).delete(handle_delete_category),
        )
        .route("/api/users", post(handle_create_user).get(handle_list_users))
        .route(
            "/api/users/:id",
            get(handle_get_user).delete(handle_delete_user),
        )
        .layer(axum::extract::Extension(router))
        .layer(axum::extract::Extension(orders));

    // 5. Start HTTP server:
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000u16);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("HTTP server listening on {}", addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
