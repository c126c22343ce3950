use std::sync::Arc;

use axum::Json;
use axum::extract::Extension;

use super::protocol::{DatabaseConnections, HealthResponse, SwitchResponse};
use super::router::ConnectionRouter;
use super::types::DbRole;

fn online_label(reachable: bool) -> String {
    let label = if reachable { "online" } else { "offline" };
    label.to_string()
}

/// Server status plus probes of both endpoints. Probing never errors, so an
/// unreachable endpoint still yields a 200 with "offline" in the body.
pub async fn handle_health(
    Extension(router): Extension<Arc<ConnectionRouter>>,
) -> Json<HealthResponse> {
    let primary_online = router.probe(DbRole::Primary).await;
    let replica_online = router.probe(DbRole::Replica).await;

    Json(HealthResponse {
        server_status: "online".to_string(),
        database_connections: DatabaseConnections {
            primary: online_label(primary_online),
            replica: online_label(replica_online),
            currently_using: router.active_role().await,
        },
    })
}

pub async fn handle_switch_to_primary(
    Extension(router): Extension<Arc<ConnectionRouter>>,
) -> Json<SwitchResponse> {
    router.switch_to(DbRole::Primary).await;
    Json(SwitchResponse {
        active: DbRole::Primary,
        message: "switched to primary; all new requests will use primary".to_string(),
    })
}

pub async fn handle_switch_to_replica(
    Extension(router): Extension<Arc<ConnectionRouter>>,
) -> Json<SwitchResponse> {
    router.switch_to(DbRole::Replica).await;
    Json(SwitchResponse {
        active: DbRole::Replica,
        message: "switched to replica; all new requests will use replica".to_string(),
    })
}
