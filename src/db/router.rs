use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::types::DbRole;
use crate::store::memory::MemoryDb;

/// Process-wide pointer to the database endpoint all new operations target.
///
/// One instance per process, passed by reference to whoever needs data
/// access. Callers capture the active endpoint once at the start of an
/// operation (`active()` hands out a cheap `Arc` clone) and complete against
/// it even if a switch happens mid-flight; nothing migrates or cancels
/// in-flight transactions.
///
/// Switching is never automatic. No background task watches the primary;
/// `switch_to` is invoked by an operator or an external health checker.
pub struct ConnectionRouter {
    primary: Arc<MemoryDb>,
    replica: Arc<MemoryDb>,
    active: RwLock<DbRole>,
}

impl ConnectionRouter {
    pub fn new(primary: Arc<MemoryDb>, replica: Arc<MemoryDb>) -> Arc<Self> {
        Arc::new(Self {
            primary,
            replica,
            active: RwLock::new(DbRole::Primary),
        })
    }

    /// Builds the router with startup preference: primary if reachable,
    /// otherwise the replica, otherwise a degraded start on the primary
    /// where individual operations will fail until an endpoint recovers.
    pub async fn connect(primary: Arc<MemoryDb>, replica: Arc<MemoryDb>) -> Arc<Self> {
        let router = Self::new(primary, replica);

        if router.probe(DbRole::Primary).await {
            info!("primary endpoint reachable, using primary");
        } else if router.probe(DbRole::Replica).await {
            tracing::warn!("primary unreachable at startup, falling back to replica");
            router.switch_to(DbRole::Replica).await;
        } else {
            tracing::warn!(
                "neither endpoint reachable at startup, staying on primary (degraded)"
            );
        }

        router
    }

    pub fn endpoint(&self, role: DbRole) -> &Arc<MemoryDb> {
        match role {
            DbRole::Primary => &self.primary,
            DbRole::Replica => &self.replica,
        }
    }

    pub async fn active_role(&self) -> DbRole {
        *self.active.read().await
    }

    /// The endpoint new operations should run against, captured once.
    pub async fn active(&self) -> Arc<MemoryDb> {
        self.endpoint(self.active_role().await).clone()
    }

    /// Redirects all operations that start after this call. The only writer
    /// of the active pointer.
    pub async fn switch_to(&self, role: DbRole) {
        let mut active = self.active.write().await;
        if *active != role {
            info!("switching active database endpoint: {} -> {}", *active, role);
        }
        *active = role;
    }

    /// Reachability of one endpoint. Swallows the underlying error and
    /// reports false; the only router operation that tolerates an
    /// unreachable endpoint.
    pub async fn probe(&self, role: DbRole) -> bool {
        match self.endpoint(role).ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("probe of {} endpoint failed: {}", role, e);
                false
            }
        }
    }
}
