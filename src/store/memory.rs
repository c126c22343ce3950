use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};
use tokio::time::timeout;

use super::tables::Tables;
use crate::db::types::DbEndpoint;
use crate::error::StoreError;

/// Upper bound on a connectivity probe so health checks never stall startup
/// or an operator-triggered status request.
pub const PING_TIMEOUT: Duration = Duration::from_millis(500);

/// One database endpoint: the full table set guarded by a single writer lock.
///
/// A transaction holds the write half for its whole lifetime, so concurrent
/// units of work on the same endpoint serialize: two orders competing for
/// the last unit of a product run their check-and-decrement one after the
/// other. Plain reads take the read half and see only committed state.
///
/// `online` models reachability of the underlying endpoint. Tests and the
/// failover drill flip it; while offline, `begin` and `ping` fail with
/// [`StoreError::EndpointUnreachable`] and everything else is untouched.
pub struct MemoryDb {
    endpoint: DbEndpoint,
    tables: Arc<RwLock<Tables>>,
    online: AtomicBool,
}

impl MemoryDb {
    pub fn new(endpoint: DbEndpoint) -> Arc<Self> {
        Arc::new(Self {
            endpoint,
            tables: Arc::new(RwLock::new(Tables::default())),
            online: AtomicBool::new(true),
        })
    }

    pub fn endpoint(&self) -> &DbEndpoint {
        &self.endpoint
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Lightweight connectivity check, bounded by [`PING_TIMEOUT`].
    pub async fn ping(&self) -> Result<(), StoreError> {
        if !self.is_online() {
            return Err(StoreError::EndpointUnreachable(self.endpoint.address()));
        }
        timeout(PING_TIMEOUT, self.tables.read())
            .await
            .map_err(|_| StoreError::EndpointUnreachable(self.endpoint.address()))?;
        Ok(())
    }

    /// Opens a transaction, waiting at most the endpoint's `acquire_timeout`
    /// for the writer lock. A timeout surfaces as a retryable
    /// [`StoreError::EndpointUnreachable`] rather than blocking the caller
    /// indefinitely.
    pub async fn begin(&self) -> Result<Transaction, StoreError> {
        if !self.is_online() {
            return Err(StoreError::EndpointUnreachable(self.endpoint.address()));
        }

        let guard = timeout(
            self.endpoint.acquire_timeout,
            self.tables.clone().write_owned(),
        )
        .await
        .map_err(|_| {
            StoreError::EndpointUnreachable(format!(
                "{}: transaction not acquired within {:?}",
                self.endpoint.address(),
                self.endpoint.acquire_timeout
            ))
        })?;

        tracing::debug!("transaction opened against {}", self.endpoint.address());

        let snapshot = (*guard).clone();
        Ok(Transaction {
            guard,
            snapshot,
            committed: false,
        })
    }

    /// Read-only access to committed state, bounded by `acquire_timeout`.
    pub async fn read(&self) -> Result<OwnedRwLockReadGuard<Tables>, StoreError> {
        if !self.is_online() {
            return Err(StoreError::EndpointUnreachable(self.endpoint.address()));
        }
        timeout(
            self.endpoint.acquire_timeout,
            self.tables.clone().read_owned(),
        )
        .await
        .map_err(|_| StoreError::EndpointUnreachable(self.endpoint.address()))
    }
}

/// An open unit of work against one endpoint.
///
/// Mutations go directly to the live tables while the exclusive guard is
/// held, so nothing becomes visible to readers until the guard drops.
/// `commit` publishes; dropping without commit restores the begin-time
/// snapshot. Rollback is a memory swap and cannot fail.
pub struct Transaction {
    guard: OwnedRwLockWriteGuard<Tables>,
    snapshot: Tables,
    committed: bool,
}

impl Transaction {
    pub fn commit(mut self) {
        self.committed = true;
        tracing::debug!("transaction committed");
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("committed", &self.committed)
            .finish_non_exhaustive()
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            *self.guard = std::mem::take(&mut self.snapshot);
            tracing::debug!("transaction rolled back");
        }
    }
}

impl Deref for Transaction {
    type Target = Tables;

    fn deref(&self) -> &Tables {
        &self.guard
    }
}

impl DerefMut for Transaction {
    fn deref_mut(&mut self) -> &mut Tables {
        &mut self.guard
    }
}
