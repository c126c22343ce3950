use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_PORT: u16 = 3306;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Which side of the primary/replica pair an endpoint plays.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DbRole {
    Primary,
    Replica,
}

impl DbRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbRole::Primary => "primary",
            DbRole::Replica => "replica",
        }
    }
}

impl std::fmt::Display for DbRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection parameters for one database endpoint.
///
/// A flat config value, not a hierarchy: the primary and the replica differ
/// only in role and host. `acquire_timeout` bounds both transaction
/// acquisition and plain reads against this endpoint.
#[derive(Debug, Clone)]
pub struct DbEndpoint {
    pub role: DbRole,
    pub host: String,
    pub port: u16,
    pub acquire_timeout: Duration,
}

impl DbEndpoint {
    pub fn new(role: DbRole, host: impl Into<String>, port: u16) -> Self {
        Self {
            role,
            host: host.into(),
            port,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// Reads `DB_HOST_PRIMARY` / `DB_HOST_REPLICA` and `DB_PORT`, with
    /// localhost defaults for single-machine runs.
    pub fn from_env(role: DbRole) -> Self {
        let var = match role {
            DbRole::Primary => "DB_HOST_PRIMARY",
            DbRole::Replica => "DB_HOST_REPLICA",
        };
        let host = std::env::var(var).unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("DB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self::new(role, host, port)
    }

    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{} ({})", self.host, self.port, self.role)
    }
}
