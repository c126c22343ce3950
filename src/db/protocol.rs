//! Operator Control Surface DTOs
//!
//! Response shapes for the health/status query and the manual switch
//! endpoints. These mirror what a load balancer or an on-call operator needs
//! to see: which endpoint is active, and whether each endpoint answers a
//! probe, independently of the active pointer.

use serde::{Deserialize, Serialize};

use super::types::DbRole;

/// Response to `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub server_status: String,
    pub database_connections: DatabaseConnections,
}

/// Independent reachability of both known endpoints plus the active pointer.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseConnections {
    pub primary: String,
    pub replica: String,
    pub currently_using: DbRole,
}

/// Acknowledgment of a manual switch.
#[derive(Debug, Serialize, Deserialize)]
pub struct SwitchResponse {
    pub active: DbRole,
    pub message: String,
}
