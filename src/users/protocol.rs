use serde::{Deserialize, Serialize};

/// Body of `POST /api/users`.
///
/// `password_hash` is produced by the authentication collaborator; this
/// service stores it opaquely and never returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
}
