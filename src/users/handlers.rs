use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;

use super::protocol::CreateUserRequest;
use super::types::User;
use crate::db::router::ConnectionRouter;
use crate::error::StoreError;

pub async fn handle_create_user(
    Extension(router): Extension<Arc<ConnectionRouter>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), StoreError> {
    if req.username.trim().is_empty() || req.email.trim().is_empty() {
        return Err(StoreError::InvalidRequest(
            "username and email are required".to_string(),
        ));
    }

    let db = router.active().await;
    let mut txn = db.begin().await?;

    if txn.username_taken(&req.username) {
        return Err(StoreError::InvalidRequest(format!(
            "username '{}' is already taken",
            req.username
        )));
    }
    if txn.email_taken(&req.email) {
        return Err(StoreError::InvalidRequest(format!(
            "email '{}' is already registered",
            req.email
        )));
    }

    let mut user = User {
        id: 0,
        username: req.username,
        email: req.email,
        password_hash: req.password_hash,
        first_name: req.first_name,
        last_name: req.last_name,
        address: req.address,
    };
    user.id = txn.insert_user(user.clone());
    txn.commit();

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn handle_list_users(
    Extension(router): Extension<Arc<ConnectionRouter>>,
) -> Result<Json<Vec<User>>, StoreError> {
    let db = router.active().await;
    let tables = db.read().await?;
    Ok(Json(tables.users.values().cloned().collect()))
}

pub async fn handle_get_user(
    Extension(router): Extension<Arc<ConnectionRouter>>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, StoreError> {
    let db = router.active().await;
    let tables = db.read().await?;

    let user = tables
        .users
        .get(&user_id)
        .cloned()
        .ok_or(StoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;

    Ok(Json(user))
}

/// Deletes a user and, through the store's cascade rule, all of their
/// orders and order lines.
pub async fn handle_delete_user(
    Extension(router): Extension<Arc<ConnectionRouter>>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, StoreError> {
    let db = router.active().await;
    let mut txn = db.begin().await?;

    txn.remove_user(user_id).ok_or(StoreError::NotFound {
        entity: "user",
        id: user_id,
    })?;

    txn.commit();
    Ok(StatusCode::NO_CONTENT)
}
