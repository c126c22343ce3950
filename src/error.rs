//! Error taxonomy shared by the store, the connection router and the HTTP layer.
//!
//! Every variant maps to exactly one HTTP status so handlers can return
//! `Result<_, StoreError>` and let the `IntoResponse` impl do the marshaling.
//!
//! `EndpointUnreachable` is the retryable class: the caller may retry the same
//! request, but the service never redirects it to the other endpoint on its
//! own. Switching endpoints is always an explicit operator action.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// Malformed input, rejected before any transaction is opened.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A referenced row does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A stock check failed inside the order placement transaction.
    #[error(
        "not enough stock for product {product_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// The endpoint could not be reached or a transaction could not be
    /// acquired within the bounded wait. Retryable after the endpoint
    /// recovers or an operator switches.
    #[error("database endpoint unreachable: {0}")]
    EndpointUnreachable(String),

    /// Commit-level failure. Fatal for the request that hit it.
    #[error("transaction failed: {0}")]
    TransactionFailed(String),
}

impl StoreError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::InvalidRequest(_) | StoreError::InsufficientStock { .. } => {
                StatusCode::BAD_REQUEST
            }
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::EndpointUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::TransactionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
