use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;

use super::protocol::{PlaceOrderRequest, UpdateStatusRequest};
use super::service::OrderService;
use super::types::OrderView;
use crate::error::StoreError;

pub async fn handle_place_order(
    Extension(orders): Extension<Arc<OrderService>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderView>), StoreError> {
    let order = orders.place_order(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn handle_list_orders(
    Extension(orders): Extension<Arc<OrderService>>,
) -> Result<Json<Vec<OrderView>>, StoreError> {
    Ok(Json(orders.list_orders().await?))
}

pub async fn handle_get_order(
    Extension(orders): Extension<Arc<OrderService>>,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderView>, StoreError> {
    Ok(Json(orders.get_order(order_id).await?))
}

pub async fn handle_update_order_status(
    Extension(orders): Extension<Arc<OrderService>>,
    Path(order_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderView>, StoreError> {
    Ok(Json(orders.update_status(order_id, req.status).await?))
}

pub async fn handle_cancel_order(
    Extension(orders): Extension<Arc<OrderService>>,
    Path(order_id): Path<i64>,
) -> Result<StatusCode, StoreError> {
    orders.cancel_order(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
