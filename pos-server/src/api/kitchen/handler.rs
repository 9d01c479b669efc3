//! Kitchen Board Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Order, OrderStatus};

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: OrderStatus,
}

/// GET /api/kitchen/orders?status=pending|completed
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.lifecycle.kitchen.list_by_status(query.status)?;
    Ok(Json(orders))
}

/// POST /api/kitchen/orders/{id}/complete
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.lifecycle.kitchen.mark_completed(id)?;
    Ok(Json(order))
}
