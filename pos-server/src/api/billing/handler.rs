//! Billing Ledger Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Bill, BillStatus};

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: BillStatus,
}

/// GET /api/billing?status=pending|cleared
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<Vec<Bill>>> {
    let bills = state.lifecycle.billing.list_by_status(query.status)?;
    Ok(Json(bills))
}

/// GET /api/billing/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Bill>> {
    let bill = state.lifecycle.billing.get_bill(id)?;
    Ok(Json(bill))
}

/// POST /api/billing/{id}/clear
pub async fn clear(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Bill>> {
    let bill = state.lifecycle.billing.mark_cleared(id)?;
    Ok(Json(bill))
}
