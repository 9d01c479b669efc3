//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{Bill, DiningTable, MenuSelection, Order, TableOrders};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_CONTACT_LEN_U64, MAX_ORDER_LINES_U64, validate};

#[derive(Debug, Deserialize, Validate)]
pub struct OccupyForm {
    #[validate(length(max = MAX_CONTACT_LEN_U64))]
    pub contact: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlaceOrderForm {
    #[validate(length(max = MAX_ORDER_LINES_U64))]
    pub items: Vec<MenuSelection>,
}

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.lifecycle.tables.list_tables()?;
    Ok(Json(tables))
}

/// GET /api/tables/{number} - 获取单个桌台
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path(number): Path<u32>,
) -> AppResult<Json<DiningTable>> {
    let table = state.lifecycle.tables.get_by_number(number)?;
    Ok(Json(table))
}

/// POST /api/tables/{number}/occupy - 开台
pub async fn occupy(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(number): Path<u32>,
    Json(form): Json<OccupyForm>,
) -> AppResult<Json<DiningTable>> {
    validate(&form)?;
    let table = state.lifecycle.tables.occupy(number, &form.contact)?;
    tracing::debug!(table_number = number, user = %user.username, "Occupy handled");
    Ok(Json(table))
}

/// POST /api/tables/{number}/release - 清台 (丢弃未结订单)
pub async fn release(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(number): Path<u32>,
) -> AppResult<Json<DiningTable>> {
    let table = state.lifecycle.tables.release(number)?;
    tracing::info!(table_number = number, user = %user.username, "Table released by staff");
    Ok(Json(table))
}

/// GET /api/tables/{number}/orders - 桌台当前订单
pub async fn orders(
    State(state): State<ServerState>,
    Path(number): Path<u32>,
) -> AppResult<Json<TableOrders>> {
    let orders = state.lifecycle.intake.orders_for_table(number)?;
    Ok(Json(orders))
}

/// POST /api/tables/{number}/orders - 下单
pub async fn place_order(
    State(state): State<ServerState>,
    Path(number): Path<u32>,
    Json(form): Json<PlaceOrderForm>,
) -> AppResult<Json<Order>> {
    validate(&form)?;
    let intake = &state.lifecycle.intake;
    let items = intake.items_from_catalog(&form.items)?;
    let order = intake.place_order(number, items)?;
    Ok(Json(order))
}

/// POST /api/tables/{number}/billing - 结账 (生成账单并清台)
pub async fn send_to_billing(
    State(state): State<ServerState>,
    Path(number): Path<u32>,
) -> AppResult<Json<Bill>> {
    let bill = state.lifecycle.billing.send_to_billing(number)?;
    Ok(Json(bill))
}
