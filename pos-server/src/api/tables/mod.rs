//! Dining Table API 模块
//!
//! Waiter floor: occupancy, order intake and sending a table to billing.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{FLOOR_ROLES, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{number}", get(handler::get_by_number))
        .route("/{number}/occupy", post(handler::occupy))
        .route("/{number}/release", post(handler::release))
        .route(
            "/{number}/orders",
            get(handler::orders).post(handler::place_order),
        )
        .route("/{number}/billing", post(handler::send_to_billing))
        .layer(middleware::from_fn(require_role(FLOOR_ROLES)))
}
