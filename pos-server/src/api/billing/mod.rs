//! Billing API (owner only)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{BILLING_ROLES, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/billing", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/clear", post(handler::clear))
        .layer(middleware::from_fn(require_role(BILLING_ROLES)))
}
