//! Kitchen Board API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{KITCHEN_ROLES, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/kitchen", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list))
        .route("/orders/{id}/complete", post(handler::complete))
        .layer(middleware::from_fn(require_role(KITCHEN_ROLES)))
}
