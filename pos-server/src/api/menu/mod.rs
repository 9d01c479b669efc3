//! Menu Catalog API (任意登录角色)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/categories", get(handler::categories))
        .route("/{id}", get(handler::get_by_id))
}
