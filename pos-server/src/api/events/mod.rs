//! Lifecycle event stream (SSE)
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/events | GET | 全部事件 |
//! | /api/events?table=N | GET | 单桌事件 (顾客自助视图) |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/events", get(handler::stream))
}
