//! Shared types for the POS workspace
//!
//! Common types used by the server and its clients: domain models,
//! error codes and response structures, message bus envelopes and
//! small utilities.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{BusMessage, EventType, LifecycleEvent};
