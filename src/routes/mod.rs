//! Route modules for the LightRAG bridge

pub mod context;
pub mod health;
pub mod lightrag;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Mount point of the plugin routes
pub const API_PREFIX: &str = "/api/lightrag";

/// Build the plugin router (upload, documents, search, health)
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    lightrag::router(max_upload_bytes).route("/health", get(health::health_check))
}
