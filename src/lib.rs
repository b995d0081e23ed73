//! LightRAG Bridge
//!
//! Connects LibreChat to a LightRAG proxy over HTTP.
//!
//! # Modules
//!
//! - `multipart`: hand-built `multipart/form-data` bodies
//! - `forward`: single-attempt client for the LightRAG proxy
//! - `hook`: upload hook mirroring host file-intake events
//! - `routes`: HTTP endpoints under `/api/lightrag`

pub mod config;
pub mod envelope;
pub mod error;
pub mod forward;
pub mod hook;
pub mod multipart;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config().lightrag.max_upload_bytes;

    Router::new()
        .nest(routes::API_PREFIX, routes::router(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
