//! Bridge API route handlers.
//!
//! Every operation takes one JSON argument and returns the uniform
//! `{success, data?, error?}` envelope the UI relies on.

pub mod connection;
pub mod keys;
pub mod profiles;

use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Profile endpoints
        .route(
            "/api/profiles",
            get(profiles::list_profiles).post(profiles::save_profile),
        )
        .route("/api/profiles/delete", post(profiles::delete_profile))
        // Connection endpoints
        .route("/api/connect", post(connection::connect))
        .route("/api/disconnect", post(connection::disconnect))
        // Key endpoints
        .route("/api/keys/scan", post(keys::scan_keys))
        .route("/api/keys/search", post(keys::search_keys))
        .route("/api/keys/details", post(keys::key_details))
        .route("/api/keys/set", post(keys::set_key))
        .route("/api/keys/delete", post(keys::delete_key))
}
