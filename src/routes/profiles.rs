//! Connection profile endpoints.
//!
//! Profiles never touch the live connection; they are pure registry CRUD.
//! Mutations return the updated list so the UI can refresh in one round
//! trip.

use crate::error::AppError;
use crate::models::{ConnectionProfile, DeleteProfileRequest, Envelope};
use crate::registry;
use crate::state::AppState;
use axum::{extract::State, Json};

/// GET /api/profiles — list saved profiles.
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<ConnectionProfile>>>, AppError> {
    let profiles = registry::load(&state.config.profiles_path).await?;
    Ok(Json(Envelope::ok(profiles)))
}

/// POST /api/profiles — save a profile (keyed by name: replaces or appends).
pub async fn save_profile(
    State(state): State<AppState>,
    Json(profile): Json<ConnectionProfile>,
) -> Result<Json<Envelope<Vec<ConnectionProfile>>>, AppError> {
    let name = profile.name.clone();
    let profiles = registry::upsert(&state.config.profiles_path, profile).await?;
    tracing::info!(profile = %name, "Saved connection profile");
    Ok(Json(Envelope::ok(profiles)))
}

/// POST /api/profiles/delete — delete a profile by name (no-op if absent).
pub async fn delete_profile(
    State(state): State<AppState>,
    Json(req): Json<DeleteProfileRequest>,
) -> Result<Json<Envelope<Vec<ConnectionProfile>>>, AppError> {
    let profiles = registry::delete(&state.config.profiles_path, &req.name).await?;
    tracing::info!(profile = %req.name, "Deleted connection profile");
    Ok(Json(Envelope::ok(profiles)))
}
