//! Connection lifecycle endpoints.

use crate::error::AppError;
use crate::models::{ConnectionProfile, Envelope};
use crate::registry;
use crate::state::AppState;
use axum::{extract::State, Json};

/// POST /api/connect — open a connection to the given profile.
///
/// Replaces any live connection (the old one is dropped first) and
/// discards the running scan session, whose cursor belonged to the old
/// connection.
pub async fn connect(
    State(state): State<AppState>,
    Json(profile): Json<ConnectionProfile>,
) -> Result<Json<Envelope<()>>, AppError> {
    registry::validate(&profile)?;

    let mut store = state.store.lock().await;
    store.session = None;
    store.gateway.connect(&profile).await?;

    tracing::info!(
        profile = %profile.name,
        host = %profile.host,
        port = profile.port,
        "Connected to Redis"
    );
    Ok(Json(Envelope::done()))
}

/// POST /api/disconnect — drop the live connection, if any.
pub async fn disconnect(
    State(state): State<AppState>,
) -> Result<Json<Envelope<()>>, AppError> {
    let mut store = state.store.lock().await;
    store.session = None;
    store.gateway.disconnect();

    tracing::info!("Disconnected from Redis");
    Ok(Json(Envelope::done()))
}
