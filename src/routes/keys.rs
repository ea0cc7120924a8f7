//! Key scanning and CRUD endpoints.

use crate::error::AppError;
use crate::models::{
    Envelope, KeyDetail, KeyRequest, ScanRequest, ScanResponse, SearchRequest, SearchResponse,
    SetKeyRequest,
};
use crate::scan::{self, ScanSession};
use crate::state::AppState;
use axum::{extract::State, Json};

/// POST /api/keys/scan — fetch one page of the incremental scan.
///
/// A `restart` flag or a pattern different from the running session's
/// starts a fresh scan from cursor "0"; otherwise the session continues
/// from where the last page left off.
pub async fn scan_keys(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<Envelope<ScanResponse>>, AppError> {
    let pattern = req.pattern.unwrap_or_else(|| "*".to_string());
    let count = req.count.unwrap_or(state.config.scan_page_size);

    let mut store = state.store.lock().await;

    let mut session = match store.session.take() {
        Some(s) if !req.restart && s.pattern() == pattern => s,
        _ => ScanSession::start(&pattern),
    };

    let result = scan::fetch_next_page(&mut store.gateway, &mut session, count).await;
    // The session goes back into state even when the fetch failed: its
    // cursor is unchanged, so the caller can simply retry.
    store.session = Some(session);
    let page = result?;

    Ok(Json(Envelope::ok(ScanResponse {
        keys: page.keys,
        cursor: page.cursor,
        has_more: !page.exhausted,
    })))
}

/// POST /api/keys/search — bulk scan until the cursor cycle completes or
/// the configured result cap truncates it (`complete: false`).
pub async fn search_keys(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Envelope<SearchResponse>>, AppError> {
    let pattern = req.pattern.unwrap_or_else(|| "*".to_string());

    let mut store = state.store.lock().await;
    let outcome = scan::fetch_all(
        &mut store.gateway,
        &pattern,
        state.config.search_max_keys,
        state.config.scan_page_size,
    )
    .await?;

    if !outcome.complete {
        tracing::warn!(
            pattern = %pattern,
            returned = outcome.keys.len(),
            cap = state.config.search_max_keys,
            "Search truncated at result cap"
        );
    }

    Ok(Json(Envelope::ok(SearchResponse {
        keys: outcome.keys,
        complete: outcome.complete,
    })))
}

/// POST /api/keys/details — typed value, TTL, and memory usage for one key.
pub async fn key_details(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<Envelope<KeyDetail>>, AppError> {
    let mut store = state.store.lock().await;
    let detail = store.gateway.get_typed_value(&req.key).await?;
    Ok(Json(Envelope::ok(detail)))
}

/// POST /api/keys/set — write a key with a typed value and optional TTL.
pub async fn set_key(
    State(state): State<AppState>,
    Json(req): Json<SetKeyRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    if req.key.is_empty() {
        return Err(AppError::Validation("key is required".to_string()));
    }

    let mut store = state.store.lock().await;
    store
        .gateway
        .set_typed_value(&req.key, &req.value, req.ttl)
        .await?;

    tracing::debug!(key = %req.key, kind = req.value.kind(), "Key written");
    Ok(Json(Envelope::done()))
}

/// POST /api/keys/delete — delete a key.
pub async fn delete_key(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    let mut store = state.store.lock().await;
    store.gateway.delete(&req.key).await?;

    tracing::debug!(key = %req.key, "Key deleted");
    Ok(Json(Envelope::done()))
}
