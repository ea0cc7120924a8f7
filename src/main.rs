//! redlens application entry point.
//!
//! Bootstraps the bridge server for the desktop UI:
//! 1. Load configuration from environment
//! 2. Build shared state (profile registry path + empty store gateway)
//! 3. Build router with API routes + static UI serving
//! 4. Apply response headers middleware
//! 5. Start Axum server
//!
//! No Redis connection is opened at startup; the UI connects explicitly
//! through POST /api/connect.

use redlens::{config::Config, middleware::response_headers, routes, state::AppState};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!("Starting redlens on {}", config.bind_addr);

    let bind_addr = config.bind_addr;
    let state = AppState::new(config);

    // Build router:
    // - API routes (with state)
    // - Static UI bundle serving (fallback)
    // - Response headers middleware
    // Explicit CORS: deny all cross-origin requests; the UI is served from
    // the same origin. CorsLayer::new() with no allowed origins rejects
    // all CORS preflight requests.
    let cors = CorsLayer::new();

    let app = routes::api_router()
        .fallback_service(ServeDir::new("static"))
        .layer(cors)
        .layer(axum::middleware::from_fn(response_headers))
        .with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
