//! Shared application state.
//!
//! The single live store connection and its single scan session live
//! behind one async mutex, so page fetches and key operations are strictly
//! sequential. There is no module-level singleton: handlers reach the
//! connection only through this state.

use crate::config::Config;
use crate::gateway::StoreGateway;
use crate::scan::ScanSession;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Mutex<StoreState>>,
}

/// The connection handle and its scan session. At most one of each; a
/// reconnect or disconnect discards the session.
pub struct StoreState {
    pub gateway: StoreGateway,
    pub session: Option<ScanSession>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let gateway = StoreGateway::new(Duration::from_secs(config.connect_timeout_secs));
        AppState {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(StoreState {
                gateway,
                session: None,
            })),
        }
    }
}
