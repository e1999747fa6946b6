//! Shared application state for all routes.

use crate::auth::SessionKeys;
use crate::config::AppConfig;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Persistence handle, opened once at startup and closed on shutdown.
    pub store: Arc<dyn Store>,
    pub sessions: Arc<SessionKeys>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, sessions: SessionKeys) -> Self {
        AppState {
            store,
            sessions: Arc::new(sessions),
        }
    }

    pub fn from_config(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        Self::new(
            store,
            SessionKeys::new(config.jwt_secret.as_bytes(), config.session_ttl_secs, config.session_cookie.clone()),
        )
    }
}
