// File: src/state.rs
// Purpose: Application state shared across handlers

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::config::AppConfig;
use crate::database::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            sessions: SessionStore::new(config.auth.session_ttl()),
            db,
            config: Arc::new(config),
        }
    }
}
