use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::config::{AppConfig, MAX_LIST_LIMIT};
use crate::database::Store;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenVerifier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        let tokens = TokenVerifier::new(config.security.jwt_secret.clone());
        Self {
            store,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }

    pub fn list_limit(&self) -> i64 {
        self.config.api.list_limit.clamp(1, MAX_LIST_LIMIT)
    }
}
