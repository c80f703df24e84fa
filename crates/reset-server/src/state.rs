use std::sync::Arc;

use reset_core::config::ResetConfig;
use reset_core::executor::ResetExecutor;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<ResetExecutor>,
    pub config: Arc<ResetConfig>,
}

impl AppState {
    pub fn new(executor: Arc<ResetExecutor>, config: ResetConfig) -> Self {
        Self {
            executor,
            config: Arc::new(config),
        }
    }
}
