use crate::service::ConfigService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConfigService>,
}
