//! Shared application state for all routes.

use crate::config::{Settings, StatusCodes};
use crate::error::ConfigError;
use crate::service::Rules;
use crate::store::WatchStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WatchStore>,
    pub rules: Arc<Rules>,
    pub status_codes: StatusCodes,
}

impl AppState {
    pub fn new(store: Arc<dyn WatchStore>, settings: &Settings) -> Result<Self, ConfigError> {
        Ok(AppState {
            store,
            rules: Arc::new(Rules::new()?),
            status_codes: settings.status_codes,
        })
    }
}
