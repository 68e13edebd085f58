//! Shared application state for all routes. Read-only after startup.

use crate::config::Settings;
use crate::store::DrugStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DrugStore>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn DrugStore>, settings: Settings) -> Self {
        AppState {
            store,
            settings: Arc::new(settings),
        }
    }
}
