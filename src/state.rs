//! Shared application state for all routes. Holds no entity data between requests.

use crate::config::EntitySchema;
use crate::error::ConfigError;
use crate::dispatch::Dispatcher;
use crate::service::CrudService;
use crate::store::EntityStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no table is configured; entity routes then answer 500 before routing.
    pub dispatcher: Option<Arc<Dispatcher>>,
}

impl AppState {
    pub fn new(store: Arc<dyn EntityStore>, schema: EntitySchema) -> Result<Self, ConfigError> {
        let service = CrudService::new(store, Arc::new(schema))?;
        Ok(Self {
            dispatcher: Some(Arc::new(Dispatcher::new(service))),
        })
    }

    pub fn unconfigured() -> Self {
        Self { dispatcher: None }
    }
}
