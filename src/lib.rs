//! TV catalog: CRUD REST backend for TV actors and shows over a key-value table.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{load_schema, EntitySchema, Settings, StoreBackend};
pub use dispatch::{route, Dispatcher, Operation, RequestDescriptor};
pub use error::{AppError, ConfigError, StoreError};
pub use model::Entity;
pub use response::{ApiResponse, Outcome, Success};
pub use routes::{app, common_routes, entity_routes};
pub use service::CrudService;
pub use state::AppState;
pub use store::{DynamoStore, EntityStore, MemoryStore};
