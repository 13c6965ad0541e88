//! Entity store gateway: the only owner of persisted entity state.

mod dynamo;
mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::model::Entity;
use async_trait::async_trait;

/// Key-value table access. Each call is treated as atomic; nothing here retries.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn scan_all(&self) -> Result<Vec<Entity>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Entity>, StoreError>;

    /// Full-item overwrite.
    async fn put(&self, entity: &Entity) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
