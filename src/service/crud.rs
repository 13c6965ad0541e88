//! The five entity operations over an `EntityStore`.
//!
//! Create and Update are check-then-write sequences of two separate store calls. Two concurrent
//! requests for the same id can both pass the check; the later put wins.

use crate::config::EntitySchema;
use crate::error::{AppError, ConfigError};
use crate::model::{Entity, CREATED_AT};
use crate::response::{Outcome, Success};
use crate::service::RequestValidator;
use crate::store::EntityStore;
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct CrudService {
    store: Arc<dyn EntityStore>,
    schema: Arc<EntitySchema>,
    validator: Arc<RequestValidator>,
}

impl CrudService {
    /// Fails when a field pattern in the schema does not compile.
    pub fn new(store: Arc<dyn EntityStore>, schema: Arc<EntitySchema>) -> Result<Self, ConfigError> {
        let validator = Arc::new(RequestValidator::new(schema.clone())?);
        Ok(Self {
            store,
            schema,
            validator,
        })
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub async fn list(&self) -> Outcome {
        let items = self.store.scan_all().await?;
        tracing::debug!(collection = %self.schema.collection, count = items.len(), "list");
        Ok(Success::List(items))
    }

    pub async fn get(&self, id: &str) -> Outcome {
        let entity = self.fetch(id).await?;
        Ok(Success::Found(entity))
    }

    pub async fn create(&self, body: Map<String, Value>) -> Outcome {
        let now = Utc::now();
        let body = self.validator.validate_create(body)?;
        let id = body
            .get(&self.schema.id_field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation(format!("missing required field(s): {}", self.schema.id_field)))?;

        if self.store.get(&id).await?.is_some() {
            return Err(AppError::Conflict { id });
        }

        let mut entity = Entity::new();
        for field in &self.schema.fields {
            if let Some(default) = &field.default {
                entity.insert(field.name.clone(), default.clone());
            }
        }
        for (name, value) in body {
            if value.is_null() {
                continue;
            }
            entity.insert(name, value);
        }
        entity.stamp_created(now);

        self.store.put(&entity).await?;
        tracing::info!(collection = %self.schema.collection, id = %id, "created");
        Ok(Success::Created(entity))
    }

    /// Merges the payload over the stored entity and writes the whole item back.
    pub async fn update(&self, id: &str, body: Map<String, Value>) -> Outcome {
        let now = Utc::now();
        let body = self.validator.validate_update(body)?;
        let stored = self.fetch(id).await?;

        let mut merged = stored.clone();
        for (name, value) in body {
            if value.is_null() {
                merged.remove(&name);
            } else {
                merged.insert(name, value);
            }
        }
        merged.insert(self.schema.id_field.clone(), Value::String(id.to_string()));
        match stored.get(CREATED_AT) {
            Some(created) => {
                merged.insert(CREATED_AT, created.clone());
            }
            None => {
                merged.remove(CREATED_AT);
            }
        }
        merged.stamp_updated(now);

        self.store.put(&merged).await?;
        tracing::info!(collection = %self.schema.collection, id = %id, "updated");
        Ok(Success::Updated(merged))
    }

    pub async fn delete(&self, id: &str) -> Outcome {
        self.fetch(id).await?;
        self.store.delete(id).await?;
        tracing::info!(collection = %self.schema.collection, id = %id, "deleted");
        Ok(Success::Deleted)
    }

    async fn fetch(&self, id: &str) -> Result<Entity, AppError> {
        self.store.get(id).await?.ok_or_else(|| AppError::NotFound {
            collection: self.schema.collection.clone(),
            id: id.to_string(),
        })
    }
}
