//! Resolve the active entity schema from a preset name or a JSON schema file.

use crate::config::{presets, validate_schema, EntitySchema, Settings};
use crate::error::ConfigError;
use std::path::Path;

/// `SCHEMA_PATH` wins over `ENTITY`. The result is always validated.
pub async fn load_schema(settings: &Settings) -> Result<EntitySchema, ConfigError> {
    let schema = match &settings.schema_path {
        Some(path) => load_schema_file(path).await?,
        None => {
            let schema = presets::by_name(&settings.entity).ok_or_else(|| ConfigError::Invalid {
                key: "ENTITY",
                value: settings.entity.clone(),
            })?;
            validate_schema(&schema)?;
            schema
        }
    };
    tracing::debug!(collection = %schema.collection, fields = schema.fields.len(), "schema loaded");
    Ok(schema)
}

pub async fn load_schema_file(path: &Path) -> Result<EntitySchema, ConfigError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    parse_schema(&raw)
}

pub fn parse_schema(raw: &str) -> Result<EntitySchema, ConfigError> {
    let schema: EntitySchema = serde_json::from_str(raw).map_err(|e| ConfigError::Load(e.to_string()))?;
    validate_schema(&schema)?;
    Ok(schema)
}
