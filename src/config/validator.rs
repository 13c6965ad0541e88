//! Schema validation: identifier declaration, field uniqueness, reserved names, rule sanity.

use crate::config::{EntitySchema, FieldType};
use crate::error::ConfigError;
use crate::model::{CREATED_AT, UPDATED_AT};
use regex::Regex;
use std::collections::HashSet;

pub fn validate_schema(schema: &EntitySchema) -> Result<(), ConfigError> {
    if schema.collection.is_empty()
        || !schema
            .collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Schema(format!(
            "collection '{}' must be a non-empty path segment",
            schema.collection
        )));
    }

    let mut names = HashSet::new();
    for field in &schema.fields {
        if !names.insert(field.name.as_str()) {
            return Err(ConfigError::Schema(format!("duplicate field: {}", field.name)));
        }
        if field.name == CREATED_AT || field.name == UPDATED_AT {
            return Err(ConfigError::Schema(format!("field name is reserved: {}", field.name)));
        }
        if let Some(pattern) = &field.rules.pattern {
            Regex::new(pattern)
                .map_err(|e| ConfigError::Schema(format!("invalid pattern for {}: {}", field.name, e)))?;
        }
        if let Some(default) = &field.default {
            if !field.ty.matches(default) {
                return Err(ConfigError::Schema(format!(
                    "default for {} must be {}",
                    field.name,
                    field.ty.describe()
                )));
            }
        }
    }

    let id = schema.field(&schema.id_field).ok_or_else(|| {
        ConfigError::Schema(format!("identifier field '{}' is not declared", schema.id_field))
    })?;
    if id.ty != FieldType::String {
        return Err(ConfigError::Schema(format!(
            "identifier field '{}' must be a string",
            schema.id_field
        )));
    }
    if id.default.is_some() {
        return Err(ConfigError::Schema(format!(
            "identifier field '{}' cannot have a default",
            schema.id_field
        )));
    }
    if schema.required_fields().next().is_none() {
        return Err(ConfigError::Schema(format!(
            "collection '{}' must declare a required field besides '{}'",
            schema.collection, schema.id_field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{presets, FieldSpec, ValidationRule};
    use serde_json::json;

    fn schema_with(fields: Vec<FieldSpec>) -> EntitySchema {
        EntitySchema {
            collection: "episodes".into(),
            id_field: "id".into(),
            fields,
        }
    }

    #[test]
    fn test_missing_identifier() {
        let schema = schema_with(vec![FieldSpec::new("title", FieldType::String)]);
        let err = validate_schema(&schema).unwrap_err();
        assert!(err.to_string().contains("identifier field 'id' is not declared"));
    }

    #[test]
    fn test_requires_second_mandatory_field() {
        let schema = schema_with(vec![
            FieldSpec::new("id", FieldType::String).required(),
            FieldSpec::new("title", FieldType::String),
        ]);
        let err = validate_schema(&schema).unwrap_err();
        assert!(err.to_string().contains("must declare a required field besides 'id'"));
    }

    #[test]
    fn test_identifier_must_be_string() {
        let schema = schema_with(vec![FieldSpec::new("id", FieldType::Integer)]);
        assert!(validate_schema(&schema).is_err());
    }

    #[test]
    fn test_duplicate_field() {
        let schema = schema_with(vec![
            FieldSpec::new("id", FieldType::String),
            FieldSpec::new("title", FieldType::String),
            FieldSpec::new("title", FieldType::String),
        ]);
        assert!(validate_schema(&schema).unwrap_err().to_string().contains("duplicate field"));
    }

    #[test]
    fn test_reserved_timestamp_name() {
        let schema = schema_with(vec![
            FieldSpec::new("id", FieldType::String),
            FieldSpec::new("createdAt", FieldType::String),
        ]);
        assert!(validate_schema(&schema).unwrap_err().to_string().contains("reserved"));
    }

    #[test]
    fn test_bad_pattern() {
        let schema = schema_with(vec![
            FieldSpec::new("id", FieldType::String).with_rules(ValidationRule {
                pattern: Some("([a-z".into()),
                ..Default::default()
            }),
        ]);
        assert!(validate_schema(&schema).is_err());
    }

    #[test]
    fn test_default_type_mismatch() {
        let schema = schema_with(vec![
            FieldSpec::new("id", FieldType::String),
            FieldSpec::new("title", FieldType::String).required(),
            FieldSpec::new("active", FieldType::Boolean).with_default(json!("yes")),
        ]);
        assert!(validate_schema(&schema).is_err());
    }

    #[test]
    fn test_collection_must_be_path_segment() {
        let mut schema = presets::shows();
        schema.collection = "tv/shows".into();
        assert!(validate_schema(&schema).is_err());
    }
}
