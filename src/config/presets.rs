//! Built-in schemas for the two collections the service ships with.

use crate::config::{EntitySchema, FieldSpec, FieldType, ValidationRule};
use serde_json::json;

pub const ACTORS: &str = "actors";
pub const SHOWS: &str = "shows";

pub fn actors() -> EntitySchema {
    EntitySchema {
        collection: ACTORS.to_string(),
        id_field: "id".to_string(),
        fields: vec![
            FieldSpec::new("id", FieldType::String).required(),
            FieldSpec::new("name", FieldType::String).required(),
            FieldSpec::new("age", FieldType::Integer).with_rules(ValidationRule {
                minimum: Some(0.0),
                ..Default::default()
            }),
            FieldSpec::new("nationality", FieldType::String),
            FieldSpec::new("knownFor", FieldType::StringList).with_default(json!([])),
            FieldSpec::new("active", FieldType::Boolean).with_default(json!(true)),
        ],
    }
}

pub fn shows() -> EntitySchema {
    EntitySchema {
        collection: SHOWS.to_string(),
        id_field: "id".to_string(),
        fields: vec![
            FieldSpec::new("id", FieldType::String).required(),
            FieldSpec::new("title", FieldType::String).required(),
            FieldSpec::new("genre", FieldType::String),
            FieldSpec::new("year", FieldType::Integer).with_rules(ValidationRule {
                minimum: Some(1900.0),
                maximum: Some(2100.0),
                ..Default::default()
            }),
            FieldSpec::new("rating", FieldType::Number).with_rules(ValidationRule {
                minimum: Some(0.0),
                maximum: Some(10.0),
                ..Default::default()
            }),
            FieldSpec::new("seasons", FieldType::Integer).with_rules(ValidationRule {
                minimum: Some(1.0),
                ..Default::default()
            }),
        ],
    }
}

/// Preset by collection name.
pub fn by_name(name: &str) -> Option<EntitySchema> {
    match name {
        ACTORS => Some(actors()),
        SHOWS => Some(shows()),
        _ => None,
    }
}
