//! Stored entity: a JSON field map with one identifier field and two system timestamps.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Map<String, Value>);

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Identifier value, if present and a string.
    pub fn id(&self, id_field: &str) -> Option<&str> {
        self.get_str(id_field)
    }

    pub fn created_at(&self) -> Option<&str> {
        self.get_str(CREATED_AT)
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.get_str(UPDATED_AT)
    }

    /// Sets both timestamps to the same instant.
    pub fn stamp_created(&mut self, now: DateTime<Utc>) {
        let ts = Value::String(iso_timestamp(now));
        self.insert(CREATED_AT, ts.clone());
        self.insert(UPDATED_AT, ts);
    }

    pub fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.insert(UPDATED_AT, Value::String(iso_timestamp(now)));
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Entity {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        Value::Object(entity.0)
    }
}

/// ISO-8601 UTC at full clock precision, e.g. `2026-10-19T08:15:00.123456789Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
