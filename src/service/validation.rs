//! Request validation against the entity schema.

use crate::config::{EntitySchema, FieldSpec, ValidationRule};
use crate::error::{AppError, ConfigError};
use crate::model::{CREATED_AT, UPDATED_AT};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Validator for one schema. Field patterns are compiled once, at construction.
pub struct RequestValidator {
    schema: Arc<EntitySchema>,
    patterns: HashMap<String, Regex>,
}

impl RequestValidator {
    pub fn new(schema: Arc<EntitySchema>) -> Result<Self, ConfigError> {
        let mut patterns = HashMap::new();
        for field in &schema.fields {
            if let Some(pattern) = &field.rules.pattern {
                let re = Regex::new(pattern)
                    .map_err(|e| ConfigError::Schema(format!("invalid pattern for {}: {}", field.name, e)))?;
                patterns.insert(field.name.clone(), re);
            }
        }
        Ok(Self { schema, patterns })
    }

    /// Checks a create payload and returns it with system timestamps dropped.
    /// Identifier and required fields must be present and non-empty; every field must be declared.
    pub fn validate_create(&self, body: Map<String, Value>) -> Result<Map<String, Value>, AppError> {
        let schema = &self.schema;
        let body = strip(body, &[CREATED_AT, UPDATED_AT]);

        let missing: Vec<&str> = std::iter::once(schema.id_field.as_str())
            .chain(schema.required_fields().map(|f| f.name.as_str()))
            .filter(|name| is_blank(body.get(*name)))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        for (name, value) in &body {
            let spec = declared(schema, name)?;
            self.validate_field(spec, value)?;
        }
        Ok(body)
    }

    /// Checks an update payload and returns it with the identifier and timestamps dropped.
    /// `null` is accepted for optional fields only.
    pub fn validate_update(&self, body: Map<String, Value>) -> Result<Map<String, Value>, AppError> {
        let schema = &self.schema;
        let body = strip(body, &[schema.id_field.as_str(), CREATED_AT, UPDATED_AT]);
        for (name, value) in &body {
            let spec = declared(schema, name)?;
            if spec.required && is_blank(Some(value)) {
                return Err(AppError::Validation(format!("{} cannot be empty", name)));
            }
            self.validate_field(spec, value)?;
        }
        Ok(body)
    }

    fn validate_field(&self, spec: &FieldSpec, v: &Value) -> Result<(), AppError> {
        if v.is_null() {
            return Ok(());
        }
        let col = spec.name.as_str();
        if !spec.ty.matches(v) {
            return Err(AppError::Validation(format!("{} must be {}", col, spec.ty.describe())));
        }
        let pattern = self.patterns.get(col);
        match v {
            Value::Array(items) => {
                for item in items {
                    validate_rules(col, item, &spec.rules, pattern)?;
                }
                Ok(())
            }
            _ => validate_rules(col, v, &spec.rules, pattern),
        }
    }
}

fn strip(mut body: Map<String, Value>, fields: &[&str]) -> Map<String, Value> {
    for field in fields {
        body.remove(*field);
    }
    body
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn declared<'a>(schema: &'a EntitySchema, name: &str) -> Result<&'a FieldSpec, AppError> {
    schema
        .field(name)
        .ok_or_else(|| AppError::Validation(format!("unknown field: {}", name)))
}

fn validate_rules(
    col: &str,
    v: &Value,
    rule: &ValidationRule,
    pattern: Option<&Regex>,
) -> Result<(), AppError> {
    if let Some(s) = v.as_str() {
        let len = s.chars().count();
        if let Some(max) = rule.max_length {
            if len > max as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    col, max
                )));
            }
        }
        if let Some(min) = rule.min_length {
            if len < min as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at least {} characters",
                    col, min
                )));
            }
        }
        if let Some(re) = pattern {
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} does not match required pattern", col)));
            }
        }
    }
    if let Some(ref allowed) = rule.allowed {
        if !allowed.iter().any(|a| value_eq(v, a)) {
            return Err(AppError::Validation(format!(
                "{} must be one of: {:?}",
                col,
                allowed.iter().take(5).collect::<Vec<_>>()
            )));
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(AppError::Validation(format!("{} must be at least {}", col, min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(AppError::Validation(format!("{} must be at most {}", col, max)));
            }
        }
    }
    Ok(())
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}
