//! Typed errors and their status mapping.

use axum::http::StatusCode;
use thiserror::Error;

/// User-visible message for every 500 response. Fault detail only goes to the log.
pub const SERVER_FAULT_MESSAGE: &str = "internal server error";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing setting: {0}")]
    Missing(&'static str),
    #[error("invalid setting {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("schema: {0}")]
    Schema(String),
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("dynamodb: {0}")]
    Dynamo(String),
    #[error("item codec: {0}")]
    Codec(#[from] serde_dynamo::Error),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("item has no '{0}' key attribute")]
    MissingKey(String),
}

/// Terminal outcome kinds for a request. None of them are retried.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{collection} item with id '{id}' not found")]
    NotFound { collection: String, id: String },
    #[error("item with id '{id}' already exists")]
    Conflict { id: String },
    #[error("no route for {method} {path}")]
    UnmatchedRoute { method: String, path: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UnmatchedRoute { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_fault(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Store(_))
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        if self.is_server_fault() {
            SERVER_FAULT_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::validation(AppError::Validation("name is required".into()), 400)]
    #[case::not_found(AppError::NotFound { collection: "actors".into(), id: "a1".into() }, 404)]
    #[case::conflict(AppError::Conflict { id: "a1".into() }, 409)]
    #[case::unmatched(AppError::UnmatchedRoute { method: "PATCH".into(), path: "/actors".into() }, 400)]
    #[case::config(AppError::Config(ConfigError::Missing("TABLE_NAME")), 500)]
    #[case::store(AppError::Store(StoreError::Dynamo("throttled".into())), 500)]
    fn test_status(#[case] error: AppError, #[case] expected: u16) {
        assert_eq!(error.status().as_u16(), expected);
    }

    #[test]
    fn test_server_fault_message_hides_detail() {
        let error = AppError::Store(StoreError::Dynamo("ResourceNotFoundException: table tv-actors".into()));
        assert_eq!(error.public_message(), SERVER_FAULT_MESSAGE);
    }

    #[test]
    fn test_client_messages_name_the_subject() {
        let error = AppError::NotFound { collection: "shows".into(), id: "s9".into() };
        assert_eq!(error.public_message(), "shows item with id 's9' not found");
        let error = AppError::UnmatchedRoute { method: "PATCH".into(), path: "/shows".into() };
        assert_eq!(error.public_message(), "no route for PATCH /shows");
    }
}
