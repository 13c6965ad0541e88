//! Response envelope: status code, headers and a JSON string body.

use crate::error::AppError;
use crate::model::Entity;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;

/// Successful operation results, one per operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Success {
    List(Vec<Entity>),
    Found(Entity),
    Created(Entity),
    Updated(Entity),
    Deleted,
}

pub type Outcome = Result<Success, AppError>;

#[derive(Serialize)]
pub struct ListBody<'a> {
    pub items: &'a [Entity],
    pub count: usize,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn default_headers() -> BTreeMap<String, String> {
    [
        ("Access-Control-Allow-Headers", "Content-Type"),
        ("Access-Control-Allow-Methods", "GET,POST,PUT,DELETE,OPTIONS"),
        ("Access-Control-Allow-Origin", "*"),
        ("Content-Type", "application/json"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self::raw(status, body),
            Err(e) => {
                tracing::error!(error = %e, "response serialization failed");
                Self::message(StatusCode::INTERNAL_SERVER_ERROR, crate::error::SERVER_FAULT_MESSAGE)
            }
        }
    }

    pub fn message(status: StatusCode, message: &str) -> Self {
        let body = serde_json::to_string(&MessageBody { message })
            .unwrap_or_else(|_| String::from(r#"{"message":"internal server error"}"#));
        Self::raw(status, body)
    }

    pub fn empty(status: StatusCode) -> Self {
        Self::raw(status, String::new())
    }

    fn raw(status: StatusCode, body: String) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: default_headers(),
            body,
        }
    }

    pub fn from_success(success: &Success) -> Self {
        match success {
            Success::List(items) => Self::json(
                StatusCode::OK,
                &ListBody {
                    items,
                    count: items.len(),
                },
            ),
            Success::Found(entity) | Success::Updated(entity) => Self::json(StatusCode::OK, entity),
            Success::Created(entity) => Self::json(StatusCode::CREATED, entity),
            Success::Deleted => Self::empty(StatusCode::NO_CONTENT),
        }
    }

    /// Server faults are logged here with full detail; the body only carries the generic message.
    pub fn from_error(error: &AppError) -> Self {
        if error.is_server_fault() {
            tracing::error!(error = %error, "request failed");
        } else {
            tracing::debug!(error = %error, status = error.status().as_u16(), "request rejected");
        }
        Self::message(error.status(), &error.public_message())
    }

    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Ok(success) => Self::from_success(success),
            Err(error) => Self::from_error(error),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        if !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        response
    }
}

/// Largest framework rejection text carried into the message body.
const REJECTION_TEXT_LIMIT: usize = 4096;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .map(|v| v.as_bytes().starts_with(b"application/json"))
        .unwrap_or(false)
}

/// Outermost response layer. Plain-text errors produced outside the dispatcher (body limit,
/// extractor rejections) are rewritten as `{"message": ..}`, and every response gets the
/// default CORS and content-type headers it does not already carry.
pub async fn envelope(response: Response) -> Response {
    let (mut parts, body) = response.into_parts();
    let body = if parts.status.is_success() || is_json(&parts.headers) {
        body
    } else {
        let text = to_bytes(body, REJECTION_TEXT_LIMIT)
            .await
            .ok()
            .and_then(|b| String::from_utf8(b.to_vec()).ok())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| parts.status.canonical_reason().unwrap_or("request failed").to_string());
        tracing::debug!(status = parts.status.as_u16(), message = %text, "request rejected before dispatch");
        parts.headers.remove(header::CONTENT_TYPE);
        parts.headers.remove(header::CONTENT_LENGTH);
        Body::from(ApiResponse::message(parts.status, &text).body)
    };
    for (name, value) in default_headers() {
        if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            parts.headers.entry(name).or_insert(value);
        }
    }
    Response::from_parts(parts, body)
}
