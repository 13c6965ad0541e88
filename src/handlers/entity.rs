//! Entity handlers: translate axum requests into request descriptors for the dispatcher.

use crate::dispatch::RequestDescriptor;
use crate::error::{AppError, ConfigError};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, Uri},
};
use tracing::Instrument;

fn body_text(body: Bytes) -> Result<Option<String>, AppError> {
    if body.is_empty() {
        return Ok(None);
    }
    String::from_utf8(body.to_vec())
        .map(Some)
        .map_err(|_| AppError::Validation("request body must be UTF-8".into()))
}

/// One inbound entity request, before routing.
struct Inbound {
    method: Method,
    uri: Uri,
    template: String,
    id: Option<String>,
    body: Bytes,
}

async fn serve(state: AppState, inbound: Inbound) -> ApiResponse {
    let Inbound {
        method,
        uri,
        template,
        id,
        body,
    } = inbound;
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("request", %request_id, method = %method, path = %uri.path());
    async move {
        let response = match (&state.dispatcher, body_text(body)) {
            (None, _) => ApiResponse::from_error(&AppError::Config(ConfigError::Missing("TABLE_NAME"))),
            (Some(_), Err(e)) => ApiResponse::from_error(&e),
            (Some(dispatcher), Ok(body)) => {
                let mut request = RequestDescriptor::new(method.as_str(), template);
                if let Some(id) = id {
                    request = request.with_id(id);
                }
                request.body = body;
                dispatcher.handle(&request).await
            }
        };
        tracing::info!(status = response.status_code, "completed");
        response
    }
    .instrument(span)
    .await
}

/// Any method on `/:collection`.
pub async fn collection(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Path(collection): Path<String>,
    body: Bytes,
) -> ApiResponse {
    let inbound = Inbound {
        method,
        uri,
        template: format!("/{}", collection),
        id: None,
        body,
    };
    serve(state, inbound).await
}

/// Any method on `/:collection/:id`.
pub async fn item(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Path((collection, id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResponse {
    let inbound = Inbound {
        method,
        uri,
        template: format!("/{}/{{id}}", collection),
        id: Some(id),
        body,
    };
    serve(state, inbound).await
}

/// Every other path; the dispatcher reports it as an unmatched route.
pub async fn fallback(State(state): State<AppState>, method: Method, uri: Uri, body: Bytes) -> ApiResponse {
    let inbound = Inbound {
        template: uri.path().to_string(),
        method,
        uri,
        id: None,
        body,
    };
    serve(state, inbound).await
}
