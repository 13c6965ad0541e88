//! Router assembly.

mod common;
mod entity;

pub use common::common_routes;
pub use entity::entity_routes;

use crate::response::envelope;
use crate::state::AppState;
use axum::{middleware, Router};
use tower_http::limit::RequestBodyLimitLayer;

/// Common routes plus entity routes, with a request body size limit. Responses the dispatcher
/// never saw (413 from the limit, extractor rejections) still leave in the JSON envelope.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(entity_routes(state))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(middleware::map_response(envelope))
}
