//! Entity routes. Both shapes accept every method so the dispatcher owns method matching;
//! unknown paths fall through to the same dispatcher and come back as unmatched routes.

use crate::handlers::entity::{collection, fallback, item};
use crate::state::AppState;
use axum::{routing::any, Router};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/:collection", any(collection))
        .route("/:collection/:id", any(item))
        .fallback(fallback)
        .with_state(state)
}
