//! Router assembly: operational routes at the root, the API under `/api/v1`.

mod common;
mod resource;

pub use common::common_routes;
pub use resource::{api_routes, resource_routes};

use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

pub const API_PREFIX: &str = "/api/v1";

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes())
        .nest(API_PREFIX, api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
