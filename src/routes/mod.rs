//! Router assembly: every resource is nested under /api, common routes at the root.

mod common;
mod mocks;
mod resources;
mod sessions;

pub use common::common_routes;
pub use mocks::mocks_routes;
pub use resources::{adoptions_routes, pets_routes, users_routes};
pub use sessions::sessions_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Request bodies above this size are rejected before reaching a handler.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// The full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/users", users_routes(state.clone()))
        .nest("/api/pets", pets_routes(state.clone()))
        .nest("/api/adoptions", adoptions_routes(state.clone()))
        .nest("/api/sessions", sessions_routes(state.clone()))
        .nest("/api/mocks", mocks_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
}
