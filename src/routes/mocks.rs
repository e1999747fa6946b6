//! Mock-data routes.

use crate::handlers::mocks::{generate_data, mocking_pets, mocking_users};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn mocks_routes(state: AppState) -> Router {
    Router::new()
        .route("/mockingpets", get(mocking_pets))
        .route("/mockingusers", get(mocking_users))
        .route("/generateData", post(generate_data))
        .with_state(state)
}
