//! Session routes: register, login, current.

use crate::handlers::sessions::{current, login, register};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn sessions_routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/current", get(current))
        .with_state(state)
}
