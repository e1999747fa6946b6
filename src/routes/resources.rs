//! Resource routes for users, pets and adoptions.

use crate::handlers::{adoptions, pets, users};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn users_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(users::list))
        .route("/:uid", get(users::read).put(users::update).delete(users::delete))
        .with_state(state)
}

pub fn pets_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(pets::list).post(pets::create))
        .route("/:pid", put(pets::update).delete(pets::delete))
        .with_state(state)
}

pub fn adoptions_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(adoptions::list))
        .route("/:aid", get(adoptions::read))
        .route("/:uid/:pid", post(adoptions::adopt))
        .with_state(state)
}
