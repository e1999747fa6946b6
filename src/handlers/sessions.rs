//! /api/sessions handlers: register, login (sets the session cookie), current.

use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::response::{success_message, success_payload};
use crate::service::{Credentials, Registration, SessionService};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<Registration>,
) -> Result<impl IntoResponse, AppError> {
    let id = SessionService::register(state.store.as_ref(), form).await?;
    Ok(success_payload(id))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(creds): ApiJson<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let token = SessionService::login(state.store.as_ref(), &state.sessions, creds).await?;
    let cookie = state.sessions.session_cookie(token);
    Ok((jar.add(cookie), success_message("Logged in")))
}

pub async fn current(State(state): State<AppState>, jar: CookieJar) -> Result<impl IntoResponse, AppError> {
    let token = jar.get(state.sessions.cookie_name()).map(|c| c.value().to_string());
    let claims = SessionService::current(&state.sessions, token.as_deref())?;
    Ok(success_payload(claims))
}
