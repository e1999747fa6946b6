//! /api/users handlers. Update and delete check existence first.

use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::model::UserPatch;
use crate::response::{success_message, success_payload};
use crate::service::{RequestValidator, UsersService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = UsersService::get_all(state.store.as_ref()).await?;
    Ok(success_payload(users))
}

pub async fn read(State(state): State<AppState>, Path(uid): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = RequestValidator::parse_id(&uid)?;
    let user = UsersService::get_by_id(state.store.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(success_payload(user))
}

pub async fn update(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<impl IntoResponse, AppError> {
    let id = RequestValidator::parse_id(&uid)?;
    if let Some(email) = &patch.email {
        RequestValidator::validate_email(email)?;
    }
    let store = state.store.as_ref();
    UsersService::get_by_id(store, id).await?.ok_or(AppError::NotFound("User"))?;
    UsersService::update(store, id, patch).await?;
    Ok(success_message("User updated"))
}

pub async fn delete(State(state): State<AppState>, Path(uid): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = RequestValidator::parse_id(&uid)?;
    let store = state.store.as_ref();
    UsersService::get_by_id(store, id).await?.ok_or(AppError::NotFound("User"))?;
    UsersService::delete(store, id).await?;
    Ok(success_message("User deleted"))
}
