//! /api/adoptions handlers.

use crate::error::AppError;
use crate::model::AdoptionFilter;
use crate::response::{success_message, success_payload};
use crate::service::{AdoptionWorkflow, AdoptionsService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let adoptions = AdoptionsService::get_all(state.store.as_ref()).await?;
    Ok(success_payload(adoptions))
}

pub async fn read(State(state): State<AppState>, Path(aid): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = RequestValidator::parse_id(&aid)?;
    let adoption = AdoptionsService::get_by(state.store.as_ref(), &AdoptionFilter::Id(id))
        .await?
        .ok_or(AppError::NotFound("Adoption"))?;
    Ok(success_payload(adoption))
}

/// POST /api/adoptions/:uid/:pid: both ids are validated before any lookup.
pub async fn adopt(
    State(state): State<AppState>,
    Path((uid, pid)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = RequestValidator::parse_id(&uid)?;
    let pet_id = RequestValidator::parse_id(&pid)?;
    AdoptionWorkflow::adopt(state.store.as_ref(), user_id, pet_id).await?;
    Ok(success_message("Pet adopted"))
}
