//! /api/pets handlers. Update and delete do not check that the pet exists.

use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::model::{birth_date, NewPet, PetPatch};
use crate::response::{success_message, success_payload};
use crate::service::{PetsService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePet {
    pub name: Option<String>,
    pub specie: Option<String>,
    #[serde(rename = "birthDate")]
    pub birth_date: Option<String>,
    pub image: Option<String>,
}

impl CreatePet {
    /// Presence of `name`, `specie` and `birthDate` is required; `adopted` always starts false.
    pub fn into_new_pet(self) -> Result<NewPet, AppError> {
        RequestValidator::require_all(&[
            ("name", self.name.as_deref()),
            ("specie", self.specie.as_deref()),
            ("birthDate", self.birth_date.as_deref()),
        ])?;
        let (Some(name), Some(specie), Some(raw_date)) = (self.name, self.specie, self.birth_date) else {
            return Err(AppError::Validation("Incomplete values".into()));
        };
        let birth_date =
            birth_date::parse(&raw_date).ok_or_else(|| AppError::Validation(format!("Invalid birthDate: {}", raw_date)))?;
        Ok(NewPet {
            name,
            specie,
            birth_date,
            adopted: false,
            owner: None,
            image: self.image,
        })
    }
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let pets = PetsService::get_all(state.store.as_ref()).await?;
    Ok(success_payload(pets))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreatePet>,
) -> Result<impl IntoResponse, AppError> {
    let pet = body.into_new_pet()?;
    let created = PetsService::create(state.store.as_ref(), pet).await?;
    Ok(success_payload(created))
}

pub async fn update(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    ApiJson(patch): ApiJson<PetPatch>,
) -> Result<impl IntoResponse, AppError> {
    let id = RequestValidator::parse_id(&pid)?;
    PetsService::update(state.store.as_ref(), id, &patch).await?;
    Ok(success_message("Pet updated"))
}

pub async fn delete(State(state): State<AppState>, Path(pid): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = RequestValidator::parse_id(&pid)?;
    PetsService::delete(state.store.as_ref(), id).await?;
    Ok(success_message("Pet deleted"))
}
