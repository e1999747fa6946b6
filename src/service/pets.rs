//! Pet CRUD façade.

use crate::error::AppError;
use crate::model::{NewPet, Pet, PetFilter, PetPatch};
use crate::store::Store;
use uuid::Uuid;

pub struct PetsService;

impl PetsService {
    pub async fn get_all(store: &dyn Store) -> Result<Vec<Pet>, AppError> {
        store.list_pets().await
    }

    pub async fn get_by(store: &dyn Store, filter: &PetFilter) -> Result<Option<Pet>, AppError> {
        store.find_pet(filter).await
    }

    pub async fn create(store: &dyn Store, pet: NewPet) -> Result<Pet, AppError> {
        store.insert_pet(pet).await
    }

    pub async fn create_many(store: &dyn Store, pets: Vec<NewPet>) -> Result<Vec<Pet>, AppError> {
        if pets.is_empty() {
            return Ok(Vec::new());
        }
        store.insert_pets(pets).await
    }

    pub async fn update(store: &dyn Store, id: Uuid, patch: &PetPatch) -> Result<Option<Pet>, AppError> {
        store.update_pet(id, patch).await
    }

    pub async fn delete(store: &dyn Store, id: Uuid) -> Result<Option<Pet>, AppError> {
        store.delete_pet(id).await
    }
}
