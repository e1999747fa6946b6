//! Adoption CRUD façade. Reads resolve `owner` and `pet` into embedded records
//! through batch lookups by id.

use crate::error::AppError;
use crate::model::{Adoption, AdoptionFilter, AdoptionPatch, AdoptionView, NewAdoption, Pet, User};
use crate::store::Store;
use std::collections::HashMap;
use uuid::Uuid;

pub struct AdoptionsService;

impl AdoptionsService {
    pub async fn get_all(store: &dyn Store) -> Result<Vec<AdoptionView>, AppError> {
        let adoptions = store.list_adoptions().await?;
        Self::resolve(store, adoptions).await
    }

    pub async fn get_by(store: &dyn Store, filter: &AdoptionFilter) -> Result<Option<AdoptionView>, AppError> {
        let Some(adoption) = store.find_adoption(filter).await? else {
            return Ok(None);
        };
        Ok(Self::resolve(store, vec![adoption]).await?.pop())
    }

    pub async fn create(store: &dyn Store, adoption: NewAdoption) -> Result<Adoption, AppError> {
        store.insert_adoption(adoption).await
    }

    pub async fn update(store: &dyn Store, id: Uuid, patch: &AdoptionPatch) -> Result<Option<Adoption>, AppError> {
        store.update_adoption(id, patch).await
    }

    pub async fn delete(store: &dyn Store, id: Uuid) -> Result<Option<Adoption>, AppError> {
        store.delete_adoption(id).await
    }

    /// Replace reference ids with the referenced records, preserving order.
    async fn resolve(store: &dyn Store, adoptions: Vec<Adoption>) -> Result<Vec<AdoptionView>, AppError> {
        let mut owner_ids: Vec<Uuid> = adoptions.iter().map(|a| a.owner).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();
        let mut pet_ids: Vec<Uuid> = adoptions.iter().map(|a| a.pet).collect();
        pet_ids.sort_unstable();
        pet_ids.dedup();

        let owners: HashMap<Uuid, User> = store
            .users_by_ids(&owner_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let pets: HashMap<Uuid, Pet> = store
            .pets_by_ids(&pet_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(adoptions
            .into_iter()
            .map(|a| AdoptionView {
                id: a.id,
                owner: owners.get(&a.owner).cloned(),
                pet: pets.get(&a.pet).cloned(),
                created_at: a.created_at,
                updated_at: a.updated_at,
            })
            .collect())
    }
}
