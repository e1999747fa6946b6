//! Adoption workflow: moves a pet from available to adopted and records it.
//!
//! The three writes run one after another without a transaction. A failure
//! after the first write leaves the earlier writes in place.

use super::{AdoptionsService, PetsService, UsersService};
use crate::error::AppError;
use crate::model::{Adoption, NewAdoption, PetFilter, PetPatch, UserPatch};
use crate::store::Store;
use uuid::Uuid;

pub struct AdoptionWorkflow;

impl AdoptionWorkflow {
    /// Preconditions are checked in order: user exists, pet exists, pet not yet adopted.
    pub async fn adopt(store: &dyn Store, user_id: Uuid, pet_id: Uuid) -> Result<Adoption, AppError> {
        let user = UsersService::get_by_id(store, user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        let pet = PetsService::get_by(store, &PetFilter::Id(pet_id))
            .await?
            .ok_or(AppError::NotFound("Pet"))?;
        if pet.adopted {
            return Err(AppError::Conflict("Pet is already adopted".into()));
        }

        let mut pets = user.pets.clone();
        pets.push(pet.id);
        let user_patch = UserPatch { pets: Some(pets), ..Default::default() };
        UsersService::update(store, user.id, user_patch).await?;

        let pet_patch = PetPatch { adopted: Some(true), owner: Some(user.id), ..Default::default() };
        if let Err(e) = PetsService::update(store, pet.id, &pet_patch).await {
            tracing::warn!(user_id = %user.id, pet_id = %pet.id, error = %e, "adoption left partially applied after user update");
            return Err(e);
        }

        let adoption = AdoptionsService::create(store, NewAdoption { owner: user.id, pet: pet.id })
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %user.id, pet_id = %pet.id, error = %e, "adoption record not written after user and pet updates");
                e
            })?;
        tracing::info!(user_id = %user.id, pet_id = %pet.id, adoption_id = %adoption.id, "pet adopted");
        Ok(adoption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewPet, NewUser, Role};
    use crate::store::{AdoptionStore, MemoryStore, PetStore, UserStore};
    use chrono::Utc;

    async fn user(store: &MemoryStore, email: &str) -> Uuid {
        store
            .insert_user(NewUser {
                first_name: "Eva".into(),
                last_name: "Diaz".into(),
                email: email.into(),
                password: "x".into(),
                role: Role::User,
                pets: vec![],
            })
            .await
            .unwrap()
            .id
    }

    async fn pet(store: &MemoryStore) -> Uuid {
        store
            .insert_pet(NewPet {
                name: "Duke".into(),
                specie: "dog".into(),
                birth_date: Utc::now(),
                adopted: false,
                owner: None,
                image: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn adopt_updates_user_pet_and_records_adoption() {
        let store = MemoryStore::new();
        let u = user(&store, "eva@example.com").await;
        let p = pet(&store).await;

        let adoption = AdoptionWorkflow::adopt(&store, u, p).await.unwrap();
        assert_eq!((adoption.owner, adoption.pet), (u, p));

        let user = store.find_user(&crate::model::UserFilter::Id(u)).await.unwrap().unwrap();
        assert_eq!(user.pets, vec![p]);
        let pet = store.find_pet(&PetFilter::Id(p)).await.unwrap().unwrap();
        assert!(pet.adopted);
        assert_eq!(pet.owner, Some(u));
        assert_eq!(store.list_adoptions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn second_adoption_of_same_pet_conflicts() {
        let store = MemoryStore::new();
        let u1 = user(&store, "one@example.com").await;
        let u2 = user(&store, "two@example.com").await;
        let p = pet(&store).await;

        AdoptionWorkflow::adopt(&store, u1, p).await.unwrap();
        let again = AdoptionWorkflow::adopt(&store, u1, p).await.unwrap_err();
        assert!(matches!(again, AppError::Conflict(_)));
        let other = AdoptionWorkflow::adopt(&store, u2, p).await.unwrap_err();
        assert!(matches!(other, AppError::Conflict(_)));
        assert_eq!(store.list_adoptions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_user_wins_over_missing_pet() {
        let store = MemoryStore::new();
        let err = AdoptionWorkflow::adopt(&store, Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("User")));

        let p = pet(&store).await;
        let err = AdoptionWorkflow::adopt(&store, Uuid::new_v4(), p).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("User")));
    }

    #[tokio::test]
    async fn missing_pet_with_valid_user() {
        let store = MemoryStore::new();
        let u = user(&store, "solo@example.com").await;
        let err = AdoptionWorkflow::adopt(&store, u, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("Pet")));
        assert!(store.list_adoptions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seeded_adopted_pet_cannot_be_adopted() {
        let store = MemoryStore::new();
        let u = user(&store, "late@example.com").await;
        let p = store
            .insert_pet(NewPet {
                name: "Zoe".into(),
                specie: "cat".into(),
                birth_date: Utc::now(),
                adopted: true,
                owner: None,
                image: None,
            })
            .await
            .unwrap()
            .id;
        let err = AdoptionWorkflow::adopt(&store, u, p).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
