//! In-process store keeping each collection in insertion order.

use super::{AdoptionStore, PetStore, Store, UserStore};
use crate::error::AppError;
use crate::model::{
    Adoption, AdoptionFilter, AdoptionPatch, NewAdoption, NewPet, NewUser, Pet, PetFilter, PetPatch, User,
    UserFilter, UserPatch,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

const DUPLICATE_EMAIL: &str = "User already exists";

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    pets: Vec<Pet>,
    adoptions: Vec<Adoption>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, AppError> {
        self.inner.read().map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, AppError> {
        self.inner.write().map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }
}

fn materialize_user(new: NewUser) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        first_name: new.first_name,
        last_name: new.last_name,
        email: new.email,
        password: new.password,
        role: new.role,
        pets: new.pets,
        created_at: now,
        updated_at: now,
    }
}

fn materialize_pet(new: NewPet) -> Pet {
    let now = Utc::now();
    Pet {
        id: Uuid::new_v4(),
        name: new.name,
        specie: new.specie,
        birth_date: new.birth_date,
        adopted: new.adopted,
        owner: new.owner,
        image: new.image,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.read()?.users.clone())
    }

    async fn find_user(&self, filter: &UserFilter) -> Result<Option<User>, AppError> {
        Ok(self.read()?.users.iter().find(|u| filter.matches(u)).cloned())
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        Ok(self.read()?.users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut guard = self.write()?;
        if guard.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
        }
        let user = materialize_user(user);
        guard.users.push(user.clone());
        Ok(user)
    }

    async fn insert_users(&self, users: Vec<NewUser>) -> Result<Vec<User>, AppError> {
        let mut guard = self.write()?;
        for (i, user) in users.iter().enumerate() {
            let taken = guard.users.iter().any(|u| u.email == user.email)
                || users.iter().take(i).any(|u| u.email == user.email);
            if taken {
                return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
            }
        }
        let inserted: Vec<User> = users.into_iter().map(materialize_user).collect();
        guard.users.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, AppError> {
        let mut guard = self.write()?;
        if let Some(email) = &patch.email {
            if guard.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
            }
        }
        let Some(user) = guard.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        patch.apply(user);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let mut guard = self.write()?;
        let pos = guard.users.iter().position(|u| u.id == id);
        Ok(pos.map(|i| guard.users.remove(i)))
    }
}

#[async_trait]
impl PetStore for MemoryStore {
    async fn list_pets(&self) -> Result<Vec<Pet>, AppError> {
        Ok(self.read()?.pets.clone())
    }

    async fn find_pet(&self, filter: &PetFilter) -> Result<Option<Pet>, AppError> {
        Ok(self.read()?.pets.iter().find(|p| filter.matches(p)).cloned())
    }

    async fn pets_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Pet>, AppError> {
        Ok(self.read()?.pets.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    }

    async fn insert_pet(&self, pet: NewPet) -> Result<Pet, AppError> {
        let pet = materialize_pet(pet);
        self.write()?.pets.push(pet.clone());
        Ok(pet)
    }

    async fn insert_pets(&self, pets: Vec<NewPet>) -> Result<Vec<Pet>, AppError> {
        let inserted: Vec<Pet> = pets.into_iter().map(materialize_pet).collect();
        self.write()?.pets.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn update_pet(&self, id: Uuid, patch: &PetPatch) -> Result<Option<Pet>, AppError> {
        let mut guard = self.write()?;
        let Some(pet) = guard.pets.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patch.apply(pet);
        pet.updated_at = Utc::now();
        Ok(Some(pet.clone()))
    }

    async fn delete_pet(&self, id: Uuid) -> Result<Option<Pet>, AppError> {
        let mut guard = self.write()?;
        let pos = guard.pets.iter().position(|p| p.id == id);
        Ok(pos.map(|i| guard.pets.remove(i)))
    }
}

#[async_trait]
impl AdoptionStore for MemoryStore {
    async fn list_adoptions(&self) -> Result<Vec<Adoption>, AppError> {
        Ok(self.read()?.adoptions.clone())
    }

    async fn find_adoption(&self, filter: &AdoptionFilter) -> Result<Option<Adoption>, AppError> {
        Ok(self.read()?.adoptions.iter().find(|a| filter.matches(a)).cloned())
    }

    async fn insert_adoption(&self, adoption: NewAdoption) -> Result<Adoption, AppError> {
        let now = Utc::now();
        let adoption = Adoption {
            id: Uuid::new_v4(),
            owner: adoption.owner,
            pet: adoption.pet,
            created_at: now,
            updated_at: now,
        };
        self.write()?.adoptions.push(adoption.clone());
        Ok(adoption)
    }

    async fn update_adoption(&self, id: Uuid, patch: &AdoptionPatch) -> Result<Option<Adoption>, AppError> {
        let mut guard = self.write()?;
        let Some(adoption) = guard.adoptions.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        patch.apply(adoption);
        adoption.updated_at = Utc::now();
        Ok(Some(adoption.clone()))
    }

    async fn delete_adoption(&self, id: Uuid) -> Result<Option<Adoption>, AppError> {
        let mut guard = self.write()?;
        let pos = guard.adoptions.iter().position(|a| a.id == id);
        Ok(pos.map(|i| guard.adoptions.remove(i)))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Test".into(),
            last_name: "User".into(),
            email: email.into(),
            password: "hash".into(),
            role: Role::User,
            pets: vec![],
        }
    }

    fn new_pet(name: &str) -> NewPet {
        NewPet {
            name: name.into(),
            specie: "dog".into(),
            birth_date: Utc::now(),
            adopted: false,
            owner: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@example.com")).await.unwrap();
        let err = store.insert_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bulk_insert_with_duplicates_writes_nothing() {
        let store = MemoryStore::new();
        let err = store
            .insert_users(vec![new_user("x@example.com"), new_user("x@example.com")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_yield_none_for_update_and_delete() {
        let store = MemoryStore::new();
        let patch = PetPatch { name: Some("Rex".into()), ..Default::default() };
        assert!(store.update_pet(Uuid::new_v4(), &patch).await.unwrap().is_none());
        assert!(store.delete_pet(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.delete_user(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_returns_first_match_in_insertion_order() {
        let store = MemoryStore::new();
        let first = store.insert_pet(new_pet("Luna")).await.unwrap();
        store.insert_pet(new_pet("Luna")).await.unwrap();
        let found = store.find_pet(&PetFilter::Name("Luna".into())).await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn update_returns_post_update_record() {
        let store = MemoryStore::new();
        let pet = store.insert_pet(new_pet("Max")).await.unwrap();
        let owner = Uuid::new_v4();
        let patch = PetPatch { adopted: Some(true), owner: Some(owner), ..Default::default() };
        let updated = store.update_pet(pet.id, &patch).await.unwrap().unwrap();
        assert!(updated.adopted);
        assert_eq!(updated.owner, Some(owner));
        assert_eq!(updated.name, "Max");
    }
}
