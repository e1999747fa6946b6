//! Persistence seam. Services depend on [`Store`]; PostgreSQL backs production,
//! the in-memory store backs tests and `STORAGE=memory` runs.
//!
//! `update_*` and `delete_*` return `Ok(None)` for an unknown id instead of an error.

use crate::error::AppError;
use crate::model::{
    Adoption, AdoptionFilter, AdoptionPatch, NewAdoption, NewPet, NewUser, Pet, PetFilter, PetPatch, User,
    UserFilter, UserPatch,
};
use async_trait::async_trait;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, ensure_tables, PgStore};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn find_user(&self, filter: &UserFilter) -> Result<Option<User>, AppError>;
    /// Batch lookup used to resolve adoption owners.
    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn insert_users(&self, users: Vec<NewUser>) -> Result<Vec<User>, AppError>;
    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, AppError>;
    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait PetStore: Send + Sync {
    async fn list_pets(&self) -> Result<Vec<Pet>, AppError>;
    async fn find_pet(&self, filter: &PetFilter) -> Result<Option<Pet>, AppError>;
    /// Batch lookup used to resolve adopted pets.
    async fn pets_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Pet>, AppError>;
    async fn insert_pet(&self, pet: NewPet) -> Result<Pet, AppError>;
    async fn insert_pets(&self, pets: Vec<NewPet>) -> Result<Vec<Pet>, AppError>;
    async fn update_pet(&self, id: Uuid, patch: &PetPatch) -> Result<Option<Pet>, AppError>;
    async fn delete_pet(&self, id: Uuid) -> Result<Option<Pet>, AppError>;
}

#[async_trait]
pub trait AdoptionStore: Send + Sync {
    async fn list_adoptions(&self) -> Result<Vec<Adoption>, AppError>;
    async fn find_adoption(&self, filter: &AdoptionFilter) -> Result<Option<Adoption>, AppError>;
    async fn insert_adoption(&self, adoption: NewAdoption) -> Result<Adoption, AppError>;
    async fn update_adoption(&self, id: Uuid, patch: &AdoptionPatch) -> Result<Option<Adoption>, AppError>;
    async fn delete_adoption(&self, id: Uuid) -> Result<Option<Adoption>, AppError>;
}

#[async_trait]
pub trait Store: UserStore + PetStore + AdoptionStore {
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
    /// Releases connections on shutdown.
    async fn close(&self);
}
