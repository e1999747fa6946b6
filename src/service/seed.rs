//! Generate mock users and pets and persist them.

use super::{PetsService, UsersService};
use crate::error::AppError;
use crate::mock::{generate_pets, generate_users};
use crate::store::Store;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedCounts {
    #[serde(rename = "usersInserted")]
    pub users_inserted: usize,
    #[serde(rename = "petsInserted")]
    pub pets_inserted: usize,
}

pub struct SeedService;

impl SeedService {
    pub async fn seed(store: &dyn Store, users: usize, pets: usize) -> Result<SeedCounts, AppError> {
        let mock_users = generate_users(users).await?;
        let inserted_users = UsersService::create_many(store, mock_users).await?;
        let mock_pets = generate_pets(pets);
        let inserted_pets = PetsService::create_many(store, mock_pets).await?;
        let counts = SeedCounts {
            users_inserted: inserted_users.len(),
            pets_inserted: inserted_pets.len(),
        };
        tracing::info!(users = counts.users_inserted, pets = counts.pets_inserted, "mock data inserted");
        Ok(counts)
    }
}
