//! User CRUD façade.

use crate::auth::hash_password;
use crate::error::AppError;
use crate::model::{NewUser, User, UserFilter, UserPatch};
use crate::store::Store;
use uuid::Uuid;

pub struct UsersService;

impl UsersService {
    pub async fn get_all(store: &dyn Store) -> Result<Vec<User>, AppError> {
        store.list_users().await
    }

    /// First user matching the filter.
    pub async fn get_by(store: &dyn Store, filter: &UserFilter) -> Result<Option<User>, AppError> {
        store.find_user(filter).await
    }

    pub async fn get_by_id(store: &dyn Store, id: Uuid) -> Result<Option<User>, AppError> {
        store.find_user(&UserFilter::Id(id)).await
    }

    pub async fn get_by_email(store: &dyn Store, email: &str) -> Result<Option<User>, AppError> {
        store.find_user(&UserFilter::Email(email.to_string())).await
    }

    pub async fn create(store: &dyn Store, user: NewUser) -> Result<User, AppError> {
        store.insert_user(user).await
    }

    pub async fn create_many(store: &dyn Store, users: Vec<NewUser>) -> Result<Vec<User>, AppError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        store.insert_users(users).await
    }

    /// Returns the post-update user, or `None` when the id is unknown.
    /// A plaintext `password` in the patch is hashed before it is stored.
    pub async fn update(store: &dyn Store, id: Uuid, mut patch: UserPatch) -> Result<Option<User>, AppError> {
        if let Some(plain) = patch.password.take() {
            patch.password = Some(hash_password(&plain).await?);
        }
        store.update_user(id, &patch).await
    }

    pub async fn delete(store: &dyn Store, id: Uuid) -> Result<Option<User>, AppError> {
        store.delete_user(id).await
    }
}
