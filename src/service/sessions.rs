//! Registration, login and current-session lookup.

use super::{RequestValidator, UsersService};
use crate::auth::{hash_password, verify_password, Claims, SessionKeys};
use crate::error::AppError;
use crate::model::{NewUser, Role};
use crate::store::Store;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct SessionService;

impl SessionService {
    /// Creates a `user`-role account and returns its id.
    pub async fn register(store: &dyn Store, form: Registration) -> Result<Uuid, AppError> {
        RequestValidator::require_all(&[
            ("first_name", form.first_name.as_deref()),
            ("last_name", form.last_name.as_deref()),
            ("email", form.email.as_deref()),
            ("password", form.password.as_deref()),
        ])?;
        let (Some(first_name), Some(last_name), Some(email), Some(password)) =
            (form.first_name, form.last_name, form.email, form.password)
        else {
            return Err(AppError::Validation("Incomplete values".into()));
        };
        let email = email.trim().to_string();
        RequestValidator::validate_email(&email)?;

        if UsersService::get_by_email(store, &email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }
        let user = NewUser {
            first_name,
            last_name,
            email,
            password: hash_password(&password).await?,
            role: Role::User,
            pets: Vec::new(),
        };
        let created = UsersService::create(store, user).await?;
        tracing::info!(user_id = %created.id, "user registered");
        Ok(created.id)
    }

    /// Verifies credentials and returns a signed session token.
    pub async fn login(store: &dyn Store, keys: &SessionKeys, creds: Credentials) -> Result<String, AppError> {
        RequestValidator::require_all(&[("email", creds.email.as_deref()), ("password", creds.password.as_deref())])?;
        let (Some(email), Some(password)) = (creds.email, creds.password) else {
            return Err(AppError::Validation("Incomplete values".into()));
        };
        let user = UsersService::get_by_email(store, email.trim())
            .await?
            .ok_or(AppError::NotFound("User"))?;
        if !verify_password(&password, &user.password).await? {
            tracing::info!(user_id = %user.id, "login rejected: incorrect password");
            return Err(AppError::Authentication("Incorrect password".into()));
        }
        let token = keys.issue(&user)?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Claims from the session token; a missing token is unauthorized.
    pub fn current(keys: &SessionKeys, token: Option<&str>) -> Result<Claims, AppError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Authorization("Invalid token".into()))?;
        keys.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UserStore};

    fn keys() -> SessionKeys {
        SessionKeys::new(b"sessions-test", 3600, "coderCookie")
    }

    fn form(email: &str) -> Registration {
        Registration {
            first_name: Some("Lin".into()),
            last_name: Some("Chen".into()),
            email: Some(email.into()),
            password: Some("pa55word".into()),
        }
    }

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials { email: Some(email.into()), password: Some(password.into()) }
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let store = MemoryStore::new();
        SessionService::register(&store, form("lin@example.com")).await.unwrap();
        let err = SessionService::register(&store, form("lin@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn registration_requires_every_field() {
        let store = MemoryStore::new();
        let mut f = form("lin@example.com");
        f.last_name = None;
        assert!(matches!(SessionService::register(&store, f).await, Err(AppError::Validation(_))));
        let bad_email = form("not-an-email");
        assert!(matches!(SessionService::register(&store, bad_email).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn registration_stores_a_hash_and_user_role() {
        let store = MemoryStore::new();
        let id = SessionService::register(&store, form("lin@example.com")).await.unwrap();
        let user = UsersService::get_by_id(&store, id).await.unwrap().unwrap();
        assert_ne!(user.password, "pa55word");
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn login_outcomes() {
        let store = MemoryStore::new();
        let keys = keys();
        SessionService::register(&store, form("lin@example.com")).await.unwrap();

        let token = SessionService::login(&store, &keys, creds("lin@example.com", "pa55word")).await.unwrap();
        let claims = SessionService::current(&keys, Some(&token)).unwrap();
        assert_eq!(claims.name, "Lin Chen");
        assert_eq!(claims.email, "lin@example.com");
        assert_eq!(claims.role, Role::User);

        let wrong = SessionService::login(&store, &keys, creds("lin@example.com", "nope")).await;
        assert!(matches!(wrong, Err(AppError::Authentication(_))));
        let unknown = SessionService::login(&store, &keys, creds("ghost@example.com", "x")).await;
        assert!(matches!(unknown, Err(AppError::NotFound("User"))));
        let incomplete = SessionService::login(&store, &keys, Credentials::default()).await;
        assert!(matches!(incomplete, Err(AppError::Validation(_))));
    }

    #[test]
    fn current_without_token_is_unauthorized() {
        assert!(matches!(SessionService::current(&keys(), None), Err(AppError::Authorization(_))));
        assert!(matches!(SessionService::current(&keys(), Some("")), Err(AppError::Authorization(_))));
        assert!(matches!(SessionService::current(&keys(), Some("a.b.c")), Err(AppError::Authorization(_))));
    }
}
