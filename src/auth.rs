//! Password hashing (Argon2) and signed session tokens (HS256 JWT).

use crate::error::AppError;
use crate::model::{Role, User};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Argon2 is CPU-bound; every hash and verify runs on the blocking pool.
async fn run_blocking<T, F>(job: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::Internal(format!("password task join error: {}", e)))?
}

pub async fn hash_password(plain: &str) -> Result<String, AppError> {
    let plain = plain.to_owned();
    run_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        hash_with_salt(&plain, &salt)
    })
    .await
}

/// Deterministic hash for a fixed salt. Only used for seed placeholders.
pub async fn hash_with_fixed_salt(plain: &str, salt_b64: &str) -> Result<String, AppError> {
    let salt = SaltString::from_b64(salt_b64).map_err(|e| AppError::Internal(format!("salt: {}", e)))?;
    let plain = plain.to_owned();
    run_blocking(move || hash_with_salt(&plain, &salt)).await
}

fn hash_with_salt(plain: &str, salt: &SaltString) -> Result<String, AppError> {
    Argon2::default()
        .hash_password(plain.as_bytes(), salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("password hash: {}", e)))
}

/// `Ok(false)` on mismatch; a stored value that is not a PHC string is an internal error.
pub async fn verify_password(plain: &str, stored: &str) -> Result<bool, AppError> {
    let (plain, stored) = (plain.to_owned(), stored.to_owned());
    run_blocking(move || {
        let parsed = PasswordHash::new(&stored).map_err(|e| AppError::Internal(format!("stored hash: {}", e)))?;
        Ok(Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
    })
    .await
}

/// Identity claims embedded in the session token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub name: String,
    pub role: Role,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
    cookie_name: String,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_secs: i64, cookie_name: impl Into<String>) -> Self {
        SessionKeys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            name: user.full_name(),
            role: user.role,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: now.timestamp().saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token encode: {}", e)))
    }

    /// Signature and expiry are both checked, with no leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "session token rejected");
                AppError::Authorization("Invalid token".into())
            })
    }

    /// Session cookie carrying the token for the token lifetime.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.ttl_secs))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            password: String::new(),
            role: Role::Admin,
            pets: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn keys() -> SessionKeys {
        SessionKeys::new(b"test-secret", 3600, "coderCookie")
    }

    #[tokio::test]
    async fn password_hash_verifies_only_the_original() {
        let hash = hash_password("s3cret").await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn fixed_salt_hash_is_deterministic() {
        let a = hash_with_fixed_salt("coder123", "bW9ja3NlZWRzYWx0").await.unwrap();
        let b = hash_with_fixed_salt("coder123", "bW9ja3NlZWRzYWx0").await.unwrap();
        assert_eq!(a, b);
        assert!(verify_password("coder123", &a).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_internal() {
        let err = verify_password("x", "plaintext").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_leaves_the_runtime_responsive() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_millis(1));
            loop {
                interval.tick().await;
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });

        for _ in 0..3 {
            let hash = hash_password("s3cret").await.unwrap();
            assert!(verify_password("s3cret", &hash).await.unwrap());
        }
        let observed = ticks.load(Ordering::Relaxed);
        ticker.abort();
        assert!(observed >= 3, "runtime starved while hashing: {} ticks", observed);
    }

    #[test]
    fn token_round_trips_identity_claims() {
        let keys = keys();
        let u = user();
        let token = keys.issue(&u).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.name, "Grace Hopper");
        assert_eq!(claims.email, u.email);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let keys = keys();
        let token = keys.issue_at(&user(), Utc::now() - Duration::hours(2)).unwrap();
        assert!(matches!(keys.verify(&token), Err(AppError::Authorization(_))));
    }

    #[test]
    fn tampered_token_is_unauthorized() {
        let token = keys().issue(&user()).unwrap();
        let other = SessionKeys::new(b"another-secret", 3600, "coderCookie");
        assert!(matches!(other.verify(&token), Err(AppError::Authorization(_))));
        let mut flipped = token.clone();
        flipped.push('x');
        assert!(keys().verify(&flipped).is_err());
    }

    #[test]
    fn cookie_carries_name_and_lifetime() {
        let cookie = keys().session_cookie("abc".into());
        assert_eq!(cookie.name(), "coderCookie");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
        assert!(cookie.to_string().contains("HttpOnly"));
    }
}
