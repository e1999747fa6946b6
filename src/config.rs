//! Runtime settings read from the environment (after `.env` is loaded).

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/adoptme";
/// Development-only signing secret used when `JWT_SECRET` is unset.
pub const DEFAULT_JWT_SECRET: &str = "tokenSecretJWT";

/// Upper bound for `SESSION_TTL_SECS` (one year).
pub const MAX_SESSION_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            other => Err(ConfigError::UnknownStorage(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageKind,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub session_cookie: String,
    pub session_ttl_secs: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "0.0.0.0".into(),
            port: 8080,
            storage: StorageKind::Postgres,
            database_url: DEFAULT_DATABASE_URL.into(),
            db_max_connections: 5,
            jwt_secret: DEFAULT_JWT_SECRET.into(),
            session_cookie: "coderCookie".into(),
            session_ttl_secs: 3600,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        Ok(AppConfig {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            storage: match get("STORAGE") {
                Some(v) => v.parse()?,
                None => defaults.storage,
            },
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), defaults.db_max_connections)?,
            jwt_secret,
            session_cookie: match get("SESSION_COOKIE") {
                Some(name) => cookie_name(name)?,
                None => defaults.session_cookie,
            },
            session_ttl_secs: session_ttl(parse_or("SESSION_TTL_SECS", get("SESSION_TTL_SECS"), defaults.session_ttl_secs)?)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn session_ttl(secs: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_SESSION_TTL_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(ConfigError::InvalidValue {
            key: "SESSION_TTL_SECS",
            value: secs.to_string(),
        })
    }
}

/// Cookie names are RFC 6265 tokens: visible ASCII without separators.
fn cookie_name(name: String) -> Result<String, ConfigError> {
    let is_token = |c: char| c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?={}".contains(c);
    if name.chars().all(is_token) {
        Ok(name)
    } else {
        Err(ConfigError::InvalidValue {
            key: "SESSION_COOKIE",
            value: name,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
