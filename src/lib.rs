//! adoptme: pet adoption REST backend.
//!
//! Users register and log in, pets are listed and created, and the adoption
//! workflow links a user to an available pet. Persistence goes through the
//! [`store::Store`] trait with PostgreSQL and in-memory implementations.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod mock;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{AppConfig, StorageKind};
pub use error::{AppError, ConfigError};
pub use routes::app;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, MemoryStore, PgStore, Store};
