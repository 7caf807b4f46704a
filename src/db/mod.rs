pub mod endpoints;
pub mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::config::{Config, StorageBackend};
use crate::models::{Endpoint, EndpointDefinition, Verb};

pub use endpoints::PgStore;
pub use memory::MemoryStore;

/// Durable CRUD over endpoint records plus lookup by `(verb, path)`.
///
/// Implementations may enforce `(verb, path)` uniqueness themselves and
/// report it as [`StoreError::UniqueViolation`]; the registry still
/// pre-checks before every write.
#[async_trait]
pub trait EndpointStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Endpoint>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Endpoint>, StoreError>;

    async fn find_by_key(&self, verb: Verb, path: &str) -> Result<Option<Endpoint>, StoreError>;

    async fn insert(&self, def: &EndpointDefinition) -> Result<Endpoint, StoreError>;

    /// Replace the definition of `id`. `Ok(None)` if no such record.
    async fn update(
        &self,
        id: Uuid,
        def: &EndpointDefinition,
    ) -> Result<Option<Endpoint>, StoreError>;

    /// `Ok(false)` if no such record.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    UniqueViolation,
    Database(sqlx::Error),
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UniqueViolation => write!(f, "unique constraint on (verb, path) violated"),
            StoreError::Database(err) => write!(f, "database error: {err}"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Open the store selected by `config`: Postgres (migrated on connect)
/// when a database URL is configured, memory otherwise.
pub async fn connect(config: &Config) -> Result<Arc<dyn EndpointStore>, sqlx::Error> {
    match config.storage() {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory endpoint store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(&url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations applied");

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}
