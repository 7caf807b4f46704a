use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EndpointStore, StoreError};
use crate::models::{Endpoint, EndpointDefinition, Verb};

pub async fn list(pool: &PgPool) -> Result<Vec<Endpoint>, sqlx::Error> {
    sqlx::query_as::<_, Endpoint>("SELECT * FROM endpoints ORDER BY created_at, id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Endpoint>, sqlx::Error> {
    sqlx::query_as::<_, Endpoint>("SELECT * FROM endpoints WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_key(
    pool: &PgPool,
    verb: Verb,
    path: &str,
) -> Result<Option<Endpoint>, sqlx::Error> {
    sqlx::query_as::<_, Endpoint>("SELECT * FROM endpoints WHERE verb = $1 AND path = $2")
        .bind(verb.as_str())
        .bind(path)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, def: &EndpointDefinition) -> Result<Endpoint, sqlx::Error> {
    sqlx::query_as::<_, Endpoint>(
        "INSERT INTO endpoints (id, verb, path, code, headers, body)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(def.verb.as_str())
    .bind(&def.path)
    .bind(i32::from(def.code))
    .bind(Json(&def.headers))
    .bind(&def.body)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    def: &EndpointDefinition,
) -> Result<Option<Endpoint>, sqlx::Error> {
    sqlx::query_as::<_, Endpoint>(
        "UPDATE endpoints SET verb = $2, path = $3, code = $4, headers = $5, body = $6, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(def.verb.as_str())
    .bind(&def.path)
    .bind(i32::from(def.code))
    .bind(Json(&def.headers))
    .bind(&def.body)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM endpoints WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Postgres-backed store. `(verb, path)` uniqueness is also enforced by a
/// unique index, surfaced as [`StoreError::UniqueViolation`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EndpointStore for PgStore {
    async fn list(&self) -> Result<Vec<Endpoint>, StoreError> {
        Ok(list(&self.pool).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Endpoint>, StoreError> {
        Ok(find_by_id(&self.pool, id).await?)
    }

    async fn find_by_key(&self, verb: Verb, path: &str) -> Result<Option<Endpoint>, StoreError> {
        Ok(find_by_key(&self.pool, verb, path).await?)
    }

    async fn insert(&self, def: &EndpointDefinition) -> Result<Endpoint, StoreError> {
        Ok(create(&self.pool, def).await?)
    }

    async fn update(
        &self,
        id: Uuid,
        def: &EndpointDefinition,
    ) -> Result<Option<Endpoint>, StoreError> {
        Ok(update(&self.pool, id, def).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(delete(&self.pool, id).await?)
    }
}
