use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::{EndpointStore, StoreError};
use crate::models::{Endpoint, EndpointDefinition, RouteKey, Verb};

/// Authoritative set of endpoint records.
///
/// Reads go straight to the store. Writers take `write_lock`, so the
/// duplicate pre-check and the mutation that follows it run as one
/// critical section: two creates for the same `(verb, path)` can never
/// both pass the check.
pub struct Registry {
    store: Arc<dyn EndpointStore>,
    write_lock: Mutex<()>,
}

#[derive(Debug)]
pub enum RegistryError {
    NotFound(Uuid),
    Duplicate(RouteKey),
    Store(StoreError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotFound(id) => write!(f, "endpoint {id} does not exist"),
            RegistryError::Duplicate(key) => write!(f, "endpoint {key} already exists"),
            RegistryError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        RegistryError::Store(err)
    }
}

impl Registry {
    pub fn new(store: Arc<dyn EndpointStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list(&self) -> Result<Vec<Endpoint>, RegistryError> {
        Ok(self.store.list().await?)
    }

    pub async fn find_by_key(
        &self,
        verb: Verb,
        path: &str,
    ) -> Result<Option<Endpoint>, RegistryError> {
        Ok(self.store.find_by_key(verb, path).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Endpoint>, RegistryError> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn create(&self, def: &EndpointDefinition) -> Result<Endpoint, RegistryError> {
        let _guard = self.write_lock.lock().await;

        if self.store.find_by_key(def.verb, &def.path).await?.is_some() {
            return Err(RegistryError::Duplicate(def.key()));
        }

        let endpoint = self
            .store
            .insert(def)
            .await
            .map_err(|e| duplicate_or_store(e, def))?;

        tracing::info!(id = %endpoint.id, verb = %endpoint.verb, path = %endpoint.path, "endpoint created");
        Ok(endpoint)
    }

    /// Replace the definition of `id` wholesale. A record may keep its own
    /// `(verb, path)`; taking one owned by another record is a duplicate.
    pub async fn update(
        &self,
        id: Uuid,
        def: &EndpointDefinition,
    ) -> Result<Endpoint, RegistryError> {
        let _guard = self.write_lock.lock().await;

        if self.store.find_by_id(id).await?.is_none() {
            return Err(RegistryError::NotFound(id));
        }

        if let Some(owner) = self.store.find_by_key(def.verb, &def.path).await? {
            if owner.id != id {
                return Err(RegistryError::Duplicate(def.key()));
            }
        }

        let endpoint = self
            .store
            .update(id, def)
            .await
            .map_err(|e| duplicate_or_store(e, def))?
            .ok_or(RegistryError::NotFound(id))?;

        tracing::info!(id = %endpoint.id, verb = %endpoint.verb, path = %endpoint.path, "endpoint updated");
        Ok(endpoint)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), RegistryError> {
        let _guard = self.write_lock.lock().await;

        if !self.store.delete(id).await? {
            return Err(RegistryError::NotFound(id));
        }

        tracing::info!(id = %id, "endpoint deleted");
        Ok(())
    }
}

fn duplicate_or_store(err: StoreError, def: &EndpointDefinition) -> RegistryError {
    match err {
        StoreError::UniqueViolation => RegistryError::Duplicate(def.key()),
        other => RegistryError::Store(other),
    }
}
