use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::{EndpointStore, StoreError};
use crate::models::{Endpoint, EndpointDefinition, RouteKey, Verb};

/// In-process store: records by id plus a `(verb, path)` index.
///
/// Lock order is always index first, records second, and no index guard
/// is held across another index access.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<Uuid, Endpoint>,
    /// (verb, path) -> id
    keys: DashMap<RouteKey, Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl EndpointStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Endpoint>, StoreError> {
        let mut endpoints: Vec<Endpoint> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        endpoints.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(endpoints)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Endpoint>, StoreError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_key(&self, verb: Verb, path: &str) -> Result<Option<Endpoint>, StoreError> {
        let Some(id) = self.keys.get(&RouteKey::new(verb, path)).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, def: &EndpointDefinition) -> Result<Endpoint, StoreError> {
        match self.keys.entry(def.key()) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let endpoint = Endpoint {
                    id: Uuid::now_v7(),
                    verb: def.verb,
                    path: def.path.clone(),
                    code: def.code,
                    headers: def.headers.clone(),
                    body: def.body.clone(),
                    created_at: now,
                    updated_at: now,
                };
                self.records.insert(endpoint.id, endpoint.clone());
                slot.insert(endpoint.id);
                Ok(endpoint)
            }
        }
    }

    async fn update(
        &self,
        id: Uuid,
        def: &EndpointDefinition,
    ) -> Result<Option<Endpoint>, StoreError> {
        let Some(old_key) = self.records.get(&id).map(|entry| entry.value().key()) else {
            return Ok(None);
        };

        let new_key = def.key();
        match self.keys.entry(new_key.clone()) {
            Entry::Occupied(owner) if *owner.get() != id => {
                return Err(StoreError::UniqueViolation);
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        if old_key != new_key {
            self.keys.remove_if(&old_key, |_, owner| *owner == id);
        }

        let Some(mut entry) = self.records.get_mut(&id) else {
            // Deleted underneath us; release the key we just claimed.
            self.keys.remove_if(&new_key, |_, owner| *owner == id);
            return Ok(None);
        };
        let endpoint = entry.value_mut();
        endpoint.verb = def.verb;
        endpoint.path = def.path.clone();
        endpoint.code = def.code;
        endpoint.headers = def.headers.clone();
        endpoint.body = def.body.clone();
        endpoint.updated_at = Utc::now();
        Ok(Some(endpoint.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let Some((_, endpoint)) = self.records.remove(&id) else {
            return Ok(false);
        };
        self.keys.remove_if(&endpoint.key(), |_, owner| *owner == id);
        Ok(true)
    }
}
