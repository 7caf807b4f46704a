use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use super::Verb;

pub type Headers = BTreeMap<String, String>;

/// A registered mock: the canned response served for `(verb, path)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: Uuid,
    pub verb: Verb,
    pub path: String,
    pub code: u16,
    pub headers: Headers,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Endpoint {
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.verb, &self.path)
    }
}

impl<'r> FromRow<'r, PgRow> for Endpoint {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let verb: String = row.try_get("verb")?;
        let verb = verb.parse::<Verb>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "verb".to_string(),
            source: Box::new(e),
        })?;
        let code: i32 = row.try_get("code")?;
        let code = u16::try_from(code).map_err(|e| sqlx::Error::ColumnDecode {
            index: "code".to_string(),
            source: Box::new(e),
        })?;
        let Json(headers): Json<Headers> = row.try_get("headers")?;

        Ok(Endpoint {
            id: row.try_get("id")?,
            verb,
            path: row.try_get("path")?,
            code,
            headers,
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// A validated endpoint definition, as accepted by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDefinition {
    pub verb: Verb,
    pub path: String,
    pub code: u16,
    pub headers: Headers,
    pub body: String,
}

impl EndpointDefinition {
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.verb, &self.path)
    }
}

/// The uniqueness key of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    pub verb: Verb,
    pub path: String,
}

impl RouteKey {
    pub fn new(verb: Verb, path: &str) -> Self {
        Self {
            verb,
            path: path.to_string(),
        }
    }
}

impl std::fmt::Display for RouteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.verb, self.path)
    }
}
