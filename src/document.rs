//! The management API's document envelope and the stored-body sniffing
//! used when serving mocks.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::contract::{self, FieldErrors, RESOURCE_TYPE};
use crate::models::{Endpoint, EndpointDefinition, Headers, Verb};

pub const JSON_API: &str = "application/vnd.api+json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

impl Document<Resource> {
    pub fn one(endpoint: &Endpoint) -> Self {
        Document {
            data: Resource::from(endpoint),
        }
    }
}

impl Document<Vec<Resource>> {
    pub fn many(endpoints: &[Endpoint]) -> Self {
        Document {
            data: endpoints.iter().map(Resource::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Uuid,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub verb: Verb,
    pub path: String,
    pub response: ResponseAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseAttributes {
    pub code: u16,
    pub headers: Headers,
    pub body: String,
}

impl From<&Endpoint> for Resource {
    fn from(endpoint: &Endpoint) -> Self {
        Resource {
            kind: RESOURCE_TYPE.to_string(),
            id: endpoint.id,
            attributes: Attributes {
                verb: endpoint.verb,
                path: endpoint.path.clone(),
                response: ResponseAttributes {
                    code: endpoint.code,
                    headers: endpoint.headers.clone(),
                    body: endpoint.body.clone(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: String,
    pub detail: String,
    /// Nested field errors for contract failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

impl ErrorDocument {
    pub fn single(code: &str, detail: impl Into<String>) -> Self {
        ErrorDocument {
            errors: vec![ErrorObject {
                code: code.to_string(),
                detail: detail.into(),
                source: None,
            }],
        }
    }
}

/// Decode a create/update request body into a validated definition.
pub fn decode_definition(body: &[u8]) -> Result<EndpointDefinition, FieldErrors> {
    let doc: Value = serde_json::from_slice(body).map_err(|_| {
        let mut errors = FieldErrors::default();
        errors.add(&["document"], "must be valid JSON");
        errors
    })?;
    contract::validate(&doc)
}

/// A stored body as it will be served.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBody {
    /// The body parsed as JSON; served re-serialized.
    Structured(Value),
    /// Anything else, served byte for byte.
    Raw(String),
}

impl RenderedBody {
    pub fn sniff(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => RenderedBody::Structured(value),
            Err(_) => RenderedBody::Raw(body.to_string()),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            // A JSON string literal is served as its text, unquoted.
            RenderedBody::Structured(Value::String(text)) => text.into_bytes(),
            // Serializing a `Value` cannot fail.
            RenderedBody::Structured(value) => serde_json::to_vec(&value).unwrap_or_default(),
            RenderedBody::Raw(raw) => raw.into_bytes(),
        }
    }
}
