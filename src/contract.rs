//! Structural validation of proposed endpoint definitions.
//!
//! The inbound envelope is untyped JSON; [`validate`] walks it once,
//! collecting every failure keyed by field path, and only hands back a
//! typed [`EndpointDefinition`] when nothing failed. Each field gets at
//! most one message: the type check runs first and value rules only run
//! on values that passed it.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::models::{EndpointDefinition, Headers, Verb};

pub const RESOURCE_TYPE: &str = "endpoints";

const IS_MISSING: &str = "is missing";
const MUST_BE_FILLED: &str = "must be filled";
const MUST_BE_STRING: &str = "must be a string";
const MUST_BE_HASH: &str = "must be a hash";
const MUST_BE_INTEGER: &str = "must be an integer";

/// Field path -> messages. Paths are document segments from the root,
/// e.g. `["data", "attributes", "verb"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Vec<String>, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, path: &[&str], message: &str) {
        self.0
            .entry(path.iter().map(|s| s.to_string()).collect())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages for a dotted path such as `data.attributes.verb`.
    pub fn get(&self, dotted: &str) -> Option<&[String]> {
        let path: Vec<String> = dotted.split('.').map(str::to_string).collect();
        self.0.get(&path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, &[String])> {
        self.0
            .iter()
            .map(|(path, messages)| (path.join("."), messages.as_slice()))
    }

    /// Render as a tree mirroring the document:
    /// `{"data": {"attributes": {"verb": ["verb is invalid"]}}}`.
    pub fn to_nested(&self) -> Value {
        let mut root = Map::new();
        for (path, messages) in &self.0 {
            let Some((leaf, parents)) = path.split_last() else {
                continue;
            };
            if let Some(node) = descend(&mut root, parents) {
                node.insert(
                    leaf.clone(),
                    Value::Array(messages.iter().cloned().map(Value::String).collect()),
                );
            }
        }
        Value::Object(root)
    }
}

/// Walk (creating as needed) the object at `segments` below `node`.
/// `None` if a segment already holds a non-object.
fn descend<'a>(
    mut node: &'a mut Map<String, Value>,
    segments: &[String],
) -> Option<&'a mut Map<String, Value>> {
    for segment in segments {
        node = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()?;
    }
    Some(node)
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (path, messages) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{path} {}", messages.join(", "))?;
        }
        Ok(())
    }
}

/// Validate `{data: {type, attributes: {verb, path, response: {headers, code, body}}}}`.
pub fn validate(doc: &Value) -> Result<EndpointDefinition, FieldErrors> {
    let mut errors = FieldErrors::default();
    let empty = Map::new();
    let root = doc.as_object().unwrap_or(&empty);

    let data = fetch(&mut errors, Some(root), &["data"])
        .and_then(|v| hash(&mut errors, v, &["data"]));

    let type_path = ["data", "type"];
    if let Some(kind) =
        fetch(&mut errors, data, &type_path).and_then(|v| filled_str(&mut errors, v, &type_path))
    {
        if kind != RESOURCE_TYPE {
            errors.add(&type_path, "this type is not supported");
        }
    }

    let attributes = fetch(&mut errors, data, &["data", "attributes"])
        .and_then(|v| hash(&mut errors, v, &["data", "attributes"]));

    let verb_path = ["data", "attributes", "verb"];
    let verb = fetch(&mut errors, attributes, &verb_path)
        .and_then(|v| filled_str(&mut errors, v, &verb_path))
        .and_then(|s| match s.parse::<Verb>() {
            Ok(verb) => Some(verb),
            Err(_) => {
                errors.add(&verb_path, "verb is invalid");
                None
            }
        });

    let path_path = ["data", "attributes", "path"];
    let path = fetch(&mut errors, attributes, &path_path)
        .and_then(|v| filled_str(&mut errors, v, &path_path));

    let response_path = ["data", "attributes", "response"];
    let response = fetch(&mut errors, attributes, &response_path)
        .and_then(|v| hash(&mut errors, v, &response_path));

    let headers_path = ["data", "attributes", "response", "headers"];
    let headers = fetch(&mut errors, response, &headers_path)
        .and_then(|v| hash(&mut errors, v, &headers_path))
        .and_then(|map| header_values(&mut errors, map));

    let code_path = ["data", "attributes", "response", "code"];
    let code = fetch(&mut errors, response, &code_path)
        .and_then(|v| filled_int(&mut errors, v, &code_path))
        .and_then(|n| match u16::try_from(n) {
            Ok(code) if (100..=599).contains(&code) => Some(code),
            _ => {
                errors.add(&code_path, "must be in range 100-599");
                None
            }
        });

    let body_path = ["data", "attributes", "response", "body"];
    let body = fetch(&mut errors, response, &body_path).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        _ => {
            errors.add(&body_path, MUST_BE_STRING);
            None
        }
    });

    match (verb, path, code, headers, body) {
        (Some(verb), Some(path), Some(code), Some(headers), Some(body)) if errors.is_empty() => {
            Ok(EndpointDefinition {
                verb,
                path: path.to_string(),
                code,
                headers,
                body,
            })
        }
        _ => Err(errors),
    }
}

/// Look up the last segment of `path` in `parent`. A `None` parent
/// already failed and reports nothing further.
fn fetch<'a>(
    errors: &mut FieldErrors,
    parent: Option<&'a Map<String, Value>>,
    path: &[&str],
) -> Option<&'a Value> {
    let parent = parent?;
    let key = path.last()?;
    let value = parent.get(*key);
    if value.is_none() {
        errors.add(path, IS_MISSING);
    }
    value
}

fn hash<'a>(
    errors: &mut FieldErrors,
    value: &'a Value,
    path: &[&str],
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => {
            errors.add(path, MUST_BE_HASH);
            None
        }
    }
}

fn filled_str<'a>(errors: &mut FieldErrors, value: &'a Value, path: &[&str]) -> Option<&'a str> {
    match value {
        Value::Null => {
            errors.add(path, MUST_BE_FILLED);
            None
        }
        Value::String(s) if s.is_empty() => {
            errors.add(path, MUST_BE_FILLED);
            None
        }
        Value::String(s) => Some(s),
        _ => {
            errors.add(path, MUST_BE_STRING);
            None
        }
    }
}

fn filled_int(errors: &mut FieldErrors, value: &Value, path: &[&str]) -> Option<i64> {
    match value {
        Value::Null => {
            errors.add(path, MUST_BE_FILLED);
            None
        }
        Value::Number(n) if n.as_i64().is_some() => n.as_i64(),
        _ => {
            errors.add(path, MUST_BE_INTEGER);
            None
        }
    }
}

fn header_values(errors: &mut FieldErrors, map: &Map<String, Value>) -> Option<Headers> {
    let mut headers = Headers::new();
    let mut valid = true;
    for (name, value) in map {
        match value {
            Value::String(s) => {
                headers.insert(name.clone(), s.clone());
            }
            _ => {
                errors.add(
                    &["data", "attributes", "response", "headers", name.as_str()],
                    MUST_BE_STRING,
                );
                valid = false;
            }
        }
    }
    valid.then_some(headers)
}
