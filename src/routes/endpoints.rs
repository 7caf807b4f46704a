use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::document::{self, Document, JSON_API};
use crate::error::AppError;
use crate::media_type::JsonApiRequest;
use crate::state::SharedState;

pub async fn list(
    _: JsonApiRequest,
    State(state): State<SharedState>,
) -> Result<Response, AppError> {
    let endpoints = state.registry.list().await?;
    Ok(json_api(StatusCode::OK, &Document::many(&endpoints)))
}

pub async fn create(
    _: JsonApiRequest,
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let def = document::decode_definition(&body)?;
    let endpoint = state.registry.create(&def).await?;

    let mut response = json_api(StatusCode::CREATED, &Document::one(&endpoint));
    match HeaderValue::from_str(&endpoint.path) {
        Ok(location) => {
            response.headers_mut().insert(LOCATION, location);
        }
        Err(_) => tracing::warn!(path = %endpoint.path, "path is not a valid Location header"),
    }
    Ok(response)
}

pub async fn update(
    _: JsonApiRequest,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    state
        .registry
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;

    let def = document::decode_definition(&body)?;
    let endpoint = state.registry.update(id, &def).await?;

    Ok(json_api(StatusCode::OK, &Document::one(&endpoint)))
}

pub async fn delete(
    _: JsonApiRequest,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.registry.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ids that are not UUIDs cannot name a record.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse::<Uuid>()
        .map_err(|_| AppError::NotFound(raw.to_string()))
}

fn json_api<T: Serialize>(status: StatusCode, document: &T) -> Response {
    match serde_json::to_vec(document) {
        Ok(body) => (status, [(CONTENT_TYPE, JSON_API)], body).into_response(),
        Err(e) => AppError::Internal(format!("failed to encode document: {e}")).into_response(),
    }
}
