use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::contract::FieldErrors;
use crate::db::StoreError;
use crate::document::{ErrorDocument, ErrorObject, JSON_API};
use crate::registry::RegistryError;

#[derive(Debug)]
pub enum AppError {
    /// Unknown endpoint id on a management route.
    NotFound(String),
    /// No mock registered for the requested path.
    PageNotFound(String),
    Validation(FieldErrors),
    Duplicate,
    UnsupportedMediaType,
    Internal(String),
    Store(StoreError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(id) => write!(f, "Not Found: endpoint {id}"),
            AppError::PageNotFound(path) => write!(f, "Not Found: page {path}"),
            AppError::Validation(errors) => write!(f, "Validation Error: {errors}"),
            AppError::Duplicate => write!(f, "Validation Error: endpoint already exists"),
            AppError::UnsupportedMediaType => write!(f, "Unsupported Media Type"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Store(err) => write!(f, "Store Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, document, content_type) = match self {
            AppError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorDocument::single(
                    "not_found",
                    format!("Requested Endpoint with ID {id} does not exist"),
                ),
                JSON_API,
            ),
            AppError::PageNotFound(path) => (
                StatusCode::NOT_FOUND,
                ErrorDocument::single(
                    "not_found",
                    format!("Requested page {path} does not exist"),
                ),
                "application/json",
            ),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDocument {
                    errors: vec![ErrorObject {
                        code: "validation_error".to_string(),
                        detail: "Request does not satisfy the endpoint contract".to_string(),
                        source: Some(errors.to_nested()),
                    }],
                },
                JSON_API,
            ),
            AppError::Duplicate => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDocument::single("validation_error", "Requested Endpoint already exist"),
                JSON_API,
            ),
            AppError::UnsupportedMediaType => {
                return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                internal_server_error()
            }
            AppError::Store(err) => {
                tracing::error!("Store error: {err}");
                internal_server_error()
            }
        };

        let body = serde_json::to_vec(&document).unwrap_or_default();
        (status, [(CONTENT_TYPE, content_type)], body).into_response()
    }
}

fn internal_server_error() -> (StatusCode, ErrorDocument, &'static str) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorDocument::single("internal_server_error", "Internal Server Error"),
        JSON_API,
    )
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => AppError::NotFound(id.to_string()),
            RegistryError::Duplicate(_) => AppError::Duplicate,
            RegistryError::Store(err) => AppError::Store(err),
        }
    }
}
