use axum::extract::FromRequestParts;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::document::JSON_API;
use crate::error::AppError;

/// Guard for management routes: the client must accept
/// `application/vnd.api+json`, and any body it sends must be declared as
/// that type. Rejects with 415 before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct JsonApiRequest;

impl<S> FromRequestParts<S> for JsonApiRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        check(&parts.headers)?;
        Ok(JsonApiRequest)
    }
}

pub fn check(headers: &HeaderMap) -> Result<(), AppError> {
    let accepts = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.split(',').any(is_json_api));
    if !accepts {
        return Err(AppError::UnsupportedMediaType);
    }

    if let Some(content_type) = headers.get(CONTENT_TYPE) {
        let declared = content_type.to_str().ok().is_some_and(is_json_api);
        if !declared {
            return Err(AppError::UnsupportedMediaType);
        }
    }

    Ok(())
}

/// Compare the media type, ignoring parameters such as `charset`.
fn is_json_api(value: &str) -> bool {
    value
        .split(';')
        .next()
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(JSON_API))
}
