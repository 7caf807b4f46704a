use axum::body::Body;
use axum::http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::document::RenderedBody;
use crate::error::AppError;
use crate::models::{Endpoint, Headers, Verb};
use crate::registry::Registry;

/// A stored endpoint rendered for serving.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: StatusCode,
    pub headers: Headers,
    pub body: RenderedBody,
}

impl MockResponse {
    pub fn render(endpoint: &Endpoint) -> Result<Self, AppError> {
        let status = StatusCode::from_u16(endpoint.code).map_err(|e| {
            AppError::Internal(format!("endpoint {} has unusable code: {e}", endpoint.id))
        })?;
        if status.is_informational() {
            // hyper will not send a 1xx as a final response and answers 500.
            tracing::warn!(id = %endpoint.id, code = endpoint.code, "informational code cannot be served as a final response");
        }
        Ok(MockResponse {
            status,
            headers: endpoint.headers.clone(),
            body: RenderedBody::sniff(&endpoint.body),
        })
    }
}

/// Serve `method path` from the registry. Read-only.
pub async fn dispatch(registry: &Registry, method: &Method, path: &str) -> Result<MockResponse, AppError> {
    let endpoint = match Verb::from_method(method) {
        Some(verb) => registry.find_by_key(verb, path).await?,
        None => None,
    };

    let Some(endpoint) = endpoint else {
        tracing::debug!(%method, path, "no mock registered");
        return Err(AppError::PageNotFound(path.to_string()));
    };

    tracing::debug!(id = %endpoint.id, %method, path, "serving mock");
    MockResponse::render(&endpoint)
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body.into_bytes()));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) else {
                tracing::warn!(header = %name, "skipping unusable stored header");
                continue;
            };
            // Framing is left to the transport.
            if name == CONTENT_LENGTH || name == TRANSFER_ENCODING {
                continue;
            }
            headers.append(name, value);
        }

        response
    }
}
