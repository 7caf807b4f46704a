use axum::extract::State;
use axum::http::{Method, Uri};

use crate::dispatch::{self, MockResponse};
use crate::error::AppError;
use crate::state::SharedState;

/// Catch-all: answer any request not claimed by another route from the
/// registry.
pub async fn serve(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
) -> Result<MockResponse, AppError> {
    dispatch::dispatch(&state.registry, &method, uri.path()).await
}
