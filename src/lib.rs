pub mod config;
pub mod contract;
pub mod db;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod media_type;
pub mod models;
pub mod registry;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::EndpointStore;
use crate::registry::Registry;
use crate::state::{AppState, SharedState};

/// Management API on `/endpoints`, health on `/up`, and every other
/// request served from the registry.
pub fn build_app(store: Arc<dyn EndpointStore>, config: Config) -> Router {
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        registry: Registry::new(store),
    });

    Router::new()
        .merge(routes::management_routes())
        .route("/up", get(health))
        .fallback(routes::mock::serve)
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
