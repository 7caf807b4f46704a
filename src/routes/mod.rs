pub mod endpoints;
pub mod mock;

use axum::routing::{get, patch};
use axum::Router;

use crate::state::SharedState;

/// CRUD over endpoint definitions. Methods these paths do not define fall
/// through to the mock dispatcher like any other request. HEAD is routed
/// explicitly, since `get` would otherwise answer it with the listing.
pub fn management_routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/endpoints",
            get(endpoints::list)
                .head(mock::serve)
                .post(endpoints::create)
                .fallback(mock::serve),
        )
        .route(
            "/endpoints/{id}",
            patch(endpoints::update)
                .put(endpoints::update)
                .delete(endpoints::delete)
                .fallback(mock::serve),
        )
}
