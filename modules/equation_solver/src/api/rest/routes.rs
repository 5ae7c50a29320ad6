use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};

use crate::api::rest::{handlers, openapi};
use crate::domain::service::Service;

/// Mounts `/`, `/solve` and `/openapi.json` on `router`.
pub fn register_routes(mut router: Router, service: Arc<Service>) -> Router {
    router = router
        .route("/", get(handlers::index).options(handlers::preflight))
        .route("/solve", get(handlers::solve).options(handlers::preflight))
        .route("/openapi.json", get(handlers::openapi_json));

    router = router
        .layer(Extension(service))
        .layer(Extension(Arc::new(openapi::build_openapi())));

    router
}
