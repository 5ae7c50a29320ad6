//! HTTP host: router assembly, middleware stack and the serve loop.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use equation_solver::api::rest::error::ApiError;
use equation_solver::api::rest::{cors, routes};
use equation_solver::Service;
use http::{Request, StatusCode};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;
use tracing::Span;

use crate::config::AppConfig;
use crate::request_id::{self, MakeReqId};
use crate::signals;

/// Builds the application router with the full middleware stack.
///
/// Runtime order, outermost first:
/// CORS → `SetRequestId` → `PropagateRequestId` → Trace → Timeout → `CatchPanic` → Router.
#[must_use]
pub fn build_router(config: &AppConfig) -> Router {
    let service = Arc::new(Service::new(config.equation_solver.clone()));
    let mut router = routes::register_routes(Router::new(), service)
        .route("/healthz", get(|| async { "ok" }));

    // 6) Panics become a JSON 500
    router = router.layer(CatchPanicLayer::custom(handle_panic));

    // 5) Timeout
    router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::GATEWAY_TIMEOUT,
        config.request_timeout(),
    ));

    // 4) Trace
    router = apply_trace_layer(router);

    // 3) PropagateRequestId
    let x_request_id = request_id::header();
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));

    // 2) SetRequestId
    router = router.layer(SetRequestIdLayer::new(x_request_id, MakeReqId));

    // 1) CORS, outermost so every response carries the headers
    cors::apply_cors(router, &config.cors)
}

fn apply_trace_layer(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<Body>| {
                let rid = req
                    .headers()
                    .get(request_id::header())
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");

                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    version = ?req.version(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(|res: &Response<Body>, latency: Duration, span: &Span| {
                span.record("status", res.status().as_u16());
                span.record("latency_ms", latency.as_millis());
            }),
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %detail, "Request handler panicked");
    ApiError::internal().into_response()
}

/// Binds the configured address and serves until a shutdown signal arrives.
///
/// # Errors
/// Returns an error if the address is invalid, cannot be bound, or the server fails.
pub async fn run(config: &AppConfig) -> Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "HTTP server bound");

    serve(listener, build_router(config), async {
        signals::shutdown_signal().await;
    })
    .await
}

/// Serves `router` on `listener` until `shutdown` resolves, then drains in-flight requests.
///
/// # Errors
/// Returns an error if the server fails while accepting or serving connections.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;
    tracing::info!("HTTP server stopped");
    Ok(())
}
