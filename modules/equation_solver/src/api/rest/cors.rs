use axum::Router;
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use http::{HeaderName, HeaderValue, Method};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

use crate::config::CorsConfig;

/// Stamp the configured CORS headers on every response of `router`.
///
/// The headers are set unconditionally, not only for cross-origin requests,
/// so plain `GET` responses carry the allowed methods and headers as well.
/// Entries that are not valid methods or header names are dropped with a warning.
pub fn apply_cors(router: Router, cfg: &CorsConfig) -> Router {
    if cfg.allow_origin == "*" {
        warn!(
            "CORS is configured with allow_origin='*'. \
             This allows any website to make cross-origin requests to the API."
        );
    }

    let methods: Vec<String> = cfg
        .allow_methods
        .iter()
        .filter_map(|m| match m.parse::<Method>() {
            Ok(method) => Some(method.to_string()),
            Err(_) => {
                warn!(method = %m, "Ignoring invalid CORS method");
                None
            }
        })
        .collect();

    let headers: Vec<String> = cfg
        .allow_headers
        .iter()
        .filter_map(|h| match h.parse::<HeaderName>() {
            Ok(_) => Some(h.clone()),
            Err(_) => {
                warn!(header = %h, "Ignoring invalid CORS header name");
                None
            }
        })
        .collect();

    let mut router = router;
    let stamped = [
        (ACCESS_CONTROL_ALLOW_ORIGIN, cfg.allow_origin.clone()),
        (ACCESS_CONTROL_ALLOW_METHODS, methods.join(", ")),
        (ACCESS_CONTROL_ALLOW_HEADERS, headers.join(", ")),
    ];
    for (name, value) in stamped {
        if value.is_empty() {
            continue;
        }
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                router = router.layer(SetResponseHeaderLayer::overriding(name, value));
            }
            Err(_) => warn!(header = %name, value = %value, "Ignoring invalid CORS header value"),
        }
    }
    router
}
