//! Router construction.
//!
//! The whole application is one fallback service (the static file responder)
//! wrapped in response-header layers. Camera APIs only work in a secure
//! context, and pages under development are frequently opened cross-origin,
//! so every response carries permissive CORS headers. The headers are added
//! after the file responder built its own, without overriding anything
//! already set.

use axum::Router;
use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::static_files::create_static_service;

/// `Access-Control-Allow-Origin` value sent on every response.
pub const CORS_ALLOW_ORIGIN: &str = "*";
/// `Access-Control-Allow-Methods` value sent on every response.
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
/// `Access-Control-Allow-Headers` value sent on every response.
pub const CORS_ALLOW_HEADERS: &str = "*";

/// Creates the Axum router: static files from the document root, CORS
/// headers on every response, and per-request tracing.
pub fn create_router(config: &ServerConfig) -> Router {
    Router::new()
        .fallback_service(create_static_service(&config.root))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(CORS_ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
}
