//! HTTP router construction.
//!
//! Assembles the Axum routes, middleware, and OpenAPI docs into a single `Router`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use doclift_core::config::{ServerConfig, UploadConfig};

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, server: &ServerConfig, upload: &UploadConfig) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/convert-url", post(api::convert_url))
        .route("/convert-file", post(api::convert_file))
        .route("/convert-file-raw", post(api::convert_file_raw))
        .route("/chunk", post(api::chunk))
        .route("/index-file", post(api::index_file))
        .route("/index-url", post(api::index_url))
        .layer(DefaultBodyLimit::max(upload.max_upload_bytes()))
        .layer(cors_layer(&server.cors_origin))
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}

/// `*` allows any origin; anything else is a single allowed origin.
fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            warn!("Invalid CORS_ORIGIN '{}', cross-origin requests disabled", origin);
            CorsLayer::new()
        }
    }
}
