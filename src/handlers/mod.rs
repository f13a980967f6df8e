//! HTTP handlers and the router that serves them.
//!
//! - `files`: `/files`, owner and repo supplied by the caller
//! - `repo_files`: `/list-files`, `/get-file`, `/update-file` on the configured repository
//! - `meta`: `/` banner and `/meta` page metadata lookup
//! - `health`: `/health`

pub mod files;
pub mod health;
pub mod meta;
pub mod repo_files;

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::DEFAULT_META_ORIGIN;
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let repo_routes = Router::new()
        .route(
            "/list-files",
            get(repo_files::list_files)
                .options(repo_files::preflight)
                .fallback(repo_files::method_not_allowed),
        )
        .route(
            "/get-file",
            get(repo_files::get_file)
                .options(repo_files::preflight)
                .fallback(repo_files::method_not_allowed),
        )
        .route(
            "/update-file",
            post(repo_files::update_file)
                .options(repo_files::preflight)
                .fallback(repo_files::method_not_allowed),
        )
        .layer(middleware::map_response(repo_files::allow_any_origin));

    let meta_routes = Router::new()
        .route("/", get(meta::banner))
        .route("/meta", get(meta::get_meta))
        .layer(meta_cors(&state.config.meta_allowed_origin));

    Router::new()
        .route("/files", get(files::get_file).post(files::update_file))
        .route("/health", get(health::health))
        .merge(repo_routes)
        .merge(meta_routes)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

fn meta_cors(origin: &str) -> CorsLayer {
    let origin = HeaderValue::from_str(origin).unwrap_or_else(|_| {
        tracing::warn!(origin, "Invalid META_ALLOWED_ORIGIN, using default");
        HeaderValue::from_static(DEFAULT_META_ORIGIN)
    });
    CorsLayer::new().allow_origin(origin).allow_methods([Method::GET])
}
