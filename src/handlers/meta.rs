//! `/` banner and `/meta?url=` page metadata lookup.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use crate::api_contracts::{ErrorBody, MetaQuery};
use crate::state::AppState;

pub async fn banner() -> &'static str {
    "Meta Search API is running. Use /meta?url=..."
}

/// GET /meta?url=
pub async fn get_meta(State(state): State<AppState>, Query(query): Query<MetaQuery>) -> Response {
    match state.meta.extract(query.url.as_deref()).await {
        Ok(meta) => Json(meta).into_response(),
        Err(e) => {
            warn!(url = ?query.url, error = %e, "Metadata lookup failed");
            (e.status_code(), Json(ErrorBody { error: e.to_string() })).into_response()
        }
    }
}
