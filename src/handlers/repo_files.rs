//! `/list-files`, `/get-file`, `/update-file` against the repository named
//! by GITHUB_OWNER/GITHUB_REPO. Errors use the `{error, details}` shape.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::api_contracts::{
    DetailedError, GetFileResponse, ListFilesResponse, ListedFile, PathQuery, UpdateRepoFileBody,
    UpdateRepoFileResponse,
};
use crate::error::FileError;
use crate::services::{FileFetchOperation, FileListOperation, FileUpsertOperation};
use crate::state::AppState;
use crate::types::{FileEntry, UpsertRequest};

fn detailed(status: StatusCode, error: &str, details: Option<String>) -> Response {
    (
        status,
        Json(DetailedError {
            error: error.to_string(),
            details,
        }),
    )
        .into_response()
}

fn failure(context: &str, err: FileError) -> Response {
    detailed(err.status_code(), context, Some(err.to_string()))
}

impl From<FileEntry> for ListedFile {
    fn from(entry: FileEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            sha: entry.sha,
            size: entry.size,
            kind: entry.kind,
        }
    }
}

/// GET /list-files?path=
pub async fn list_files(State(state): State<AppState>, Query(query): Query<PathQuery>) -> Response {
    const CONTEXT: &str = "Failed to list files";

    let dir = match state.fixed_target(query.path.as_deref().unwrap_or("")) {
        Ok(dir) => dir,
        Err(e) => return failure(CONTEXT, e),
    };
    let api = match state.contents_api() {
        Ok(api) => api,
        Err(e) => return failure(CONTEXT, e),
    };

    match FileListOperation::new(api).list(&dir).await {
        Ok(entries) => Json(ListFilesResponse {
            files: entries.into_iter().map(ListedFile::from).collect(),
        })
        .into_response(),
        Err(e) => failure(CONTEXT, e),
    }
}

/// GET /get-file?path=
pub async fn get_file(State(state): State<AppState>, Query(query): Query<PathQuery>) -> Response {
    const CONTEXT: &str = "Failed to fetch file";

    let path = query.path.unwrap_or_default();
    if path.is_empty() {
        return detailed(StatusCode::BAD_REQUEST, "File path is required", None);
    }

    let target = match state.fixed_target(&path) {
        Ok(target) => target,
        Err(e) => return failure(CONTEXT, e),
    };
    let api = match state.contents_api() {
        Ok(api) => api,
        Err(e) => return failure(CONTEXT, e),
    };

    match FileFetchOperation::new(api).fetch(&target).await {
        Ok(snapshot) => Json(GetFileResponse {
            content: snapshot.content_text(),
            sha: snapshot.sha,
            path: snapshot.path,
        })
        .into_response(),
        Err(e) => failure(CONTEXT, e),
    }
}

/// POST /update-file
pub async fn update_file(
    State(state): State<AppState>,
    body: Result<Json<UpdateRepoFileBody>, JsonRejection>,
) -> Response {
    const CONTEXT: &str = "Failed to update file";

    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable /update-file body");
            return detailed(
                StatusCode::BAD_REQUEST,
                "Invalid request body",
                Some(rejection.body_text()),
            );
        }
    };

    if body.path.is_empty() || body.content.is_empty() || body.message.is_empty() {
        return detailed(
            StatusCode::BAD_REQUEST,
            "Path, content, and message are required",
            None,
        );
    }

    let target = match state.fixed_target(&body.path) {
        Ok(target) => target,
        Err(e) => return failure(CONTEXT, e),
    };
    let api = match state.contents_api() {
        Ok(api) => api,
        Err(e) => return failure(CONTEXT, e),
    };

    let req = UpsertRequest {
        target,
        new_content: body.content.into_bytes(),
        commit_message: body.message,
        known_sha: body.sha,
    };

    match FileUpsertOperation::new(api).upsert(req).await {
        Ok(result) => Json(UpdateRepoFileResponse {
            success: true,
            commit: result.commit,
            content: result.content,
        })
        .into_response(),
        Err(e) => failure(CONTEXT, e),
    }
}

/// Every fixed-repository response is readable from any origin
pub async fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .entry(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .or_insert(HeaderValue::from_static("*"));
    response
}

/// CORS preflight answered for every method on the fixed-repository routes
pub async fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, PUT, DELETE"),
        ],
    )
        .into_response()
}

pub async fn method_not_allowed() -> Response {
    detailed(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None)
}
