//! `/files`: read or upsert one file, owner and repo given by the caller.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::api_contracts::{
    CommitRef, FileContentResponse, FileQuery, MessageBody, UpdateFileBody, UpdateFileResponse,
};
use crate::error::FileError;
use crate::services::{FileFetchOperation, FileUpsertOperation};
use crate::state::AppState;
use crate::types::{FileTarget, UpsertRequest};

const MISSING_BODY_FIELDS: &str = "Missing required fields: owner, repo, path, content, message";
const MISSING_QUERY_PARAMS: &str = "Missing required query parameters: owner, repo, path";

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(MessageBody { message: message.into() })).into_response()
}

fn error_response(err: FileError) -> Response {
    message(err.status_code(), err.to_string())
}

/// POST /files
pub async fn update_file(
    State(state): State<AppState>,
    body: Result<Json<UpdateFileBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable /files body");
            return message(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", rejection.body_text()));
        }
    };

    let req = UpsertRequest {
        target: FileTarget::new(body.owner, body.repo, body.path),
        new_content: body.content.into_bytes(),
        commit_message: body.message,
        known_sha: None,
    };
    if req.validate().is_err() {
        return message(StatusCode::BAD_REQUEST, MISSING_BODY_FIELDS);
    }

    let api = match state.contents_api() {
        Ok(api) => api,
        Err(e) => return error_response(e),
    };

    match FileUpsertOperation::new(api).upsert(req).await {
        Ok(result) => {
            let text = if result.created {
                "File created successfully!"
            } else {
                "File updated successfully!"
            };
            Json(UpdateFileResponse {
                message: text.to_string(),
                commit: CommitRef {
                    sha: result.commit_sha,
                    url: result.commit_url,
                },
            })
            .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /files?owner&repo&path
pub async fn get_file(State(state): State<AppState>, Query(query): Query<FileQuery>) -> Response {
    let target = FileTarget::new(query.owner, query.repo, query.path);
    if target.validate().is_err() {
        return message(StatusCode::BAD_REQUEST, MISSING_QUERY_PARAMS);
    }

    let api = match state.contents_api() {
        Ok(api) => api,
        Err(e) => return error_response(e),
    };

    match FileFetchOperation::new(api).fetch(&target).await {
        Ok(snapshot) => Json(FileContentResponse {
            content: snapshot.content_text(),
            sha: snapshot.sha,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}
