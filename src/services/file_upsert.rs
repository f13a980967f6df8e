//! Create-or-update of a single file
//!
//! One optional read to learn the current revision token, then exactly one
//! write. The remote store's sha comparison is the only concurrency control:
//! two racing upserts with the same token resolve to one success and one
//! conflict, and the conflict is returned to the caller unretried.

use crate::api_contracts::PutContentsRequest;
use crate::error::FileError;
use crate::github_client::{encode_content, ContentsApi};
use crate::types::{UpsertRequest, UpsertResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct FileUpsertOperation {
    api: Arc<dyn ContentsApi>,
}

impl FileUpsertOperation {
    pub fn new(api: Arc<dyn ContentsApi>) -> Self {
        Self { api }
    }

    pub async fn upsert(&self, req: UpsertRequest) -> Result<UpsertResult, FileError> {
        if let Err(e) = req.validate() {
            debug!(error = %e, "Rejected upsert request");
            return Err(e);
        }

        let effective_sha = match req.effective_known_sha() {
            Some(sha) => Some(sha.to_string()),
            None => self.current_sha(&req).await?,
        };

        let created = effective_sha.is_none();
        let write = PutContentsRequest {
            message: req.commit_message.clone(),
            content: encode_content(&req.new_content),
            sha: effective_sha,
        };

        let response = self
            .api
            .create_or_update(&req.target, &write)
            .await
            .inspect_err(|e| {
                warn!(file = %req.target, error = %e, conflict = e.is_conflict(), "Write failed");
            })?;

        let action = if created { "created" } else { "updated" };
        info!(file = %req.target, commit = %response.commit.sha, "File {}", action);

        Ok(UpsertResult {
            created,
            commit_sha: response.commit.sha.clone(),
            commit_url: response.commit.html_url.clone(),
            commit: response.commit,
            content: response.content,
        })
    }

    /// Sha of the file currently at the target, or None if it does not exist
    async fn current_sha(&self, req: &UpsertRequest) -> Result<Option<String>, FileError> {
        match self.api.get_content(&req.target).await {
            Ok(item) => Ok(Some(item.sha)),
            Err(FileError::NotFound(_)) => Ok(None),
            Err(FileError::Upstream { status, message }) => {
                warn!(file = %req.target, ?status, %message, "Failed to check existing file");
                Err(FileError::Upstream {
                    status,
                    message: format!("Failed to check existing file: {}", message),
                })
            }
            Err(other) => Err(other),
        }
    }
}
