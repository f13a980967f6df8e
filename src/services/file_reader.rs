//! Read side: fetch one file, list a directory.

use crate::api_contracts::ContentsResponse;
use crate::error::FileError;
use crate::github_client::{decode_content, ContentsApi};
use crate::types::{FileEntry, FileSnapshot, FileTarget};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetch the current content and revision token of a single file
pub struct FileFetchOperation {
    api: Arc<dyn ContentsApi>,
}

impl FileFetchOperation {
    pub fn new(api: Arc<dyn ContentsApi>) -> Self {
        Self { api }
    }

    pub async fn fetch(&self, target: &FileTarget) -> Result<FileSnapshot, FileError> {
        target.validate()?;

        let item = self.api.get_content(target).await?;
        let content = match (item.encoding.as_deref(), item.content.as_deref()) {
            // Files over 1 MB come back with encoding "none" and an empty payload
            (Some(encoding), _) if encoding != "base64" => {
                warn!(file = %target, encoding, size = item.size, "Content not returned inline");
                return Err(FileError::transport(format!(
                    "{} is too large to be returned by the contents API ({} bytes, encoding \"{}\")",
                    target.path, item.size, encoding
                )));
            }
            (_, Some(encoded)) => decode_content(encoded)?,
            // Empty files come back without a payload
            (_, None) => Vec::new(),
        };
        debug!(file = %target, sha = %item.sha, bytes = content.len(), "Fetched file");

        Ok(FileSnapshot {
            path: item.path,
            content,
            sha: item.sha,
        })
    }
}

/// List files under a directory.
///
/// Directory listings keep only regular files; subdirectories, symlinks and
/// submodules are dropped. When the path names a single file, the result is
/// that one file, whatever its kind.
pub struct FileListOperation {
    api: Arc<dyn ContentsApi>,
}

impl FileListOperation {
    pub fn new(api: Arc<dyn ContentsApi>) -> Self {
        Self { api }
    }

    /// `dir.path` may be empty to list the repository root
    pub async fn list(&self, dir: &FileTarget) -> Result<Vec<FileEntry>, FileError> {
        dir.validate_repo()?;

        let entries: Vec<FileEntry> = match self.api.list_content(dir).await? {
            ContentsResponse::File(item) => vec![item.into()],
            ContentsResponse::Directory(items) => items
                .into_iter()
                .map(FileEntry::from)
                .filter(FileEntry::is_file)
                .collect(),
        };
        debug!(dir = %dir, count = entries.len(), "Listed files");

        Ok(entries)
    }
}
