//! Core types for addressing and writing files in a remote repository.
//!
//! These are the domain values the operations in `services` work with. Wire
//! formats (GitHub JSON, inbound request bodies) live in `api_contracts`.

use crate::api_contracts::{CommitInfo, ContentItem, EntryKind};
use crate::error::FileError;

/// Identifies a single blob in a remote repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileTarget {
    pub owner: String,
    pub repo: String,
    /// `/`-separated path inside the repository; empty means the root
    pub path: String,
}

impl FileTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            path: path.into(),
        }
    }

    /// Owner, repo and path must all be present to address a single file.
    pub fn validate(&self) -> Result<(), FileError> {
        let missing = missing_fields(&[
            ("owner", self.owner.as_str()),
            ("repo", self.repo.as_str()),
            ("path", self.path.as_str()),
        ]);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FileError::missing(&missing))
        }
    }

    /// Same as `validate`, but an empty path is allowed (repository root).
    pub fn validate_repo(&self) -> Result<(), FileError> {
        let missing = missing_fields(&[
            ("owner", self.owner.as_str()),
            ("repo", self.repo.as_str()),
        ]);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FileError::missing(&missing))
        }
    }
}

impl std::fmt::Display for FileTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}:{}", self.owner, self.repo, self.path)
    }
}

/// Current persisted content of a file and its revision token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    pub path: String,
    pub content: Vec<u8>,
    pub sha: String,
}

impl FileSnapshot {
    /// Content as text. Invalid UTF-8 sequences are replaced, not rejected.
    pub fn content_text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Create-or-update request for a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertRequest {
    pub target: FileTarget,
    pub new_content: Vec<u8>,
    pub commit_message: String,
    /// Revision token the caller already holds. When set, no read is issued.
    pub known_sha: Option<String>,
}

impl UpsertRequest {
    pub fn validate(&self) -> Result<(), FileError> {
        let content_marker = if self.new_content.is_empty() { "" } else { "content" };
        let missing = missing_fields(&[
            ("owner", self.target.owner.as_str()),
            ("repo", self.target.repo.as_str()),
            ("path", self.target.path.as_str()),
            ("content", content_marker),
            ("message", self.commit_message.as_str()),
        ]);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FileError::missing(&missing))
        }
    }

    /// Known sha with empty strings treated as absent
    pub fn effective_known_sha(&self) -> Option<&str> {
        self.known_sha.as_deref().filter(|sha| !sha.is_empty())
    }
}

/// Outcome of a successful upsert
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertResult {
    /// True when the write carried no sha, i.e. the path did not exist
    pub created: bool,
    pub commit_sha: String,
    pub commit_url: String,
    /// Full commit object as returned by the remote store
    pub commit: CommitInfo,
    /// Metadata of the written file, when the remote returned it
    pub content: Option<ContentItem>,
}

/// One listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub size: u64,
    pub kind: EntryKind,
}

impl FileEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

impl From<ContentItem> for FileEntry {
    fn from(item: ContentItem) -> Self {
        Self {
            name: item.name,
            path: item.path,
            sha: item.sha,
            size: item.size,
            kind: item.kind,
        }
    }
}

fn missing_fields<'a>(fields: &[(&'a str, &str)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect()
}
