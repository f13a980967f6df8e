/**
 * API Contract Types for GitHub File Manager
 *
 * Two groups of types live here:
 * - the GitHub REST "contents" API payloads we send and receive
 * - the JSON bodies our own HTTP endpoints accept and return
 *
 * Principles:
 * - Use explicit Option<T> instead of omitting fields
 * - Use serde attributes to match JSON format exactly
 * - Inbound request fields default to empty so that missing fields surface
 *   as validation errors (400) instead of body rejections
 */

use serde::{Deserialize, Serialize};

// =============================================================================
// GitHub Contents API
// =============================================================================

/// Kind of a repository entry as reported by the contents API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// A single file or directory entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    /// Base64 payload, only present when a single file was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// GET /repos/{owner}/{repo}/contents/{path} answers with an object for a
/// file and an array for a directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ContentsResponse {
    Directory(Vec<ContentItem>),
    File(ContentItem),
}

impl ContentsResponse {
    pub fn into_items(self) -> Vec<ContentItem> {
        match self {
            ContentsResponse::Directory(items) => items,
            ContentsResponse::File(item) => vec![item],
        }
    }
}

/// PUT /repos/{owner}/{repo}/contents/{path}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PutContentsRequest {
    pub message: String,
    /// Base64-encoded new content
    pub content: String,
    /// Required when updating, must be absent when creating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Commit created by a write
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitInfo {
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response to a successful PUT (200 update, 201 create)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PutContentsResponse {
    pub content: Option<ContentItem>,
    pub commit: CommitInfo,
}

/// Error body returned by the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubErrorBody {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

// =============================================================================
// /files (owner/repo supplied by caller)
// =============================================================================

/// POST /files body
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpdateFileBody {
    pub owner: String,
    pub repo: String,
    pub path: String,
    /// UTF-8 text
    pub content: String,
    pub message: String,
}

/// GET /files query
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileQuery {
    pub owner: String,
    pub repo: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitRef {
    pub sha: String,
    pub url: String,
}

/// POST /files success
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateFileResponse {
    pub message: String,
    pub commit: CommitRef,
}

/// GET /files success
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileContentResponse {
    pub content: String,
    pub sha: String,
}

/// Error body of the /files surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageBody {
    pub message: String,
}

// =============================================================================
// /list-files, /get-file, /update-file (fixed repository)
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathQuery {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListedFile {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListFilesResponse {
    pub files: Vec<ListedFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetFileResponse {
    pub content: String,
    pub sha: String,
    pub path: String,
}

/// POST /update-file body
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpdateRepoFileBody {
    pub path: String,
    pub content: String,
    pub message: String,
    pub sha: Option<String>,
}

/// POST /update-file success
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateRepoFileResponse {
    pub success: bool,
    pub commit: CommitInfo,
    pub content: Option<ContentItem>,
}

/// Error body of the fixed-repository surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailedError {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// =============================================================================
// /meta
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetaQuery {
    pub url: Option<String>,
}

/// Page metadata; absent tags are empty strings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

// =============================================================================
// Tests
// =============================================================================
