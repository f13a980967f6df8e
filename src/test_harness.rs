//! Test doubles for the GitHub contents API
//!
//! `TestHarness` wraps a mockito server for exercising the real HTTP client.
//! `InMemoryContents` is a fake `ContentsApi` with call counters and the same
//! optimistic-concurrency rules as the remote store, for testing operations
//! and handlers without a network.

use crate::api_contracts::{
    CommitInfo, ContentItem, ContentsResponse, EntryKind, PutContentsRequest, PutContentsResponse,
};
use crate::error::FileError;
use crate::github_client::{decode_content, encode_content, ContentsApi};
use crate::types::FileTarget;
use async_trait::async_trait;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// =============================================================================
// mockito harness
// =============================================================================

/// A test harness that sets up a mock GitHub API server
pub struct TestHarness {
    pub server: ServerGuard,
}

impl TestHarness {
    /// Create a new test harness with a mock server
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        Self { server }
    }

    /// Get the mock server URL
    pub fn url(&self) -> String {
        self.server.url()
    }

    fn contents_path(owner: &str, repo: &str, path: &str) -> String {
        if path.is_empty() {
            format!("/repos/{}/{}/contents", owner, repo)
        } else {
            format!("/repos/{}/{}/contents/{}", owner, repo, path)
        }
    }

    /// Mock GET of an existing file
    pub fn mock_get_file(&mut self, owner: &str, repo: &str, path: &str, content: &[u8], sha: &str) -> Mock {
        let name = path.rsplit('/').next().unwrap_or(path);
        self.server.mock("GET", Self::contents_path(owner, repo, path).as_str())
            .match_header("authorization", Matcher::Regex(r"Bearer .+".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({
                "type": "file",
                "encoding": "base64",
                "size": content.len(),
                "name": name,
                "path": path,
                "sha": sha,
                "content": encode_content(content),
            }).to_string())
            .create()
    }

    /// Mock GET of a path that does not exist
    pub fn mock_not_found(&mut self, owner: &str, repo: &str, path: &str) -> Mock {
        self.mock_get_error(owner, repo, path, 404, "Not Found")
    }

    /// Mock GET failing with an arbitrary status
    pub fn mock_get_error(&mut self, owner: &str, repo: &str, path: &str, status: usize, message: &str) -> Mock {
        self.server.mock("GET", Self::contents_path(owner, repo, path).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({
                "message": message,
                "documentation_url": "https://docs.github.com/rest"
            }).to_string())
            .create()
    }

    /// Mock GET of a directory listing
    pub fn mock_list(&mut self, owner: &str, repo: &str, path: &str, items: Vec<serde_json::Value>) -> Mock {
        self.server.mock("GET", Self::contents_path(owner, repo, path).as_str())
            .match_header("authorization", Matcher::Regex(r"Bearer .+".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::Value::Array(items).to_string())
            .create()
    }

    /// Mock a successful PUT. The body must match exactly, so a create
    /// (`sha: None`) only matches when no sha field is sent.
    #[allow(clippy::too_many_arguments)]
    pub fn mock_put(
        &mut self,
        owner: &str,
        repo: &str,
        path: &str,
        message: &str,
        content: &[u8],
        sha: Option<&str>,
        commit_sha: &str,
    ) -> Mock {
        let mut expected = json!({
            "message": message,
            "content": encode_content(content),
        });
        if let Some(sha) = sha {
            expected["sha"] = json!(sha);
        }
        let name = path.rsplit('/').next().unwrap_or(path);

        self.server.mock("PUT", Self::contents_path(owner, repo, path).as_str())
            .match_header("authorization", Matcher::Regex(r"Bearer .+".to_string()))
            .match_body(Matcher::Json(expected))
            .with_status(if sha.is_some() { 200 } else { 201 })
            .with_header("content-type", "application/json")
            .with_body(json!({
                "content": {
                    "type": "file",
                    "name": name,
                    "path": path,
                    "sha": format!("blob-{}", commit_sha),
                    "size": content.len()
                },
                "commit": {
                    "sha": commit_sha,
                    "url": format!("https://api.github.com/repos/{}/{}/git/commits/{}", owner, repo, commit_sha),
                    "html_url": format!("https://github.com/{}/{}/commit/{}", owner, repo, commit_sha),
                    "message": message
                }
            }).to_string())
            .create()
    }

    /// Mock a failing PUT
    pub fn mock_put_error(&mut self, owner: &str, repo: &str, path: &str, status: usize, message: &str) -> Mock {
        self.server.mock("PUT", Self::contents_path(owner, repo, path).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "message": message }).to_string())
            .create()
    }

    /// Mock an HTML page for metadata extraction
    pub fn mock_page(&mut self, path: &str, html: &str) -> Mock {
        self.server.mock("GET", path)
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(html)
            .create()
    }
}

// =============================================================================
// In-memory ContentsApi
// =============================================================================

#[derive(Debug, Clone)]
struct StoredFile {
    content: Vec<u8>,
    sha: String,
}

/// Fake remote store keyed by (owner, repo, path)
#[derive(Default)]
pub struct InMemoryContents {
    files: Mutex<HashMap<FileTarget, StoredFile>>,
    read_failure: Mutex<Option<FileError>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    lists: AtomicUsize,
    commits: AtomicUsize,
}

/// Content-addressed revision token, git style
fn blob_sha(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("blob {}\0", content.len()).as_bytes());
    hasher.update(content);
    format!("{:x}", hasher.finalize())[..40].to_string()
}

impl InMemoryContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file directly, bypassing the API. Returns its sha.
    pub fn seed(&self, target: &FileTarget, content: &[u8]) -> String {
        let sha = blob_sha(content);
        self.files.lock().unwrap().insert(
            target.clone(),
            StoredFile {
                content: content.to_vec(),
                sha: sha.clone(),
            },
        );
        sha
    }

    /// Make every subsequent `get_content` fail with `error`
    pub fn fail_reads_with(&self, error: FileError) {
        *self.read_failure.lock().unwrap() = Some(error);
    }

    pub fn stored(&self, target: &FileTarget) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(target).map(|f| f.content.clone())
    }

    pub fn sha_of(&self, target: &FileTarget) -> Option<String> {
        self.files.lock().unwrap().get(target).map(|f| f.sha.clone())
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    /// Total number of remote calls of any kind
    pub fn call_count(&self) -> usize {
        self.read_count() + self.write_count() + self.list_count()
    }

    fn item(target: &FileTarget, file: &StoredFile, with_content: bool) -> ContentItem {
        ContentItem {
            kind: EntryKind::File,
            name: target.path.rsplit('/').next().unwrap_or(&target.path).to_string(),
            path: target.path.clone(),
            sha: file.sha.clone(),
            size: file.content.len() as u64,
            content: with_content.then(|| encode_content(&file.content)),
            encoding: with_content.then(|| "base64".to_string()),
            html_url: None,
            download_url: None,
        }
    }
}

#[async_trait]
impl ContentsApi for InMemoryContents {
    async fn get_content(&self, target: &FileTarget) -> Result<ContentItem, FileError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.read_failure.lock().unwrap().clone() {
            return Err(error);
        }

        let files = self.files.lock().unwrap();
        files
            .get(target)
            .map(|file| Self::item(target, file, true))
            .ok_or_else(|| FileError::NotFound("Not Found".to_string()))
    }

    async fn create_or_update(
        &self,
        target: &FileTarget,
        request: &PutContentsRequest,
    ) -> Result<PutContentsResponse, FileError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let content = decode_content(&request.content)?;

        // Check and write under one lock, like the remote's atomic sha comparison
        let mut files = self.files.lock().unwrap();
        match (files.get(target), request.sha.as_deref()) {
            (None, Some(sha)) => {
                return Err(FileError::upstream(409, format!("{} does not match {}", target.path, sha)));
            }
            (Some(_), None) => {
                return Err(FileError::upstream(422, "Invalid request.\n\n\"sha\" wasn't supplied."));
            }
            (Some(existing), Some(sha)) if existing.sha != sha => {
                return Err(FileError::upstream(409, format!("{} does not match {}", target.path, sha)));
            }
            _ => {}
        }

        let stored = StoredFile {
            sha: blob_sha(&content),
            content,
        };
        let item = Self::item(target, &stored, false);
        files.insert(target.clone(), stored);

        let n = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        let mut hasher = Sha256::new();
        hasher.update(format!("{}:{}", n, request.message).as_bytes());
        let commit_sha = format!("{:x}", hasher.finalize())[..40].to_string();

        Ok(PutContentsResponse {
            content: Some(item),
            commit: CommitInfo {
                html_url: format!("https://github.com/{}/{}/commit/{}", target.owner, target.repo, commit_sha),
                url: None,
                message: Some(request.message.clone()),
                sha: commit_sha,
            },
        })
    }

    async fn list_content(&self, target: &FileTarget) -> Result<ContentsResponse, FileError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock().unwrap();

        if let Some(file) = files.get(target) {
            return Ok(ContentsResponse::File(Self::item(target, file, true)));
        }

        let prefix = if target.path.is_empty() {
            String::new()
        } else {
            format!("{}/", target.path.trim_end_matches('/'))
        };

        let mut children: BTreeMap<String, ContentItem> = BTreeMap::new();
        for (key, file) in files.iter() {
            if key.owner != target.owner || key.repo != target.repo {
                continue;
            }
            let Some(rest) = key.path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                None => {
                    children.insert(rest.to_string(), Self::item(key, file, false));
                }
                Some((dir, _)) => {
                    children.entry(dir.to_string()).or_insert_with(|| ContentItem {
                        kind: EntryKind::Dir,
                        name: dir.to_string(),
                        path: format!("{}{}", prefix, dir),
                        sha: blob_sha(dir.as_bytes()),
                        size: 0,
                        content: None,
                        encoding: None,
                        html_url: None,
                        download_url: None,
                    });
                }
            }
        }

        if children.is_empty() && !target.path.is_empty() {
            return Err(FileError::NotFound("Not Found".to_string()));
        }
        Ok(ContentsResponse::Directory(children.into_values().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_rejects_stale_sha() {
        let store = InMemoryContents::new();
        let target = FileTarget::new("a", "b", "x.txt");
        let sha = store.seed(&target, b"v1");

        let update = PutContentsRequest {
            message: "v2".to_string(),
            content: encode_content(b"v2"),
            sha: Some(sha.clone()),
        };
        assert!(store.create_or_update(&target, &update).await.is_ok());

        let stale = PutContentsRequest {
            message: "v3".to_string(),
            content: encode_content(b"v3"),
            sha: Some(sha),
        };
        let err = store.create_or_update(&target, &stale).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.stored(&target).unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_in_memory_requires_sha_for_existing() {
        let store = InMemoryContents::new();
        let target = FileTarget::new("a", "b", "x.txt");
        store.seed(&target, b"v1");

        let blind = PutContentsRequest {
            message: "overwrite".to_string(),
            content: encode_content(b"v2"),
            sha: None,
        };
        let err = store.create_or_update(&target, &blind).await.unwrap_err();
        assert_eq!(err.status_code().as_u16(), 422);
    }

    #[tokio::test]
    async fn test_in_memory_lists_immediate_children() {
        let store = InMemoryContents::new();
        store.seed(&FileTarget::new("a", "b", "README.md"), b"readme");
        store.seed(&FileTarget::new("a", "b", "docs/guide.md"), b"guide");
        store.seed(&FileTarget::new("a", "b", "docs/api/ref.md"), b"ref");
        store.seed(&FileTarget::new("other", "b", "docs/skip.md"), b"skip");

        let root = store.list_content(&FileTarget::new("a", "b", "")).await.unwrap().into_items();
        let names: Vec<_> = root.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["README.md", "docs"]);

        let docs = store.list_content(&FileTarget::new("a", "b", "docs")).await.unwrap().into_items();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().any(|i| i.kind == EntryKind::Dir && i.path == "docs/api"));
    }

    #[test]
    fn test_blob_sha_is_content_addressed() {
        assert_eq!(blob_sha(b"hello"), blob_sha(b"hello"));
        assert_ne!(blob_sha(b"hello"), blob_sha(b"hello!"));
        assert_eq!(blob_sha(b"hello").len(), 40);
    }
}
