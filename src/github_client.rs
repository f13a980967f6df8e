use crate::api_contracts::{
    ContentItem, ContentsResponse, GitHubErrorBody, PutContentsRequest, PutContentsResponse,
};
use crate::config::Config;
use crate::error::FileError;
use crate::types::FileTarget;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::time::Duration;
use tracing::{debug, warn};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Remote contents store. The operations in `services` only talk to this
/// trait so they can run against a fake in tests.
#[async_trait]
pub trait ContentsApi: Send + Sync {
    /// Fetch a single file, including its base64 payload
    async fn get_content(&self, target: &FileTarget) -> Result<ContentItem, FileError>;

    /// Create (no sha) or update (sha of the current revision) a file
    async fn create_or_update(
        &self,
        target: &FileTarget,
        request: &PutContentsRequest,
    ) -> Result<PutContentsResponse, FileError>;

    /// List a directory, or describe a single file when the path names one
    async fn list_content(&self, target: &FileTarget) -> Result<ContentsResponse, FileError>;
}

/// Base64 as required by the contents API
pub fn encode_content(content: &[u8]) -> String {
    STANDARD.encode(content)
}

/// Decode a contents API payload. GitHub wraps base64 at 60 columns.
pub fn decode_content(encoded: &str) -> Result<Vec<u8>, FileError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| FileError::transport(format!("Failed to decode file content: {}", e)))
}

/// reqwest client for the GitHub REST contents API
pub struct GitHubClient {
    api_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(api_url: String, token: Option<String>, timeout: Duration) -> Self {
        // Include version in User-Agent header; GitHub rejects requests without one
        let user_agent = format!("github-file-manager/{}", env!("CARGO_PKG_VERSION"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_url.clone(),
            config.github_token.clone(),
            config.request_timeout,
        )
    }

    /// `{api}/repos/{owner}/{repo}/contents/{path}` with every segment percent-encoded
    fn contents_url(&self, target: &FileTarget) -> Result<reqwest::Url, FileError> {
        let mut url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| FileError::Config(format!("Invalid GitHub API URL: {}", e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FileError::Config("Invalid GitHub API URL: cannot be a base".to_string()))?;
            segments
                .pop_if_empty()
                .push("repos")
                .push(&target.owner)
                .push(&target.repo)
                .push("contents");
            for segment in target.path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }

        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, GITHUB_ACCEPT);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_contents(&self, target: &FileTarget) -> Result<ContentsResponse, FileError> {
        let url = self.contents_url(target)?;
        debug!(file = %target, "GET contents");

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(|e| FileError::transport(format!("Network error: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| FileError::transport(format!("Failed to parse response: {}", e)))
    }
}

/// Map a non-success response to a typed error, keeping the remote message
async fn error_from_response(response: reqwest::Response) -> FileError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GitHubErrorBody>(&text)
        .map(|body| body.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    if status == reqwest::StatusCode::NOT_FOUND {
        FileError::NotFound(message)
    } else {
        warn!(status = status.as_u16(), %message, "GitHub API returned an error");
        FileError::upstream(status.as_u16(), message)
    }
}

#[async_trait]
impl ContentsApi for GitHubClient {
    async fn get_content(&self, target: &FileTarget) -> Result<ContentItem, FileError> {
        match self.fetch_contents(target).await? {
            ContentsResponse::File(item) => Ok(item),
            ContentsResponse::Directory(_) => Err(FileError::Validation(format!(
                "{} is a directory, not a file",
                target.path
            ))),
        }
    }

    async fn create_or_update(
        &self,
        target: &FileTarget,
        request: &PutContentsRequest,
    ) -> Result<PutContentsResponse, FileError> {
        let url = self.contents_url(target)?;
        debug!(file = %target, with_sha = request.sha.is_some(), "PUT contents");

        let response = self
            .authorized(self.client.put(url))
            .json(request)
            .send()
            .await
            .map_err(|e| FileError::transport(format!("Network error: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| FileError::transport(format!("Failed to parse response: {}", e)))
    }

    async fn list_content(&self, target: &FileTarget) -> Result<ContentsResponse, FileError> {
        self.fetch_contents(target).await
    }
}
