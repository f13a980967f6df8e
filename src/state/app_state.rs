//! Application state: configuration plus the injected remote clients.

use std::sync::Arc;

use crate::config::Config;
use crate::error::FileError;
use crate::github_client::{ContentsApi, GitHubClient};
use crate::meta_extractor::MetaExtractor;
use crate::types::FileTarget;

/// Cheap to clone; every field is shared
#[derive(Clone)]
pub struct AppState {
    /// Loaded once per process, never mutated
    pub config: Arc<Config>,
    contents: Arc<dyn ContentsApi>,
    pub meta: Arc<MetaExtractor>,
}

impl AppState {
    /// Wire the real GitHub client from configuration
    pub fn from_config(config: Config) -> Self {
        let contents = Arc::new(GitHubClient::from_config(&config));
        Self::new(config, contents)
    }

    /// Use a caller-supplied contents API (tests, alternative backends)
    pub fn new(config: Config, contents: Arc<dyn ContentsApi>) -> Self {
        let meta = Arc::new(MetaExtractor::new(config.request_timeout));
        Self {
            config: Arc::new(config),
            contents,
            meta,
        }
    }

    /// The contents API, or a config error when no credential is configured
    pub fn contents_api(&self) -> Result<Arc<dyn ContentsApi>, FileError> {
        self.config.require_token()?;
        Ok(Arc::clone(&self.contents))
    }

    /// Target inside the fixed repository named by GITHUB_OWNER/GITHUB_REPO
    pub fn fixed_target(&self, path: &str) -> Result<FileTarget, FileError> {
        let (owner, repo) = self.config.fixed_repo()?;
        Ok(FileTarget::new(owner, repo, path))
    }
}
