//! Process configuration
//!
//! Loaded once at startup from environment variables and never mutated.
//! Empty values are treated as unset.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::FileError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
pub const DEFAULT_META_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Also write logs to a daily-rolling file in this directory
    pub dir: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub github_token: Option<String>,
    /// Fixed repository for the /list-files, /get-file and /update-file endpoints
    pub github_owner: Option<String>,
    pub github_repo: Option<String>,
    pub api_url: String,
    pub request_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub meta_allowed_origin: String,
    pub log: LogConfig,
}

// Keeps the token out of debug output
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("github_owner", &self.github_owner)
            .field("github_repo", &self.github_repo)
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .field("bind_addr", &self.bind_addr)
            .field("meta_allowed_origin", &self.meta_allowed_origin)
            .field("log", &self.log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get("GITHUB_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match get("GITHUB_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("Invalid GITHUB_TIMEOUT_SECS '{}': {}", raw, e))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid BIND_ADDR '{}': {}", bind_raw, e))?;

        let format = match get("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(format!("Invalid LOG_FORMAT '{}': expected text or json", other)),
        };

        Ok(Self {
            github_token: get("GITHUB_TOKEN"),
            github_owner: get("GITHUB_OWNER"),
            github_repo: get("GITHUB_REPO"),
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            bind_addr,
            meta_allowed_origin: get("META_ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_META_ORIGIN.to_string()),
            log: LogConfig {
                format,
                dir: get("LOG_DIR"),
            },
        })
    }

    pub fn require_token(&self) -> Result<&str, FileError> {
        self.github_token.as_deref().ok_or_else(|| {
            FileError::Config(
                "GitHub token not configured. Please set GITHUB_TOKEN environment variable."
                    .to_string(),
            )
        })
    }

    /// Owner and repo of the fixed-repository endpoints
    pub fn fixed_repo(&self) -> Result<(&str, &str), FileError> {
        match (self.github_owner.as_deref(), self.github_repo.as_deref()) {
            (Some(owner), Some(repo)) => Ok((owner, repo)),
            _ => Err(FileError::Config(
                "Repository not configured. Please set GITHUB_OWNER and GITHUB_REPO environment variables."
                    .to_string(),
            )),
        }
    }
}
