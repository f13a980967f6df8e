//! Page metadata lookup
//!
//! Fetches a URL and reads the first `<title>` plus the `content` of
//! `<meta name="description">` and `<meta name="keywords">`. Absent tags
//! become empty strings.

use crate::api_contracts::PageMeta;
use crate::error::MetaError;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

pub struct MetaExtractor {
    client: reqwest::Client,
}

impl MetaExtractor {
    pub fn new(timeout: Duration) -> Self {
        let user_agent = format!("github-file-manager/{}", env!("CARGO_PKG_VERSION"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }

    pub async fn extract(&self, url: Option<&str>) -> Result<PageMeta, MetaError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(MetaError::MissingUrl)?;

        let url = reqwest::Url::parse(url)
            .map_err(|e| MetaError::Fetch(format!("Invalid URL: {}", e)))?;

        debug!(%url, "Fetching page for metadata");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MetaError::Fetch(format!("Network error: {}", e)))?;

        if !response.status().is_success() {
            warn!(%url, status = response.status().as_u16(), "Page fetch failed");
            return Err(MetaError::Fetch("Failed to fetch the webpage".to_string()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| MetaError::Fetch(format!("Failed to read the webpage: {}", e)))?;

        parse_meta(&html)
    }
}

/// Extract title, description and keywords from an HTML document
pub fn parse_meta(html: &str) -> Result<PageMeta, MetaError> {
    let document = Html::parse_document(html);

    let title = first_text(&document, "title")?;
    let description = meta_content(&document, "description")?;
    let keywords = meta_content(&document, "keywords")?;

    Ok(PageMeta {
        title,
        description,
        keywords,
    })
}

fn selector(css: &str) -> Result<Selector, MetaError> {
    Selector::parse(css).map_err(|e| MetaError::Fetch(format!("Invalid selector {}: {}", css, e)))
}

fn first_text(document: &Html, css: &str) -> Result<String, MetaError> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default())
}

fn meta_content(document: &Html, name: &str) -> Result<String, MetaError> {
    let selector = selector(&format!(r#"meta[name="{}"]"#, name))?;
    Ok(document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string())
}
