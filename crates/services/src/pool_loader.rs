//! Question pool sources.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use url::Url;

use quiz_core::model::Question;

use crate::error::LoadError;

/// Anything that can produce the full question pool.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Load and decode the pool.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when the pool cannot be fetched or decoded.
    async fn load_pool(&self) -> Result<Vec<Question>, LoadError>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Where the pool lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolLocation {
    Http(Url),
    File(PathBuf),
}

impl PoolLocation {
    /// `http://` and `https://` values are fetched over HTTP, anything else is a file path.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidLocation` for blank input or a malformed URL.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LoadError::InvalidLocation(raw.to_string()));
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url =
                Url::parse(trimmed).map_err(|_| LoadError::InvalidLocation(raw.to_string()))?;
            return Ok(Self::Http(url));
        }
        let path = trimmed.strip_prefix("file://").unwrap_or(trimmed);
        Ok(Self::File(PathBuf::from(path)))
    }

    /// Build the matching source. `version` only affects HTTP requests.
    #[must_use]
    pub fn into_source(self, version: &str) -> Arc<dyn QuestionSource> {
        match self {
            Self::Http(url) => Arc::new(HttpQuestionSource::new(url, version)),
            Self::File(path) => Arc::new(FileQuestionSource::new(path)),
        }
    }
}

/// Fetches the pool over HTTP with a cache-busting version tag.
#[derive(Clone)]
pub struct HttpQuestionSource {
    client: Client,
    url: Url,
    version: String,
}

impl HttpQuestionSource {
    #[must_use]
    pub fn new(url: Url, version: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            version: version.into(),
        }
    }

    /// The URL actually requested, with `v=<version>` appended.
    #[must_use]
    pub fn request_url(&self) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("v", &self.version);
        url
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn load_pool(&self) -> Result<Vec<Question>, LoadError> {
        let response = self
            .client
            .get(self.request_url())
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LoadError::HttpStatus(response.status()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        self.request_url().to_string()
    }
}

/// Reads the pool from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileQuestionSource {
    path: PathBuf,
}

impl FileQuestionSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionSource for FileQuestionSource {
    async fn load_pool(&self) -> Result<Vec<Question>, LoadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a pool held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticQuestionSource {
    questions: Vec<Question>,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn load_pool(&self) -> Result<Vec<Question>, LoadError> {
        Ok(self.questions.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory pool ({} questions)", self.questions.len())
    }
}
