use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use booksearch_kernel::settings::OpenLibrarySettings;
use thiserror::Error;

use super::{payload::SearchPayload, query::SearchParams};

/// Why a search call produced no data. Every kind ends the request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timed out. Please try again.")]
    Timeout,
    /// Connection, DNS or non-2xx status.
    #[error("Error fetching data from API: {0}")]
    Transport(String),
    /// Body was not JSON of the expected shape.
    #[error("Invalid response from API.")]
    Parse(String),
}

impl FetchError {
    /// Stable machine-readable code for this failure kind.
    pub const fn code(&self) -> &'static str {
        match self {
            FetchError::Timeout => "upstream_timeout",
            FetchError::Transport(_) => "upstream_unavailable",
            FetchError::Parse(_) => "upstream_invalid_response",
        }
    }
}

/// Source of raw search payloads.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn fetch(&self, params: &SearchParams) -> Result<SearchPayload, FetchError>;
}

/// Connection settings for [`OpenLibraryClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub search_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl From<&OpenLibrarySettings> for ClientConfig {
    fn from(settings: &OpenLibrarySettings) -> Self {
        Self {
            search_url: settings.search_url.clone(),
            user_agent: settings.user_agent.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

/// `reqwest`-backed client for the OpenLibrary search endpoint.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    search_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .context("failed to build OpenLibrary HTTP client")?;

        Ok(Self {
            http,
            search_url: config.search_url,
        })
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}

/// Decode a response body. A JSON `null` is an empty payload.
pub fn parse_payload(body: &[u8]) -> Result<SearchPayload, FetchError> {
    serde_json::from_slice::<Option<SearchPayload>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| FetchError::Parse(e.to_string()))
}

#[async_trait]
impl SearchClient for OpenLibraryClient {
    async fn fetch(&self, params: &SearchParams) -> Result<SearchPayload, FetchError> {
        tracing::debug!(url = %self.search_url, ?params, "querying OpenLibrary");

        let response = self
            .http
            .get(&self.search_url)
            .query(params.as_pairs())
            .send()
            .await
            .map_err(classify)?
            .error_for_status()
            .map_err(classify)?;

        let body = response.bytes().await.map_err(classify)?;

        parse_payload(&body).inspect_err(|e| {
            if let FetchError::Parse(detail) = e {
                tracing::warn!(%detail, "OpenLibrary returned an unreadable body");
            }
        })
    }
}
