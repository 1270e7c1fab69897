//! Blocking document retrieval.
//!
//! Stages never talk HTTP directly: they go through [`DocumentFetcher`], so
//! engine tests can substitute canned responses. The real implementation is
//! a thin wrapper over a blocking reqwest client. Timeout policy lives here,
//! not in the pipeline.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A document retrieved from the service.
#[derive(Clone, Debug)]
pub struct FetchedDocument {
    pub url: Url,
    /// Raw `Content-Type` header value, if the server sent one.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Result of asking the service for a document.
#[derive(Clone, Debug)]
pub enum Fetch {
    Document(FetchedDocument),
    /// The resource does not exist (HTTP 404/410).
    Missing,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error fetching {url}")]
    Http {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected HTTP status {status} for {url}")]
    Status { url: Url, status: u16 },
}

/// Blocking fetch of one document. A fetch that never returns stalls the
/// pipeline; implementations are expected to carry their own timeout.
pub trait DocumentFetcher {
    fn fetch(&self, url: &Url) -> Result<Fetch, FetchError>;
}

/// Production fetcher over a blocking reqwest client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<HttpFetcher> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("volint/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Fetch, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|source| FetchError::Http {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if status.as_u16() == 404 || status.as_u16() == 410 {
            return Ok(Fetch::Missing);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .map_err(|source| FetchError::Http {
                url: url.clone(),
                source,
            })?
            .to_vec();
        Ok(Fetch::Document(FetchedDocument {
            url: url.clone(),
            content_type,
            body,
        }))
    }
}
