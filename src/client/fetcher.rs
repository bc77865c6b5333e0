//! HTTP fetcher implementation
//!
//! This module handles the single network primitive the scraper needs:
//! issue one authenticated GET described by a [`CommentRequest`] and decode
//! the JSON envelope. Failures are classified into [`TransportError`] and
//! never retried; the only resilience mechanism lives upstream, in the
//! randomized pre-request delay.

use crate::client::request::CommentRequest;
use crate::config::ApiConfig;
use crate::model::CommentEnvelope;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// The comment endpoint expects a browser, not a bot
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/42.0.2311.135 Safari/537.36 Edge/12.246";

/// Transport failures, the only modeled error kind for a scrape run
///
/// A malformed body is not distinguished from an HTTP failure downstream:
/// both abort the run the same way.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {message}")]
    Malformed { url: String, message: String },
}

/// Builds the HTTP client shared by every request of a run
///
/// The client carries explicit request and connect deadlines so a stalled
/// call cannot hang a run on transport defaults.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues single GETs against the comment API endpoint
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    endpoint: Url,
}

impl Fetcher {
    /// Creates a fetcher bound to the configured endpoint
    pub fn new(api: &ApiConfig) -> crate::Result<Self> {
        let endpoint = Url::parse(&api.endpoint)?;
        let client = build_http_client()?;
        Ok(Self { client, endpoint })
    }

    /// Issues one GET for `request` and decodes the response envelope
    ///
    /// Any non-2xx status, network failure, or undecodable body is a
    /// [`TransportError`].
    pub async fn fetch(&self, request: &CommentRequest) -> Result<CommentEnvelope, TransportError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&request.query())
            .header(REFERER, request.referer())
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: self.endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        tracing::info!("Got status code {}", status.as_u16());

        if !status.is_success() {
            return Err(TransportError::Status {
                url: self.endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Request {
                url: self.endpoint.to_string(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|e| TransportError::Malformed {
            url: self.endpoint.to_string(),
            message: e.to_string(),
        })
    }

    /// The endpoint this fetcher talks to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}
