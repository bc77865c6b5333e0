//! HTTP client for the community comment API
//!
//! This module contains the transport layer, including:
//! - Building the HTTP client with browser-equivalent headers and timeouts
//! - Immutable per-call request descriptors
//! - Article URL derivation from the puzzle date
//! - Single-GET fetching with typed failure classification
//!
//! There is deliberately no retry logic here: one descriptor, one request,
//! one decoded envelope or one [`TransportError`].

mod fetcher;
mod request;

pub use fetcher::{build_http_client, Fetcher, TransportError};
pub use request::{article_url, CommentRequest};
