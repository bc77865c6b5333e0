//! Crosstalk: a crossword comment harvester
//!
//! This crate retrieves every user comment (parents and their nested replies)
//! attached to a dated crossword-puzzle article from the paginated community
//! comment API, and persists them as one normalized JSON record collection
//! per puzzle date.

pub mod client;
pub mod config;
pub mod model;
pub mod scrape;
pub mod store;

use thiserror::Error;

/// Main error type for Crosstalk operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] client::TransportError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Crosstalk operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::{article_url, CommentRequest, Fetcher, TransportError};
pub use config::Config;
pub use model::{Comment, CommentId, CommentRecord, PageCursor, Reply};
pub use scrape::{scrape, Completion, Coordinator, ScrapePhase, ScrapeReport};
pub use store::CommentStore;
