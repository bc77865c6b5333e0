use serde::Deserialize;

/// Main configuration structure for Crosstalk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
}

/// Comment API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Comment service endpoint
    pub endpoint: String,

    /// Parent comments per page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Fixed offset for the single reply follow-up request
    #[serde(rename = "reply-page-offset")]
    pub reply_page_offset: u32,

    /// Fixed limit for the single reply follow-up request
    #[serde(rename = "reply-page-limit")]
    pub reply_page_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.nytimes.com/svc/community/V3/requestHandler".to_string(),
            page_size: 25,
            reply_page_offset: 3,
            reply_page_limit: 25,
        }
    }
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Hard budget on parent-page requests per run
    #[serde(rename = "max-requests")]
    pub max_requests: usize,

    /// Lower bound of the randomized pre-request delay (milliseconds)
    #[serde(rename = "delay-min-ms")]
    pub delay_min_ms: u64,

    /// Width of the uniform jitter added on top of the lower bound
    #[serde(rename = "delay-jitter-ms")]
    pub delay_jitter_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            delay_min_ms: 500,
            delay_jitter_ms: 1000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the per-date artifacts are written into
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "comments".to_string(),
        }
    }
}
