use crate::config::types::{ApiConfig, Config, OutputConfig, ScraperConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Endpoint must be http(s), got '{}'",
            config.endpoint
        )));
    }

    if config.page_size < 1 || config.page_size > 100 {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and 100, got {}",
            config.page_size
        )));
    }

    if config.reply_page_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "reply_page_limit must be >= 1, got {}",
            config.reply_page_limit
        )));
    }

    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_requests < 1 {
        return Err(ConfigError::Validation(format!(
            "max_requests must be >= 1, got {}",
            config.max_requests
        )));
    }

    if config.delay_min_ms + config.delay_jitter_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "pre-request delay may not exceed 60s, got {}ms + {}ms jitter",
            config.delay_min_ms, config.delay_jitter_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
