//! Configuration module for Crosstalk
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every setting has a default matching the production deployment, so
//! a config file is only needed to override something.
//!
//! # Example
//!
//! ```no_run
//! use crosstalk::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crosstalk.toml")).unwrap();
//! println!("Request budget: {}", config.scraper.max_requests);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, OutputConfig, ScraperConfig};

// Re-export parser functions
pub use parser::load_config;
