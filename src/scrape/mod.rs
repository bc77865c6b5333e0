//! Scrape module, the paginated retrieval core
//!
//! This module contains the control-flow heart of the crate, including:
//! - The parent-comment page walk with its request budget
//! - Per-parent reply reconciliation
//! - The end-to-end run coordination and its partial-failure contract

mod coordinator;
mod pager;
mod replies;

pub use coordinator::{Coordinator, ScrapePhase, ScrapeReport};
pub use pager::{Completion, PaginationEngine, ParentCrawl};
pub use replies::ReplyCursor;

use crate::config::{Config, ScraperConfig};
use crate::ScrapeError;
use chrono::NaiveDate;
use std::time::Duration;

/// Runs a complete scrape for one puzzle date
///
/// This is the main entry point. It will:
/// 1. Derive the article URL from the puzzle date
/// 2. Walk the parent-comment pages under the request budget
/// 3. Reconcile truncated reply lists, one follow-up per parent
/// 4. Flatten and persist the record collection
///
/// On a transport failure an empty tombstone artifact is left at the output
/// path and the error is propagated.
pub async fn scrape(
    config: Config,
    puzzle_date: NaiveDate,
    max_requests: Option<usize>,
) -> Result<ScrapeReport, ScrapeError> {
    let mut coordinator = Coordinator::new(config, puzzle_date, max_requests)?;
    coordinator.run().await
}

/// Sleeps the randomized pre-request delay
///
/// Uniform in `[delay_min_ms, delay_min_ms + delay_jitter_ms)`. This is the
/// only rate-limit avoidance the scraper has; requests are never retried.
pub(crate) async fn politeness_delay(scraper: &ScraperConfig) {
    let jitter = if scraper.delay_jitter_ms == 0 {
        0
    } else {
        fastrand::u64(0..scraper.delay_jitter_ms)
    };
    tokio::time::sleep(Duration::from_millis(scraper.delay_min_ms + jitter)).await;
}
