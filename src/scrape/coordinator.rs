//! Run coordination and the partial-failure contract
//!
//! A run moves through `Init -> FetchingParents -> FetchingReplies ->
//! Persisted`, with `Failed` terminal from either fetching phase. On a
//! transport failure nothing partial is serialized: the coordinator leaves
//! an empty tombstone artifact at the expected output path (so downstream
//! can tell "attempted and failed" from "never ran") and propagates the
//! error to the caller.

use crate::client::{article_url, Fetcher};
use crate::config::Config;
use crate::scrape::pager::{Completion, PaginationEngine};
use crate::scrape::replies::ReplyCursor;
use crate::store::CommentStore;
use crate::ScrapeError;
use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};

/// Phase of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapePhase {
    Init,
    FetchingParents,
    FetchingReplies,
    Persisted,
    Failed,
}

impl fmt::Display for ScrapePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::FetchingParents => "fetching-parents",
            Self::FetchingReplies => "fetching-replies",
            Self::Persisted => "persisted",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub parents: usize,
    pub replies: usize,
    pub requests_used: usize,
    pub completion: Completion,
    pub output_path: PathBuf,
}

/// Composes fetching, reconciliation, and persistence into one run
pub struct Coordinator {
    config: Config,
    fetcher: Fetcher,
    article_url: String,
    puzzle_date: NaiveDate,
    max_requests: usize,
    phase: ScrapePhase,
}

impl Coordinator {
    /// Creates a coordinator for one puzzle date
    ///
    /// `max_requests` overrides the configured budget when given.
    pub fn new(
        config: Config,
        puzzle_date: NaiveDate,
        max_requests: Option<usize>,
    ) -> Result<Self, ScrapeError> {
        let fetcher = Fetcher::new(&config.api)?;
        let article_url = article_url(puzzle_date);
        let max_requests = max_requests.unwrap_or(config.scraper.max_requests);

        Ok(Self {
            config,
            fetcher,
            article_url,
            puzzle_date,
            max_requests,
            phase: ScrapePhase::Init,
        })
    }

    /// The artifact path for this run's date
    pub fn output_path(&self) -> PathBuf {
        Path::new(&self.config.output.directory).join(format!(
            "comments-{}.json",
            self.puzzle_date.format("%Y-%m-%d")
        ))
    }

    /// The article URL this run scrapes comments for
    pub fn article_url(&self) -> &str {
        &self.article_url
    }

    pub fn phase(&self) -> ScrapePhase {
        self.phase
    }

    /// Runs the scrape end to end
    ///
    /// A transport failure in either fetching phase aborts the run, writes
    /// the empty tombstone, and is returned to the caller. Only a run that
    /// completes both phases serializes anything.
    pub async fn run(&mut self) -> Result<ScrapeReport, ScrapeError> {
        std::fs::create_dir_all(&self.config.output.directory)?;

        match self.execute().await {
            Ok(report) => Ok(report),
            Err(err @ ScrapeError::Transport(_)) => {
                self.transition(ScrapePhase::Failed);
                let output_path = self.output_path();
                tracing::error!(
                    "{} while scraping {}, touching {} and exiting",
                    err,
                    self.article_url,
                    output_path.display()
                );
                if let Err(io_err) = CommentStore::write_tombstone(&output_path) {
                    tracing::error!("Failed to write tombstone: {}", io_err);
                }
                Err(err)
            }
            Err(other) => Err(other),
        }
    }

    async fn execute(&mut self) -> Result<ScrapeReport, ScrapeError> {
        self.transition(ScrapePhase::FetchingParents);
        let engine = PaginationEngine::new(&self.fetcher, &self.config, &self.article_url);
        let crawl = engine.fetch_all_parents(self.max_requests).await?;

        let mut comments = crawl.comments;
        for comment in &mut comments {
            comment.puzzle_date = Some(self.puzzle_date);
        }

        self.transition(ScrapePhase::FetchingReplies);
        let cursor = ReplyCursor::new(
            &self.fetcher,
            &self.config,
            &self.article_url,
            self.puzzle_date,
        );
        let mut replies = Vec::new();
        for comment in &mut comments {
            replies.extend(cursor.resolve_replies(comment).await?);
        }

        let mut store = CommentStore::new(self.puzzle_date);
        store.add_parents(comments);
        store.add_replies(replies);

        let output_path = self.output_path();
        store.serialize(&output_path)?;
        self.transition(ScrapePhase::Persisted);

        tracing::info!(
            "Persisted {} parents and {} replies to {}",
            store.parent_count(),
            store.reply_count(),
            output_path.display()
        );

        Ok(ScrapeReport {
            parents: store.parent_count(),
            replies: store.reply_count(),
            requests_used: crawl.requests_used,
            completion: crawl.completion,
            output_path,
        })
    }

    fn transition(&mut self, next: ScrapePhase) {
        tracing::debug!("Run phase {} -> {}", self.phase, next);
        self.phase = next;
    }
}
