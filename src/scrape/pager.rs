//! Parent-comment pagination engine
//!
//! The comment API paginates by domain value: each follow-up page is
//! requested "after" the identifier of the last comment already received,
//! alongside a conventional offset. The engine threads a [`PageCursor`]
//! between fetches, accumulates the returned comments, and stops when the
//! server's declared total is reached or the request budget runs out.

use crate::client::{CommentRequest, Fetcher, TransportError};
use crate::config::Config;
use crate::model::{Comment, PageCursor};
use crate::scrape::politeness_delay;

/// How a parent crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every parent comment the server declared was retrieved
    Complete,

    /// The request budget ran out first; the result is a consistent prefix
    Truncated,
}

/// Result of walking all parent-comment pages
#[derive(Debug)]
pub struct ParentCrawl {
    /// Parent comments in server delivery order
    pub comments: Vec<Comment>,

    /// Page fetches issued, including request 0
    pub requests_used: usize,

    /// Parent total the server declared on the first page
    pub total_found: usize,

    /// Running sum of per-page returned counts
    pub total_returned: usize,

    pub completion: Completion,
}

impl ParentCrawl {
    pub fn is_truncated(&self) -> bool {
        self.completion == Completion::Truncated
    }
}

/// Drives the parent-comment page walk for one article
pub struct PaginationEngine<'a> {
    fetcher: &'a Fetcher,
    config: &'a Config,
    article_url: &'a str,
}

impl<'a> PaginationEngine<'a> {
    pub fn new(fetcher: &'a Fetcher, config: &'a Config, article_url: &'a str) -> Self {
        Self {
            fetcher,
            config,
            article_url,
        }
    }

    /// Fetches every parent-comment page within `max_requests`
    ///
    /// Request 0 is issued immediately with the start cursor; each further
    /// page waits out the politeness delay first. Hitting the budget before
    /// the declared total is reached is not an error: the crawl comes back
    /// tagged [`Completion::Truncated`] with everything fetched so far.
    pub async fn fetch_all_parents(
        &self,
        max_requests: usize,
    ) -> Result<ParentCrawl, TransportError> {
        tracing::info!("Beginning parent comment fetch for {}", self.article_url);

        let mut cursor = PageCursor::start();
        let request = CommentRequest::parents_page(self.article_url, cursor);
        let first = self.fetcher.fetch(&request).await?.results;
        let mut requests_used = 1;

        let total_found = first.total_parent_comments_found;
        let mut total_returned = first.total_parent_comments_returned;
        let mut comments = first.comments;

        while total_returned < total_found && requests_used < max_requests {
            // Start from the last comment of the previous page
            let last_seen = comments
                .last()
                .map(|c| c.comment_id)
                .unwrap_or(cursor.comment_sequence);
            cursor = cursor.advance(last_seen, requests_used, self.config.api.page_size);

            politeness_delay(&self.config.scraper).await;

            let request = CommentRequest::parents_page(self.article_url, cursor);
            let page = self.fetcher.fetch(&request).await?.results;

            total_returned += page.total_parent_comments_returned;
            comments.extend(page.comments);
            requests_used += 1;

            tracing::debug!(
                "Parent page {} done: {}/{} returned",
                requests_used,
                total_returned,
                total_found
            );
        }

        let completion = if total_returned < total_found {
            tracing::warn!(
                "Request budget of {} exhausted with {}/{} parents returned",
                max_requests,
                total_returned,
                total_found
            );
            Completion::Truncated
        } else {
            Completion::Complete
        };

        tracing::info!(
            "Fetched {} parent comments in {} requests",
            comments.len(),
            requests_used
        );

        Ok(ParentCrawl {
            comments,
            requests_used,
            total_found,
            total_returned,
            completion,
        })
    }
}
