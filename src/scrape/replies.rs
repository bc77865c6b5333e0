//! Per-parent reply reconciliation
//!
//! Parent pages arrive with inline reply lists the server may have
//! truncated. For each parent whose inline list is short of its declared
//! reply count, exactly one follow-up request retrieves the rest. The merged
//! list is then detached from the parent: replies leave this module as
//! sibling-level records stamped with the article's puzzle date.

use crate::client::{CommentRequest, Fetcher, TransportError};
use crate::config::Config;
use crate::model::{Comment, CommentId, Reply};
use crate::scrape::politeness_delay;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Resolves the full reply list of parent comments, one at a time
pub struct ReplyCursor<'a> {
    fetcher: &'a Fetcher,
    config: &'a Config,
    article_url: &'a str,
    puzzle_date: NaiveDate,
}

impl<'a> ReplyCursor<'a> {
    pub fn new(
        fetcher: &'a Fetcher,
        config: &'a Config,
        article_url: &'a str,
        puzzle_date: NaiveDate,
    ) -> Self {
        Self {
            fetcher,
            config,
            article_url,
            puzzle_date,
        }
    }

    /// Completes, detaches, and stamps the reply list of one parent
    ///
    /// Issues the follow-up request only when the inline list is short of
    /// the declared count. Fetched replies are merged by identifier union:
    /// a reply whose id is already inline is dropped, so an overlapping
    /// follow-up page cannot double-count. The parent's own reply list is
    /// left empty.
    pub async fn resolve_replies(
        &self,
        comment: &mut Comment,
    ) -> Result<Vec<Reply>, TransportError> {
        if comment.has_missing_replies() {
            tracing::info!(
                "Fetching replies for comment {} ({}/{} inline)",
                comment.comment_id,
                comment.replies.len(),
                comment.reply_count
            );

            politeness_delay(&self.config.scraper).await;

            let request = CommentRequest::replies_for(
                self.article_url,
                comment.comment_id,
                self.config.api.reply_page_offset,
                self.config.api.reply_page_limit,
            );
            let results = self.fetcher.fetch(&request).await?.results;

            let fetched = results
                .comments
                .into_iter()
                .next()
                .ok_or_else(|| TransportError::Malformed {
                    url: self.article_url.to_string(),
                    message: format!(
                        "reply response for comment {} contained no comment",
                        comment.comment_id
                    ),
                })?
                .replies;

            let seen: HashSet<CommentId> =
                comment.replies.iter().map(|r| r.comment_id).collect();
            comment
                .replies
                .extend(fetched.into_iter().filter(|r| !seen.contains(&r.comment_id)));
        }

        let mut replies = std::mem::take(&mut comment.replies);
        for reply in &mut replies {
            reply.puzzle_date = Some(self.puzzle_date);
        }
        Ok(replies)
    }
}
