//! Data model for the comment thread
//!
//! This module defines the typed shapes of everything that crosses the wire
//! or lands on disk:
//! - Parent comments and their (possibly incomplete) inline replies
//! - The response envelope returned by the comment API
//! - The pagination cursor threaded between page fetches
//! - The flattened records written to the output artifact

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned comment identifier
///
/// Identifiers are totally ordered by server insertion, which is what makes
/// them usable as the pagination cursor: every parent page is requested
/// "starting after" the last identifier already received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A parent comment as returned by the API
///
/// The inline `replies` list may be incomplete; the server truncates it and
/// declares the real total in `reply_count`. Reconciliation is the reply
/// cursor's job. `puzzle_date` is not on the wire; it is stamped once all
/// parent pages have been collected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "commentID")]
    pub comment_id: CommentId,

    #[serde(default)]
    pub comment_body: String,

    /// Recommendation/approval count
    #[serde(default)]
    pub recommendations: u32,

    /// Number of replies the server claims this comment has
    #[serde(default)]
    pub reply_count: usize,

    #[serde(default)]
    pub replies: Vec<Reply>,

    #[serde(skip)]
    pub puzzle_date: Option<NaiveDate>,
}

impl Comment {
    /// True when the inline reply list is short of the declared total
    pub fn has_missing_replies(&self) -> bool {
        self.replies.len() < self.reply_count
    }
}

/// A reply to a parent comment
///
/// Same shape as [`Comment`] minus the nested reply list. The API does send
/// one further (empty, irrelevant) `replies` level on each reply; typed
/// deserialization drops it, so a `Reply` never carries nested replies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(rename = "commentID")]
    pub comment_id: CommentId,

    #[serde(default)]
    pub comment_body: String,

    #[serde(default)]
    pub recommendations: u32,

    #[serde(default)]
    pub reply_count: usize,

    #[serde(skip)]
    pub puzzle_date: Option<NaiveDate>,
}

/// Pagination cursor for the parent-comment page walk
///
/// The cursor is advanced by value: `advance` consumes the old cursor and
/// returns the next one, so a page fetch can never observe a half-updated
/// cursor. `limit` is absent on the very first request and fixed to the page
/// size from the second request on, matching the API's expected traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Identifier of the last comment received so far (0 at start)
    pub comment_sequence: CommentId,

    /// Page index times page size
    pub offset: u32,

    pub limit: Option<u32>,
}

impl PageCursor {
    /// Cursor for request 0
    pub fn start() -> Self {
        Self {
            comment_sequence: CommentId(0),
            offset: 0,
            limit: None,
        }
    }

    /// Next cursor, positioned after `last_seen`
    ///
    /// `requests_used` is the number of requests already issued, so the new
    /// offset is `page_size * requests_used`.
    pub fn advance(self, last_seen: CommentId, requests_used: usize, page_size: u32) -> Self {
        Self {
            comment_sequence: last_seen,
            offset: page_size * requests_used as u32,
            limit: Some(page_size),
        }
    }
}

/// Top-level response envelope from the comment API
#[derive(Debug, Clone, Deserialize)]
pub struct CommentEnvelope {
    pub results: CommentResults,
}

/// Payload of a comment API response
///
/// Parent-page calls populate all three fields; reply calls return the
/// parent comment (with its reply list) as `comments[0]` and leave the
/// totals at zero.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResults {
    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub total_parent_comments_found: usize,

    #[serde(default)]
    pub total_parent_comments_returned: usize,
}

/// One flattened record of the output artifact
///
/// Parents and replies share this shape: the nested reply list is gone and
/// the puzzle date has been turned into its string form, so every field is a
/// primitive the downstream sinks can ingest directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    #[serde(rename = "commentID")]
    pub comment_id: CommentId,
    pub comment_body: String,
    pub recommendations: u32,
    pub reply_count: usize,
    pub puzzle_date: String,
}

impl CommentRecord {
    pub fn from_comment(comment: &Comment, puzzle_date: NaiveDate) -> Self {
        Self {
            comment_id: comment.comment_id,
            comment_body: comment.comment_body.clone(),
            recommendations: comment.recommendations,
            reply_count: comment.reply_count,
            puzzle_date: puzzle_date.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn from_reply(reply: &Reply, puzzle_date: NaiveDate) -> Self {
        Self {
            comment_id: reply.comment_id,
            comment_body: reply.comment_body.clone(),
            recommendations: reply.recommendations,
            reply_count: reply.reply_count,
            puzzle_date: puzzle_date.format("%Y-%m-%d").to_string(),
        }
    }
}
