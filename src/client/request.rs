//! Request descriptors for the comment API
//!
//! Every call to the API is described by an immutable [`CommentRequest`]
//! constructed fresh for that call. The descriptor owns all query parameters
//! and the referer, so no ambient parameter state is shared between calls.

use crate::model::{CommentId, PageCursor};
use chrono::{Duration, NaiveDate};

/// The two commands the comment API understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiCommand {
    /// A page of parent comments (with inline replies)
    GetCommentsAll,

    /// The reply list of a single parent comment
    GetRepliesBySequence,
}

impl ApiCommand {
    fn as_str(self) -> &'static str {
        match self {
            Self::GetCommentsAll => "GetCommentsAll",
            Self::GetRepliesBySequence => "GetRepliesBySequence",
        }
    }
}

/// An immutable descriptor for one GET against the comment API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRequest {
    article_url: String,
    cmd: ApiCommand,
    comment_sequence: CommentId,
    offset: u32,
    limit: Option<u32>,
}

impl CommentRequest {
    /// Descriptor for one page of parent comments at `cursor`
    pub fn parents_page(article_url: &str, cursor: PageCursor) -> Self {
        Self {
            article_url: article_url.to_string(),
            cmd: ApiCommand::GetCommentsAll,
            comment_sequence: cursor.comment_sequence,
            offset: cursor.offset,
            limit: cursor.limit,
        }
    }

    /// Descriptor for the follow-up reply fetch of one parent comment
    pub fn replies_for(article_url: &str, parent: CommentId, offset: u32, limit: u32) -> Self {
        Self {
            article_url: article_url.to_string(),
            cmd: ApiCommand::GetRepliesBySequence,
            comment_sequence: parent,
            offset,
            limit: Some(limit),
        }
    }

    /// The article URL, also used as the per-request referer
    pub fn referer(&self) -> &str {
        &self.article_url
    }

    /// Query parameters for this request, in wire form
    ///
    /// Parent-page calls carry `includeReplies` and `sort`; reply calls do
    /// not. `limit` is only sent when the cursor carries one.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("url", self.article_url.clone()),
            ("method", "get".to_string()),
            ("commentSequence", self.comment_sequence.to_string()),
            ("offset", self.offset.to_string()),
        ];

        if self.cmd == ApiCommand::GetCommentsAll {
            params.push(("includeReplies", "true".to_string()));
            params.push(("sort", "oldest".to_string()));
        }

        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }

        params.push(("cmd", self.cmd.as_str().to_string()));
        params
    }
}

/// Derives the article URL for a puzzle date
///
/// The puzzle dated `D` is published the evening before, so it lives under
/// the previous day's path segment while the page slug carries `D` itself.
pub fn article_url(puzzle_date: NaiveDate) -> String {
    let published = puzzle_date - Duration::days(1);
    format!(
        "https://www.nytimes.com/{}/crosswords/daily-puzzle-{}.html",
        published.format("%Y/%m/%d"),
        puzzle_date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_first_parents_page_omits_limit() {
        let request = CommentRequest::parents_page("https://example.com/a.html", PageCursor::start());
        let params = request.query();

        assert_eq!(param(&params, "url"), Some("https://example.com/a.html"));
        assert_eq!(param(&params, "method"), Some("get"));
        assert_eq!(param(&params, "commentSequence"), Some("0"));
        assert_eq!(param(&params, "offset"), Some("0"));
        assert_eq!(param(&params, "includeReplies"), Some("true"));
        assert_eq!(param(&params, "sort"), Some("oldest"));
        assert_eq!(param(&params, "cmd"), Some("GetCommentsAll"));
        assert_eq!(param(&params, "limit"), None);
    }

    #[test]
    fn test_follow_up_parents_page_carries_limit() {
        let cursor = PageCursor::start().advance(CommentId(321), 1, 25);
        let request = CommentRequest::parents_page("https://example.com/a.html", cursor);
        let params = request.query();

        assert_eq!(param(&params, "commentSequence"), Some("321"));
        assert_eq!(param(&params, "offset"), Some("25"));
        assert_eq!(param(&params, "limit"), Some("25"));
    }

    #[test]
    fn test_replies_request_shape() {
        let request = CommentRequest::replies_for("https://example.com/a.html", CommentId(7), 3, 25);
        let params = request.query();

        assert_eq!(param(&params, "commentSequence"), Some("7"));
        assert_eq!(param(&params, "offset"), Some("3"));
        assert_eq!(param(&params, "limit"), Some("25"));
        assert_eq!(param(&params, "cmd"), Some("GetRepliesBySequence"));
        // Reply calls never ask for inline replies or a sort order
        assert_eq!(param(&params, "includeReplies"), None);
        assert_eq!(param(&params, "sort"), None);
    }

    #[test]
    fn test_article_url_uses_previous_day_path() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(
            article_url(date),
            "https://www.nytimes.com/2024/03/09/crosswords/daily-puzzle-2024-03-10.html"
        );
    }

    #[test]
    fn test_article_url_pads_across_month_boundary() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            article_url(date),
            "https://www.nytimes.com/2024/02/29/crosswords/daily-puzzle-2024-03-01.html"
        );
    }
}
