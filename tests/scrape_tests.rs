//! Integration tests for the scraper
//!
//! These tests use wiremock to mock the comment API and exercise the full
//! scrape cycle end-to-end: pagination, reply reconciliation, persistence,
//! and the tombstone contract.

use chrono::NaiveDate;
use crosstalk::client::Fetcher;
use crosstalk::config::Config;
use crosstalk::model::{Comment, CommentId, CommentRecord};
use crosstalk::scrape::{scrape, Completion, PaginationEngine, ReplyCursor};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE_URL: &str = "https://example.com/2024/03/09/crosswords/daily-puzzle-2024-03-10.html";

fn puzzle_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

/// Creates a test configuration pointed at the mock server
fn create_test_config(server: &MockServer, output_dir: &str) -> Config {
    let mut config = Config::default();
    config.api.endpoint = format!("{}/svc", server.uri());
    // Very short delays for testing
    config.scraper.delay_min_ms = 0;
    config.scraper.delay_jitter_ms = 1;
    config.output.directory = output_dir.to_string();
    config
}

fn comment_json(id: u64, reply_count: usize, replies: Vec<Value>) -> Value {
    json!({
        "commentID": id,
        "commentBody": format!("comment {}", id),
        "recommendations": 1,
        "replyCount": reply_count,
        "replies": replies,
    })
}

fn reply_json(id: u64) -> Value {
    json!({
        "commentID": id,
        "commentBody": format!("reply {}", id),
        "recommendations": 0,
        "replyCount": 0,
        "replies": [],
    })
}

fn parents_envelope(comments: Vec<Value>, found: usize, returned: usize) -> Value {
    json!({
        "results": {
            "comments": comments,
            "totalParentCommentsFound": found,
            "totalParentCommentsReturned": returned,
        }
    })
}

fn replies_envelope(parent_id: u64, replies: Vec<Value>) -> Value {
    json!({
        "results": {
            "comments": [{
                "commentID": parent_id,
                "replies": replies,
            }]
        }
    })
}

#[tokio::test]
async fn test_full_scrape_writes_flattened_artifact() {
    let mock_server = MockServer::start().await;

    let comments = vec![
        comment_json(1, 1, vec![reply_json(10)]),
        comment_json(2, 0, vec![]),
    ];
    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetCommentsAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parents_envelope(comments, 2, 2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, dir.path().to_str().unwrap());

    let report = scrape(config, puzzle_date(), None).await.unwrap();

    assert_eq!(report.parents, 2);
    assert_eq!(report.replies, 1);
    assert_eq!(report.requests_used, 1);
    assert_eq!(report.completion, Completion::Complete);

    let content = std::fs::read_to_string(&report.output_path).unwrap();
    let records: Vec<CommentRecord> = serde_json::from_str(&content).unwrap();

    // Parents first, then all replies, in delivery order
    let ids: Vec<u64> = records.iter().map(|r| r.comment_id.0).collect();
    assert_eq!(ids, vec![1, 2, 10]);

    // Every record carries the puzzle date in string form
    assert!(records.iter().all(|r| r.puzzle_date == "2024-03-10"));

    // The flattened artifact has no nested reply lists left
    let raw: Vec<Value> = serde_json::from_str(&content).unwrap();
    assert!(raw.iter().all(|record| record.get("replies").is_none()));
}

#[tokio::test]
async fn test_budget_truncation_is_not_an_error() {
    let mock_server = MockServer::start().await;

    // Server declares 60 parents; pages of 25 mean a budget of 2 stops at 50
    let page0: Vec<Value> = (1..=25).map(|id| comment_json(id, 0, vec![])).collect();
    let page1: Vec<Value> = (26..=50).map(|id| comment_json(id, 0, vec![])).collect();

    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetCommentsAll"))
        .and(query_param("commentSequence", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parents_envelope(page0, 60, 25)))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Page 1 resumes after the last comment of page 0, at offset 25
    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetCommentsAll"))
        .and(query_param("commentSequence", "25"))
        .and(query_param("offset", "25"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parents_envelope(page1, 60, 25)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, "unused");
    let fetcher = Fetcher::new(&config.api).unwrap();
    let engine = PaginationEngine::new(&fetcher, &config, ARTICLE_URL);

    let crawl = engine.fetch_all_parents(2).await.unwrap();

    assert_eq!(crawl.requests_used, 2);
    assert_eq!(crawl.comments.len(), 50);
    assert_eq!(crawl.total_found, 60);
    assert_eq!(crawl.total_returned, 50);
    assert_eq!(crawl.completion, Completion::Truncated);
    assert!(crawl.is_truncated());
}

#[tokio::test]
async fn test_pagination_runs_to_completion() {
    let mock_server = MockServer::start().await;

    let page0: Vec<Value> = (1..=25).map(|id| comment_json(id, 0, vec![])).collect();
    let page1: Vec<Value> = (26..=30).map(|id| comment_json(id, 0, vec![])).collect();

    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("commentSequence", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parents_envelope(page0, 30, 25)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("commentSequence", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parents_envelope(page1, 30, 5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, "unused");
    let fetcher = Fetcher::new(&config.api).unwrap();
    let engine = PaginationEngine::new(&fetcher, &config, ARTICLE_URL);

    let crawl = engine.fetch_all_parents(10).await.unwrap();

    assert_eq!(crawl.requests_used, 2);
    assert_eq!(crawl.comments.len(), 30);
    assert_eq!(crawl.completion, Completion::Complete);
}

#[tokio::test]
async fn test_reply_followup_merges_and_stamps() {
    let mock_server = MockServer::start().await;

    // The follow-up overlaps the inline list at id 103; the union must not
    // double-count it.
    let fetched: Vec<Value> = (103..=110).map(reply_json).collect();
    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetRepliesBySequence"))
        .and(query_param("commentSequence", "7"))
        .and(query_param("offset", "3"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(replies_envelope(7, fetched)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, "unused");
    let fetcher = Fetcher::new(&config.api).unwrap();
    let cursor = ReplyCursor::new(&fetcher, &config, ARTICLE_URL, puzzle_date());

    let mut comment: Comment = serde_json::from_value(comment_json(
        7,
        10,
        vec![reply_json(101), reply_json(102), reply_json(103)],
    ))
    .unwrap();

    let replies = cursor.resolve_replies(&mut comment).await.unwrap();

    let ids: Vec<u64> = replies.iter().map(|r| r.comment_id.0).collect();
    assert_eq!(ids, (101..=110).collect::<Vec<u64>>());
    assert!(replies.iter().all(|r| r.puzzle_date == Some(puzzle_date())));

    // The list was detached from the parent
    assert!(comment.replies.is_empty());
}

#[tokio::test]
async fn test_no_followup_when_replies_complete() {
    let mock_server = MockServer::start().await;

    let comments = vec![comment_json(1, 2, vec![reply_json(10), reply_json(11)])];
    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetCommentsAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parents_envelope(comments, 1, 1)))
        .mount(&mock_server)
        .await;

    // A parent whose inline list already matches its declared count must not
    // trigger a reply request.
    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetRepliesBySequence"))
        .respond_with(ResponseTemplate::new(200).set_body_json(replies_envelope(1, vec![])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, dir.path().to_str().unwrap());

    let report = scrape(config, puzzle_date(), None).await.unwrap();
    assert_eq!(report.parents, 1);
    assert_eq!(report.replies, 2);
}

#[tokio::test]
async fn test_first_page_failure_leaves_empty_tombstone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/svc"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, dir.path().to_str().unwrap());

    let result = scrape(config, puzzle_date(), None).await;
    assert!(result.is_err());

    let artifact = dir.path().join("comments-2024-03-10.json");
    assert!(artifact.exists());
    assert_eq!(std::fs::metadata(&artifact).unwrap().len(), 0);
}

#[tokio::test]
async fn test_reply_failure_leaves_empty_tombstone() {
    let mock_server = MockServer::start().await;

    // One parent short of its declared reply count forces a follow-up
    let comments = vec![comment_json(1, 5, vec![reply_json(10)])];
    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetCommentsAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parents_envelope(comments, 1, 1)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetRepliesBySequence"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, dir.path().to_str().unwrap());

    let result = scrape(config, puzzle_date(), None).await;
    assert!(result.is_err());

    let artifact = dir.path().join("comments-2024-03-10.json");
    assert!(artifact.exists());
    assert_eq!(std::fs::metadata(&artifact).unwrap().len(), 0);
}

#[tokio::test]
async fn test_empty_thread_is_a_valid_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetCommentsAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parents_envelope(vec![], 0, 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, dir.path().to_str().unwrap());

    let report = scrape(config, puzzle_date(), None).await.unwrap();

    assert_eq!(report.parents, 0);
    assert_eq!(report.replies, 0);
    assert_eq!(report.requests_used, 1);
    assert_eq!(report.completion, Completion::Complete);

    let content = std::fs::read_to_string(&report.output_path).unwrap();
    let records: Vec<CommentRecord> = serde_json::from_str(&content).unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_a_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/svc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, dir.path().to_str().unwrap());

    let result = scrape(config, puzzle_date(), None).await;
    assert!(result.is_err());

    // Malformed bodies are normalized into the same fatal kind as HTTP
    // failures: the run tombstones and aborts.
    let artifact = dir.path().join("comments-2024-03-10.json");
    assert!(artifact.exists());
    assert_eq!(std::fs::metadata(&artifact).unwrap().len(), 0);
}

#[tokio::test]
async fn test_reply_envelope_without_comment_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetRepliesBySequence"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": {"comments": []}})),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, "unused");
    let fetcher = Fetcher::new(&config.api).unwrap();
    let cursor = ReplyCursor::new(&fetcher, &config, ARTICLE_URL, puzzle_date());

    let mut comment: Comment = serde_json::from_value(comment_json(9, 4, vec![])).unwrap();
    let result = cursor.resolve_replies(&mut comment).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_artifact_overwrites_previous_tombstone() {
    let mock_server = MockServer::start().await;

    let comments = vec![comment_json(1, 0, vec![])];
    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(query_param("cmd", "GetCommentsAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parents_envelope(comments, 1, 1)))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    // A failed earlier run left a tombstone at the same path
    std::fs::write(dir.path().join("comments-2024-03-10.json"), "").unwrap();

    let config = create_test_config(&mock_server, dir.path().to_str().unwrap());
    let report = scrape(config, puzzle_date(), None).await.unwrap();

    let content = std::fs::read_to_string(&report.output_path).unwrap();
    let records: Vec<CommentRecord> = serde_json::from_str(&content).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].comment_id, CommentId(1));
}
