//! End-to-end `tools/call` tests: deterministic time tools and a corpus
//! loaded from disk through `KNOWLEDGE_PATH`-style configuration.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mcp_server_http_time::{build_router, AppState, Config};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

fn app_with(config: Config) -> Router {
    let state = AppState::new(config).expect("Failed to create AppState");
    build_router(Arc::new(state))
}

/// Call a tool and return `(isError, first text block)`.
async fn call(app: Router, name: &str, arguments: Value) -> (bool, String) {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    });
    let req = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let reply: Value = serde_json::from_slice(&bytes).unwrap();
    let result = &reply["result"];
    (
        result["isError"].as_bool().unwrap(),
        result["content"][0]["text"].as_str().unwrap().to_string(),
    )
}

fn payload(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

// ============================================================================
// Time tools
// ============================================================================

#[tokio::test]
async fn test_convert_time_across_date_line() {
    let (is_error, text) = call(
        app_with(Config::default()),
        "convert_time",
        json!({
            "sourceTimezone": "America/Los_Angeles",
            "targetTimezone": "Asia/Tokyo",
            "time": "2025-06-22 15:30:00"
        }),
    )
    .await;

    assert!(!is_error);
    let body = payload(&text);
    assert_eq!(body["convertedTime"], "2025-06-23 07:30:00");
    assert_eq!(body["hourDifference"], 16);
}

#[tokio::test]
async fn test_convert_time_missing_argument() {
    let (is_error, text) = call(
        app_with(Config::default()),
        "convert_time",
        json!({"sourceTimezone": "UTC", "targetTimezone": "Asia/Tokyo"}),
    )
    .await;

    assert!(is_error);
    assert_eq!(text, "Tool execution error: Missing required argument: time");
}

#[tokio::test]
async fn test_current_time_rejects_unknown_zone() {
    let (is_error, text) = call(
        app_with(Config::default()),
        "current_time",
        json!({"timezone": "Mars/Olympus_Mons"}),
    )
    .await;

    assert!(is_error);
    assert!(text.starts_with("Tool execution error: "));
    assert!(text.contains("Mars/Olympus_Mons"));
}

#[tokio::test]
async fn test_current_time_reports_zone() {
    let (is_error, text) = call(
        app_with(Config::default()),
        "current_time",
        json!({"timezone": "Europe/Berlin", "format": "YYYY"}),
    )
    .await;

    assert!(!is_error);
    let body = payload(&text);
    assert_eq!(body["timezone"], "Europe/Berlin");
    assert_eq!(body["utcTime"].as_str().unwrap().len(), 4);
}

#[tokio::test]
async fn test_days_in_month_leap_february() {
    let (_, text) = call(
        app_with(Config::default()),
        "days_in_month",
        json!({"date": "2024-02-10"}),
    )
    .await;

    assert_eq!(payload(&text)["days"], 29);
}

#[tokio::test]
async fn test_get_timestamp_epoch_millis() {
    let (_, text) = call(
        app_with(Config::default()),
        "get_timestamp",
        json!({"time": "2025-01-01T00:00:00Z"}),
    )
    .await;

    assert_eq!(payload(&text)["timestamp"], 1_735_689_600_000_i64);
}

#[tokio::test]
async fn test_get_timestamp_uses_default_timezone() {
    let config = Config {
        default_timezone: chrono_tz::Asia::Tokyo,
        ..Config::default()
    };
    let (_, text) = call(
        app_with(config),
        "get_timestamp",
        json!({"time": "2025-01-01 09:00:00"}),
    )
    .await;

    assert_eq!(payload(&text)["timestamp"], 1_735_689_600_000_i64);
}

#[tokio::test]
async fn test_get_week_year_locale_and_iso() {
    let (_, text) = call(
        app_with(Config::default()),
        "get_week_year",
        json!({"date": "2025-06-22"}),
    )
    .await;

    let body = payload(&text);
    assert_eq!(body["week"], 26);
    assert_eq!(body["isoWeek"], 25);
}

#[tokio::test]
async fn test_relative_time_far_past() {
    let (is_error, text) = call(
        app_with(Config::default()),
        "relative_time",
        json!({"time": "1990-01-01T00:00:00Z"}),
    )
    .await;

    assert!(!is_error);
    let phrase = payload(&text)["relativeTime"].as_str().unwrap().to_string();
    assert!(phrase.ends_with("years ago"), "got {phrase}");
}

#[tokio::test]
async fn test_relative_time_invalid_date() {
    let (is_error, text) = call(
        app_with(Config::default()),
        "relative_time",
        json!({"time": "not a date"}),
    )
    .await;

    assert!(is_error);
    assert!(text.starts_with("Tool execution error: "));
}

// ============================================================================
// Corpus loaded from disk
// ============================================================================

fn corpus_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let records = json!([
        {
            "id": "leap-second-1972",
            "title": "First Leap Second",
            "text": "The first leap second was inserted on 30 June 1972 to keep UTC within 0.9 seconds of UT1.",
            "url": "https://example.org/leap",
            "metadata": {"category": "standards", "year": 1972}
        },
        {
            "id": "railway-time",
            "title": "Railway Time",
            "text": "British railways adopted Greenwich Mean Time across the network in 1847.",
            "metadata": {"category": "standards", "year": 1847}
        }
    ]);
    file.write_all(records.to_string().as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_search_custom_corpus() {
    let file = corpus_file();
    let config = Config {
        knowledge_path: Some(file.path().to_path_buf()),
        ..Config::default()
    };

    let (is_error, text) = call(app_with(config), "search", json!({"query": "railway"})).await;

    assert!(!is_error);
    let results = payload(&text)["results"].as_array().unwrap().clone();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], "railway-time");
}

#[tokio::test]
async fn test_search_matches_year() {
    let file = corpus_file();
    let config = Config {
        knowledge_path: Some(file.path().to_path_buf()),
        ..Config::default()
    };

    let (_, text) = call(app_with(config), "search", json!({"query": "1972"})).await;

    let results = payload(&text)["results"].as_array().unwrap().clone();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], "leap-second-1972");
}

#[tokio::test]
async fn test_fetch_custom_corpus() {
    let file = corpus_file();
    let config = Config {
        knowledge_path: Some(file.path().to_path_buf()),
        ..Config::default()
    };

    let (is_error, text) = call(app_with(config), "fetch", json!({"id": "leap-second-1972"})).await;

    assert!(!is_error);
    let record = payload(&text);
    assert_eq!(record["title"], "First Leap Second");
    assert_eq!(record["metadata"]["category"], "standards");
    assert_eq!(record["url"], "https://example.org/leap");
}

#[tokio::test]
async fn test_fetch_missing_id() {
    let (is_error, text) = call(app_with(Config::default()), "fetch", json!({})).await;

    assert!(is_error);
    assert_eq!(text, "Tool execution error: Missing required argument: id");
}

#[test]
fn test_missing_corpus_file_fails_startup() {
    let config = Config {
        knowledge_path: Some("/nonexistent/records.json".into()),
        ..Config::default()
    };

    assert!(AppState::new(config).is_err());
}
