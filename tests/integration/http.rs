//! Integration tests for the HTTP surface

use serde_json::Value;

use std::sync::Arc;

use crate::test_utils::{ts, TestApiServer, UnavailableProvider};

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "confluence-signal-monitor");
    assert_eq!(body["symbol"], "NIFTY");
    assert!(body.get("last_error").is_none());
}

#[tokio::test]
async fn health_reports_degraded_after_failed_cycle() {
    let app = TestApiServer::with_provider(Arc::new(UnavailableProvider)).await;
    app.runtime.run_once(ts()).await.unwrap();

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 503);

    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["last_cycle_at"], "2024-01-15T09:30:00Z");
    assert!(body["last_error"].as_str().unwrap().contains("feed offline"));
}

#[tokio::test]
async fn health_recovers_after_successful_cycle() {
    let app = TestApiServer::new().await;
    app.runtime.run_once(ts()).await.unwrap();

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["last_cycle_at"], "2024-01-15T09:30:00Z");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    app.runtime.run_once(ts()).await.unwrap();

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("cycles_total 1"), "Expected cycles_total");
    assert!(body.contains("alerts_total 1"), "Expected alerts_total");
    assert!(body.contains("cycle_duration_seconds"));
    assert!(body.contains("http_requests_in_flight"));
}

#[tokio::test]
async fn status_is_null_before_first_cycle() {
    let app = TestApiServer::new().await;
    let body: Value = app.server.get("/status").await.json();
    assert_eq!(body["symbol"], "NIFTY");
    assert!(body["last_cycle"].is_null());
}

#[tokio::test]
async fn status_reports_last_cycle_summary() {
    let app = TestApiServer::new().await;
    app.runtime.run_once(ts()).await.unwrap();

    let response = app.server.get("/status").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let summary = &body["last_cycle"]["summary"];
    assert_eq!(summary["outcome"], "alert");
    assert_eq!(summary["bias"], "bullish");
    assert_eq!(summary["strength"], 5.0);
    assert_eq!(summary["missing"].as_array().unwrap().len(), 0);
    assert_eq!(body["last_cycle"]["at"], "2024-01-15T09:30:00Z");
}
