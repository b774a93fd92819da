//! Results file to webhook, through the public API
//!
//! Uses a mock webhook so the full aggregation and delivery path can be
//! checked without network access.

use std::time::Duration;

use loginsuite_e2e::embed::{WebhookMessage, COLOR_ALERT, COLOR_SUCCESS};
use loginsuite_e2e::{summarize, E2eError, NotifyConfig, RunMetadata, WebhookNotifier};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn metadata() -> RunMetadata {
    RunMetadata {
        branch: "main".to_string(),
        commit: "9f8e7d6c5b4a".to_string(),
        report_url: Some("https://github.com/acme/login-e2e/actions/runs/7".to_string()),
    }
}

fn notifier(server: &MockServer) -> WebhookNotifier {
    let config = NotifyConfig {
        webhook_url: Some(format!("{}/api/webhooks/1/token", server.uri())),
        repository_url: Some("https://github.com/acme/login-e2e".to_string()),
        ..Default::default()
    };
    WebhookNotifier::from_config(&config, Duration::from_secs(5)).unwrap()
}

async fn delivered_message(server: &MockServer) -> WebhookMessage {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn failing_run_is_reported_with_failed_tests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results.json");
    std::fs::write(
        &results,
        r#"{
            "stats": {"expected": 1, "unexpected": 7, "skipped": 1, "duration": 95000.4},
            "suites": [{
                "title": "login.spec.ts",
                "tests": [
                    {"title": "valid credentials", "results": [{"status": "passed"}]},
                    {"title": "c1", "results": [{"status": "failed"}]},
                    {"title": "c2", "results": [{"status": "failed"}]},
                    {"title": "skipped one", "results": [{"status": "skipped"}]}
                ],
                "suites": [{
                    "title": "required fields",
                    "tests": [
                        {"title": "c3", "results": [{"status": "failed"}]},
                        {"title": "c4", "results": [{"status": "failed"}]},
                        {"title": "c5", "results": [{"status": "failed"}]},
                        {"title": "c6", "results": [{"status": "failed"}]},
                        {"title": "c7", "results": [{"status": "failed"}, {"status": "failed"}]}
                    ]
                }]
            }]
        }"#,
    )
    .unwrap();

    let summary = summarize(&results, &metadata()).unwrap();
    assert_eq!(summary.total, 9);
    assert_eq!(summary.duration, "1m 35s");
    assert_eq!(summary.failed_tests.len(), 7);
    assert_eq!(summary.failed_tests[2], "login.spec.ts > required fields > c3");

    notifier(&server).announce_result(&summary).await.unwrap();

    let message = delivered_message(&server).await;
    assert_eq!(message.embeds.len(), 1);
    let embed = &message.embeds[0];
    assert_eq!(embed.color, COLOR_ALERT);

    let failures = embed.fields.last().unwrap();
    let lines: Vec<&str> = failures.value.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "• login.spec.ts > c1");
    assert_eq!(lines[5], "... and 2 more");

    let links = embed.fields.iter().find(|f| f.name.contains("Links")).unwrap();
    assert!(links.value.contains("actions/runs/7"));
}

#[tokio::test]
async fn passing_run_uses_success_color() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results.json");
    std::fs::write(
        &results,
        r#"{
            "stats": {"expected": 3, "unexpected": 0, "skipped": 0, "duration": 2300},
            "suites": []
        }"#,
    )
    .unwrap();

    let summary = summarize(&results, &metadata()).unwrap();
    notifier(&server).announce_result(&summary).await.unwrap();

    let embed = &delivered_message(&server).await.embeds[0];
    assert_eq!(embed.color, COLOR_SUCCESS);
    assert_eq!(embed.fields.len(), 3);
    assert!(embed.fields[1].value.contains("`9f8e7d6`"));
}

#[tokio::test]
async fn rejected_notification_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string(r#"{"retry_after": 1.5}"#))
        .mount(&server)
        .await;

    let err = notifier(&server).announce_start("main", "9f8e7d6c5b4a").await.unwrap_err();
    match err {
        E2eError::Delivery { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("retry_after"));
        }
        other => panic!("expected delivery error, got {other:?}"),
    }
}
