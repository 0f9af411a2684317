//! Acknowledgement-contract tests for the webhook transport.
//!
//! Every understood delivery is acknowledged with 200 regardless of the
//! routing outcome; only malformed payloads and missing headers produce
//! a failure status.

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use serde_json::json;

use workflow_warden::router::EventRouter;
use workflow_warden::server::{process_delivery, AppState};

use super::test_helpers::{test_config, MockGithubApi, MockProvider, TRUSTED_LOGIN};

fn test_state(api: &Arc<MockGithubApi>) -> AppState {
    let config = Arc::new(test_config());
    let router = EventRouter::new(&config, Arc::new(MockProvider(Arc::clone(api))), None);
    AppState {
        config,
        router,
        audit: None,
    }
}

fn delivery_headers(kind: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-github-event", HeaderValue::from_str(kind).expect("kind"));
    headers.insert(
        "x-github-delivery",
        HeaderValue::from_static("72d3162e-cc78-11e3-81ab-4c9367dc0958"),
    );
    headers
}

fn pr_opened_body(author: &str) -> Vec<u8> {
    json!({
        "action": "opened",
        "pull_request": {
            "number": 7,
            "title": "Implement feature",
            "user": { "login": author },
            "head": { "repo": { "full_name": "acme/widgets" } }
        },
        "repository": { "full_name": "acme/widgets" }
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn handled_delivery_is_acknowledged_with_200() {
    let api = Arc::new(MockGithubApi::happy());
    let state = test_state(&api);

    let (status, payload) = process_delivery(
        &state,
        &delivery_headers("pull_request"),
        &pr_opened_body(TRUSTED_LOGIN),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["outcome"], "handled");
}

#[tokio::test]
async fn skipped_delivery_is_still_acknowledged_with_200() {
    let api = Arc::new(MockGithubApi::happy());
    let state = test_state(&api);

    let (status, payload) = process_delivery(
        &state,
        &delivery_headers("pull_request"),
        &pr_opened_body("alice"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["outcome"], "skipped_not_trusted_actor");
    assert!(api.recorded().is_empty());
}

#[tokio::test]
async fn unsupported_kind_is_acknowledged_without_body_inspection() {
    let api = Arc::new(MockGithubApi::happy());
    let state = test_state(&api);

    let (status, payload) =
        process_delivery(&state, &delivery_headers("star"), b"this is not json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["outcome"], "skipped_not_target_kind");
}

#[tokio::test]
async fn unsupported_action_is_acknowledged_as_skipped() {
    let api = Arc::new(MockGithubApi::happy());
    let state = test_state(&api);

    let body = json!({ "action": "closed", "pull_request": {}, "repository": {} })
        .to_string()
        .into_bytes();
    let (status, payload) =
        process_delivery(&state, &delivery_headers("pull_request"), &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["outcome"], "skipped_not_target_kind");
    assert!(api.recorded().is_empty());
}

#[tokio::test]
async fn malformed_payload_is_rejected_with_400() {
    let api = Arc::new(MockGithubApi::happy());
    let state = test_state(&api);

    // A supported (kind, action) pair missing the pull_request object.
    let body = json!({ "action": "opened", "repository": { "full_name": "acme/widgets" } })
        .to_string()
        .into_bytes();
    let (status, payload) =
        process_delivery(&state, &delivery_headers("pull_request"), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(payload["error"]
        .as_str()
        .is_some_and(|msg| msg.contains("malformed event")));
    assert!(api.recorded().is_empty());
}

#[tokio::test]
async fn missing_headers_are_rejected_with_400() {
    let api = Arc::new(MockGithubApi::happy());
    let state = test_state(&api);

    let (status, _payload) =
        process_delivery(&state, &HeaderMap::new(), &pr_opened_body(TRUSTED_LOGIN)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(api.recorded().is_empty());
}

#[tokio::test]
async fn workflow_run_delivery_round_trips_through_transport() {
    let api = Arc::new(MockGithubApi::happy());
    let state = test_state(&api);

    let body = json!({
        "action": "requested",
        "workflow_run": {
            "id": 900,
            "name": "CI",
            "status": "queued",
            "html_url": "https://github.com/acme/widgets/actions/runs/900",
            "pull_requests": [{ "number": 42 }]
        },
        "repository": { "full_name": "acme/widgets" }
    })
    .to_string()
    .into_bytes();

    let (status, payload) =
        process_delivery(&state, &delivery_headers("workflow_run"), &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["outcome"], "handled");
    assert_eq!(payload["attempts"][0]["method"], "direct");
    assert_eq!(payload["attempts"][0]["outcome"], "success");
}
