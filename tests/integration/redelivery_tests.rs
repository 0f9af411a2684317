//! Redelivered events repeat their side effects.
//!
//! There is no deduplication by delivery identifier: routing the same
//! delivery twice performs the external calls twice. This pins down the
//! current contract for platform-retried deliveries.

use std::sync::Arc;

use workflow_warden::router::Outcome;

use super::test_helpers::{
    pr_opened_event, pull_request, run_requested_event, test_router, workflow_run, ApiCall,
    MockGithubApi, TRUSTED_LOGIN,
};

#[tokio::test]
async fn redelivered_pull_request_event_comments_twice() {
    let api = Arc::new(MockGithubApi::happy());
    let router = test_router(&api);
    let event = pr_opened_event(pull_request(7, TRUSTED_LOGIN));

    let first = router.route(&event).await;
    let second = router.route(&event).await;

    assert_eq!(first, second);

    let comments = api
        .recorded()
        .iter()
        .filter(|call| matches!(call, ApiCall::CreateComment { .. }))
        .count();
    assert_eq!(comments, 2);
}

#[tokio::test]
async fn redelivered_workflow_run_event_approves_twice() {
    let api = Arc::new(MockGithubApi::happy());
    let router = test_router(&api);
    let event = run_requested_event(workflow_run(900, &[42]));

    let first = router.route(&event).await;
    let second = router.route(&event).await;

    assert!(matches!(first, Outcome::Handled { .. }));
    assert_eq!(first, second);

    let approvals = api
        .recorded()
        .iter()
        .filter(|call| matches!(call, ApiCall::ApproveRun(900)))
        .count();
    assert_eq!(approvals, 2);
}
