//! Unit tests for domain model construction and serialization.

use workflow_warden::models::approval::{ApprovalAttempt, ApprovalMethod, AttemptOutcome};
use workflow_warden::models::repository::RepoRef;
use workflow_warden::router::Outcome;

#[test]
fn repo_ref_parses_owner_and_name() {
    let repo = RepoRef::parse("acme/widgets").expect("parses");
    assert_eq!(repo.owner, "acme");
    assert_eq!(repo.name, "widgets");
    assert_eq!(repo.to_string(), "acme/widgets");
}

#[test]
fn repo_ref_splits_on_first_slash_only() {
    let repo = RepoRef::parse("acme/widgets/extra").expect("parses");
    assert_eq!(repo.owner, "acme");
    assert_eq!(repo.name, "widgets/extra");
}

#[test]
fn repo_ref_rejects_missing_segments() {
    assert!(RepoRef::parse("acme").is_err());
    assert!(RepoRef::parse("/widgets").is_err());
    assert!(RepoRef::parse("acme/").is_err());
    assert!(RepoRef::parse("").is_err());
}

#[test]
fn approval_attempt_constructors_set_outcome() {
    let success = ApprovalAttempt::success(ApprovalMethod::Direct);
    assert_eq!(success.method, ApprovalMethod::Direct);
    assert_eq!(success.outcome, AttemptOutcome::Success);
    assert!(success.error_detail.is_none());
    assert!(success.succeeded());

    let failure = ApprovalAttempt::failure(ApprovalMethod::FallbackComment, "denied");
    assert_eq!(failure.method, ApprovalMethod::FallbackComment);
    assert_eq!(failure.outcome, AttemptOutcome::Failure);
    assert_eq!(failure.error_detail.as_deref(), Some("denied"));
    assert!(!failure.succeeded());
}

#[test]
fn outcome_serializes_with_snake_case_tag() {
    let rendered = serde_json::to_value(Outcome::SkippedProtectedPathTouched).expect("serializes");
    assert_eq!(rendered["outcome"], "skipped_protected_path_touched");

    let handled = serde_json::to_value(Outcome::Handled {
        attempts: vec![ApprovalAttempt::failure(ApprovalMethod::Direct, "denied")],
    })
    .expect("serializes");
    assert_eq!(handled["outcome"], "handled");
    assert_eq!(handled["attempts"][0]["method"], "direct");
    assert_eq!(handled["attempts"][0]["outcome"], "failure");
    assert_eq!(handled["attempts"][0]["error_detail"], "denied");
}
