//! Event dispatch: one entry point per classified delivery.
//!
//! The router applies the trusted-actor and protected-path policies, then
//! hands qualifying workflow runs to the [`approval`] orchestrator. All
//! expected conditions are modeled as [`Outcome`] values; nothing here
//! raises for a skip or a collaborator failure.

pub mod approval;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::audit::{AuditEntry, AuditEventType, AuditLogger};
use crate::config::GlobalConfig;
use crate::github::{GithubApi, GithubApiProvider};
use crate::models::approval::{ApprovalAttempt, ApprovalMethod};
use crate::models::event::WebhookEvent;
use crate::models::pull_request::PullRequest;
use crate::models::repository::RepoRef;
use crate::models::workflow_run::WorkflowRun;
use crate::policy::{IdentityClassifier, RiskEvaluator};
use crate::router::approval::ApprovalOrchestrator;

/// Comment acknowledging a trusted pull request whose change set is clean.
const ACK_COMMENT_BODY: &str = "\u{1f916} **Auto-approving trusted workflows**\n\n\
     This pull request was opened by a trusted automated contributor and does \
     not modify workflow files. Its CI workflows should be approved \
     automatically.";

/// Terminal result of routing one delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The delivery was processed to completion.
    Handled {
        /// Approval attempts made for a workflow run delivery; empty for
        /// the comment-only pull request flow.
        attempts: Vec<ApprovalAttempt>,
    },
    /// The delivery was understood but a collaborator call outside the
    /// approval protocol failed; logged, never escalated.
    HandledWithFailure {
        /// Failure rendered as text.
        detail: String,
    },
    /// The delivery kind or action is not one this service acts on.
    SkippedNotTargetKind,
    /// The acting identity is not in the trusted set.
    SkippedNotTrustedActor,
    /// The change set touches the protected path prefix.
    SkippedProtectedPathTouched,
}

/// Dispatches classified deliveries to their handling flow.
pub struct EventRouter {
    identity: IdentityClassifier,
    risk: RiskEvaluator,
    github: Arc<dyn GithubApiProvider>,
    audit: Option<Arc<dyn AuditLogger>>,
}

impl EventRouter {
    /// Build a router over the configured policies and collaborator.
    #[must_use]
    pub fn new(
        config: &GlobalConfig,
        github: Arc<dyn GithubApiProvider>,
        audit: Option<Arc<dyn AuditLogger>>,
    ) -> Self {
        Self {
            identity: IdentityClassifier::new(config.trusted_logins.iter().cloned()),
            risk: RiskEvaluator::new(config.protected_path_prefix.clone()),
            github,
            audit,
        }
    }

    /// Route one delivery to completion.
    ///
    /// Every expected condition (unsupported kind, untrusted actor,
    /// protected-path touch, collaborator failure) is an [`Outcome`];
    /// malformed payloads never reach this point (they are rejected at
    /// decode time).
    pub async fn route(&self, event: &WebhookEvent) -> Outcome {
        match event {
            WebhookEvent::Ignored {
                delivery_id,
                kind,
                action,
            } => {
                debug!(delivery = %delivery_id, kind = %kind, ?action, "ignoring delivery");
                Outcome::SkippedNotTargetKind
            }
            WebhookEvent::PullRequestOpened {
                delivery_id,
                repository,
                pull_request,
            } => {
                self.handle_pull_request_opened(delivery_id, repository, pull_request)
                    .await
            }
            WebhookEvent::WorkflowRunRequested {
                delivery_id,
                repository,
                run,
            } => {
                self.handle_workflow_run_requested(delivery_id, repository, run)
                    .await
            }
        }
    }

    /// Comment-only acknowledgement flow for freshly opened pull requests.
    async fn handle_pull_request_opened(
        &self,
        delivery_id: &str,
        repository: &RepoRef,
        pr: &PullRequest,
    ) -> Outcome {
        info!(
            delivery = %delivery_id,
            repo = %repository,
            pr = pr.number,
            author = %pr.author_login,
            "pull request opened"
        );

        if !self.identity.is_trusted_actor(&pr.author_login) {
            info!(pr = pr.number, author = %pr.author_login, "skipping: author not trusted");
            self.record(
                AuditEntry::new(AuditEventType::ClassificationSkip)
                    .with_delivery(delivery_id)
                    .with_repository(repository.to_string())
                    .with_pr(pr.number)
                    .with_actor(pr.author_login.clone()),
            );
            return Outcome::SkippedNotTrustedActor;
        }

        info!(pr = pr.number, title = %pr.title, "trusted pull request detected");

        let api = self.github.client_for(repository);
        let changes = match api.list_pull_request_files(pr.number).await {
            Ok(changes) => changes,
            Err(err) => return flow_failure(delivery_id, repository, pr.number, &err.to_string()),
        };

        if self.risk.touches_protected_paths(&changes) {
            info!(pr = pr.number, "skipping: pull request modifies workflow files");
            self.record(
                AuditEntry::new(AuditEventType::RiskSkip)
                    .with_delivery(delivery_id)
                    .with_repository(repository.to_string())
                    .with_pr(pr.number),
            );
            return Outcome::SkippedProtectedPathTouched;
        }

        match api.create_issue_comment(pr.number, ACK_COMMENT_BODY).await {
            Ok(()) => {
                info!(pr = pr.number, "acknowledgement comment posted");
                self.record(
                    AuditEntry::new(AuditEventType::Acknowledgement)
                        .with_delivery(delivery_id)
                        .with_repository(repository.to_string())
                        .with_pr(pr.number)
                        .with_outcome("success"),
                );
                Outcome::Handled {
                    attempts: Vec::new(),
                }
            }
            Err(err) => {
                error!(pr = pr.number, %err, "acknowledgement comment failed");
                self.record(
                    AuditEntry::new(AuditEventType::Acknowledgement)
                        .with_delivery(delivery_id)
                        .with_repository(repository.to_string())
                        .with_pr(pr.number)
                        .with_outcome("failure")
                        .with_detail(err.to_string()),
                );
                Outcome::HandledWithFailure {
                    detail: err.to_string(),
                }
            }
        }
    }

    /// Approval flow for workflow runs awaiting manual approval.
    ///
    /// Deliberately re-applies the same checks as the pull request flow
    /// against fresh data; the two flows never share cached state.
    async fn handle_workflow_run_requested(
        &self,
        delivery_id: &str,
        repository: &RepoRef,
        run: &WorkflowRun,
    ) -> Outcome {
        info!(
            delivery = %delivery_id,
            repo = %repository,
            run = run.id,
            workflow = %run.name,
            "workflow run requested"
        );

        let Some(&pr_number) = run.pull_request_numbers.first() else {
            info!(run = run.id, "skipping: workflow run has no associated pull request");
            return Outcome::SkippedNotTargetKind;
        };

        let api = self.github.client_for(repository);
        let pr = match api.get_pull_request(pr_number).await {
            Ok(pr) => pr,
            Err(err) => return flow_failure(delivery_id, repository, pr_number, &err.to_string()),
        };

        if !self.identity.is_trusted_actor(&pr.author_login) {
            info!(run = run.id, pr = pr_number, author = %pr.author_login, "skipping: author not trusted");
            self.record(
                AuditEntry::new(AuditEventType::ClassificationSkip)
                    .with_delivery(delivery_id)
                    .with_repository(repository.to_string())
                    .with_pr(pr_number)
                    .with_run(run.id)
                    .with_actor(pr.author_login.clone()),
            );
            return Outcome::SkippedNotTrustedActor;
        }

        let changes = match api.list_pull_request_files(pr_number).await {
            Ok(changes) => changes,
            Err(err) => return flow_failure(delivery_id, repository, pr_number, &err.to_string()),
        };

        if self.risk.touches_protected_paths(&changes) {
            info!(run = run.id, pr = pr_number, "skipping: pull request modifies workflow files");
            self.record(
                AuditEntry::new(AuditEventType::RiskSkip)
                    .with_delivery(delivery_id)
                    .with_repository(repository.to_string())
                    .with_pr(pr_number)
                    .with_run(run.id),
            );
            return Outcome::SkippedProtectedPathTouched;
        }

        let attempts = ApprovalOrchestrator::attempt_approval(api.as_ref(), run, pr_number).await;
        for attempt in &attempts {
            self.record(attempt_entry(attempt, delivery_id, repository, pr_number, run.id));
        }

        Outcome::Handled { attempts }
    }

    fn record(&self, entry: AuditEntry) {
        if let Some(ref logger) = self.audit {
            if let Err(err) = logger.log_entry(entry) {
                warn!(%err, "audit log write failed");
            }
        }
    }
}

/// Collaborator failure outside the approval protocol: logged and
/// reported as a handled-with-failure outcome, never escalated.
fn flow_failure(delivery_id: &str, repository: &RepoRef, pr_number: u64, detail: &str) -> Outcome {
    error!(delivery = %delivery_id, repo = %repository, pr = pr_number, detail, "collaborator call failed");
    Outcome::HandledWithFailure {
        detail: detail.to_owned(),
    }
}

/// Render one approval attempt as an audit entry.
fn attempt_entry(
    attempt: &ApprovalAttempt,
    delivery_id: &str,
    repository: &RepoRef,
    pr_number: u64,
    run_id: u64,
) -> AuditEntry {
    let event_type = match attempt.method {
        ApprovalMethod::Direct => AuditEventType::DirectApproval,
        ApprovalMethod::FallbackComment => AuditEventType::FallbackComment,
    };
    let outcome = if attempt.succeeded() {
        "success"
    } else {
        "failure"
    };

    let mut entry = AuditEntry::new(event_type)
        .with_delivery(delivery_id)
        .with_repository(repository.to_string())
        .with_pr(pr_number)
        .with_run(run_id)
        .with_outcome(outcome);
    if let Some(ref detail) = attempt.error_detail {
        entry = entry.with_detail(detail.clone());
    }
    entry
}
