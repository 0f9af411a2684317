//! Two-tier approval protocol for a pending workflow run.

use tracing::{error, info, warn};

use crate::github::GithubApi;
use crate::models::approval::{ApprovalAttempt, ApprovalMethod};
use crate::models::workflow_run::WorkflowRun;

/// Local protocol state for one orchestration.
///
/// Direct approval is always attempted first; the fallback comment runs
/// iff the direct tier failed. Each tier runs exactly once per
/// invocation, and a fallback failure is terminal.
enum State {
    Start,
    Fallback,
    Done,
}

/// Executes the ordered, fallible approval protocol.
pub struct ApprovalOrchestrator;

impl ApprovalOrchestrator {
    /// Attempt to unblock `run`, reporting every tier that was tried.
    ///
    /// Returns the ordered attempt records: one on direct success, two
    /// when the direct tier failed and the fallback comment was tried.
    /// Collaborator failures are captured in the records, never
    /// propagated.
    pub async fn attempt_approval(
        api: &dyn GithubApi,
        run: &WorkflowRun,
        pr_number: u64,
    ) -> Vec<ApprovalAttempt> {
        let mut attempts = Vec::with_capacity(2);
        let mut state = State::Start;

        loop {
            match state {
                State::Start => match api.approve_workflow_run(run.id).await {
                    Ok(()) => {
                        info!(run = run.id, pr = pr_number, "workflow run approved directly");
                        attempts.push(ApprovalAttempt::success(ApprovalMethod::Direct));
                        state = State::Done;
                    }
                    Err(err) => {
                        warn!(
                            run = run.id,
                            pr = pr_number,
                            %err,
                            "direct approval failed, falling back to comment"
                        );
                        attempts.push(ApprovalAttempt::failure(ApprovalMethod::Direct, err.to_string()));
                        state = State::Fallback;
                    }
                },
                State::Fallback => {
                    let body = fallback_comment_body(run);
                    match api.create_issue_comment(pr_number, &body).await {
                        Ok(()) => {
                            info!(run = run.id, pr = pr_number, "fallback approval comment posted");
                            attempts.push(ApprovalAttempt::success(ApprovalMethod::FallbackComment));
                        }
                        Err(err) => {
                            error!(
                                run = run.id,
                                pr = pr_number,
                                %err,
                                "fallback comment failed, no further action for this delivery"
                            );
                            attempts.push(ApprovalAttempt::failure(
                                ApprovalMethod::FallbackComment,
                                err.to_string(),
                            ));
                        }
                    }
                    state = State::Done;
                }
                State::Done => break,
            }
        }

        attempts
    }
}

/// Human-readable comment directing a reviewer to approve the run manually.
fn fallback_comment_body(run: &WorkflowRun) -> String {
    format!(
        "\u{26a1} **Workflow approval needed**\n\n\
         Workflow run `{id}` is awaiting approval.\n\n\
         Automatic approval was attempted but requires manual action due to \
         repository settings.\n\n\
         To approve: open the [workflow run]({url}) and click \
         \"Approve workflows to run\".",
        id = run.id,
        url = run.details_url,
    )
}
