//! Read-only view of a CI run awaiting approval.

use serde::{Deserialize, Serialize};

/// A workflow run referenced by a delivery.
///
/// The approved status transition is a side effect requested through the
/// REST API, never observed locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct WorkflowRun {
    /// Run identifier unique within the platform.
    pub id: u64,
    /// Workflow name the run belongs to.
    pub name: String,
    /// Run status as reported in the payload (e.g. `queued`).
    pub status: String,
    /// Numbers of the pull requests associated with the run, in payload
    /// order; may be empty.
    pub pull_request_numbers: Vec<u64>,
    /// Human-facing page for the run, used in fallback notifications.
    pub details_url: String,
}

/// Wire shape of the webhook payload's `workflow_run` object.
#[derive(Debug, Deserialize)]
pub(crate) struct WorkflowRunWire {
    pub(crate) id: u64,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) status: String,
    pub(crate) html_url: String,
    #[serde(default)]
    pub(crate) pull_requests: Vec<PullRequestRefWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestRefWire {
    pub(crate) number: u64,
}

impl From<WorkflowRunWire> for WorkflowRun {
    fn from(wire: WorkflowRunWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            status: wire.status,
            pull_request_numbers: wire.pull_requests.iter().map(|pr| pr.number).collect(),
            details_url: wire.html_url,
        }
    }
}
