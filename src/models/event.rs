//! Inbound webhook deliveries decoded into a closed event enum.
//!
//! Decoding happens exactly once, at the transport boundary. Everything
//! downstream dispatches on this enum; there is no string matching on
//! event kinds past this point.

use serde::Deserialize;

use crate::models::pull_request::{PullRequest, PullRequestWire};
use crate::models::repository::RepoRef;
use crate::models::workflow_run::{WorkflowRun, WorkflowRunWire};
use crate::{AppError, Result};

/// Event kind header value for pull request deliveries.
const KIND_PULL_REQUEST: &str = "pull_request";
/// Event kind header value for workflow run deliveries.
const KIND_WORKFLOW_RUN: &str = "workflow_run";

/// One inbound webhook delivery, classified at the boundary.
///
/// Supported `(kind, action)` pairs get their own variant; every other
/// combination collapses into [`WebhookEvent::Ignored`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// `pull_request` delivery with action `opened`.
    PullRequestOpened {
        /// Platform-assigned delivery identifier.
        delivery_id: String,
        /// Repository the pull request belongs to.
        repository: RepoRef,
        /// The pull request extracted from the payload.
        pull_request: PullRequest,
    },
    /// `workflow_run` delivery with action `requested`.
    WorkflowRunRequested {
        /// Platform-assigned delivery identifier.
        delivery_id: String,
        /// Repository the run belongs to.
        repository: RepoRef,
        /// The workflow run extracted from the payload.
        run: WorkflowRun,
    },
    /// Any delivery this service does not act on.
    Ignored {
        /// Platform-assigned delivery identifier.
        delivery_id: String,
        /// Raw event kind header value.
        kind: String,
        /// Payload action, when the payload was inspected at all.
        action: Option<String>,
    },
}

/// Minimal envelope read before committing to a full payload parse.
#[derive(Debug, Deserialize)]
struct Envelope {
    action: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryWire {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    pull_request: PullRequestWire,
    repository: RepositoryWire,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunPayload {
    workflow_run: WorkflowRunWire,
    repository: RepositoryWire,
}

impl WebhookEvent {
    /// Decode a raw delivery into its classified event.
    ///
    /// Deliveries whose kind is not handled are classified [`Self::Ignored`]
    /// without inspecting the body. For handled kinds, an unsupported action
    /// is also [`Self::Ignored`]; a supported action with a payload missing
    /// required fields is the one condition reported as a failure.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedEvent` when a handled kind carries a
    /// body that is not valid JSON or lacks a required field.
    pub fn decode(kind: &str, delivery_id: &str, body: &[u8]) -> Result<Self> {
        if kind != KIND_PULL_REQUEST && kind != KIND_WORKFLOW_RUN {
            return Ok(Self::Ignored {
                delivery_id: delivery_id.to_owned(),
                kind: kind.to_owned(),
                action: None,
            });
        }

        let envelope: Envelope = serde_json::from_slice(body)
            .map_err(|err| AppError::MalformedEvent(format!("payload is not valid JSON: {err}")))?;

        match (kind, envelope.action.as_deref()) {
            (KIND_PULL_REQUEST, Some("opened")) => {
                let payload: PullRequestPayload = parse_payload(body)?;
                Ok(Self::PullRequestOpened {
                    delivery_id: delivery_id.to_owned(),
                    repository: RepoRef::parse(&payload.repository.full_name)?,
                    pull_request: payload.pull_request.into(),
                })
            }
            (KIND_WORKFLOW_RUN, Some("requested")) => {
                let payload: WorkflowRunPayload = parse_payload(body)?;
                Ok(Self::WorkflowRunRequested {
                    delivery_id: delivery_id.to_owned(),
                    repository: RepoRef::parse(&payload.repository.full_name)?,
                    run: payload.workflow_run.into(),
                })
            }
            _ => Ok(Self::Ignored {
                delivery_id: delivery_id.to_owned(),
                kind: kind.to_owned(),
                action: envelope.action,
            }),
        }
    }

    /// The platform-assigned delivery identifier.
    #[must_use]
    pub fn delivery_id(&self) -> &str {
        match self {
            Self::PullRequestOpened { delivery_id, .. }
            | Self::WorkflowRunRequested { delivery_id, .. }
            | Self::Ignored { delivery_id, .. } => delivery_id,
        }
    }

    /// Repository the delivery concerns, absent for ignored deliveries.
    #[must_use]
    pub fn repository(&self) -> Option<&RepoRef> {
        match self {
            Self::PullRequestOpened { repository, .. }
            | Self::WorkflowRunRequested { repository, .. } => Some(repository),
            Self::Ignored { .. } => None,
        }
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|err| AppError::MalformedEvent(format!("payload missing required field: {err}")))
}
