//! Approval attempt records produced by the two-tier protocol.

use serde::{Deserialize, Serialize};

/// The tier an approval attempt used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMethod {
    /// Direct run approval through the Actions API.
    Direct,
    /// Human-actionable comment posted on the originating pull request.
    FallbackComment,
}

/// Whether an approval attempt succeeded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The collaborator call completed.
    Success,
    /// The collaborator call failed; detail is carried on the attempt.
    Failure,
}

/// Outcome of one approval tier, reported to the caller and the audit log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ApprovalAttempt {
    /// Tier that was attempted.
    pub method: ApprovalMethod,
    /// Whether the tier succeeded.
    pub outcome: AttemptOutcome,
    /// Collaborator error rendered as text, present on failures.
    pub error_detail: Option<String>,
}

impl ApprovalAttempt {
    /// Record a successful attempt for the given tier.
    #[must_use]
    pub fn success(method: ApprovalMethod) -> Self {
        Self {
            method,
            outcome: AttemptOutcome::Success,
            error_detail: None,
        }
    }

    /// Record a failed attempt for the given tier.
    #[must_use]
    pub fn failure(method: ApprovalMethod, detail: impl Into<String>) -> Self {
        Self {
            method,
            outcome: AttemptOutcome::Failure,
            error_detail: Some(detail.into()),
        }
    }

    /// Whether this attempt succeeded.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcome == AttemptOutcome::Success
    }
}
