//! Structured audit logging for governance decisions.
//!
//! Provides the [`AuditLogger`] trait and associated types. The primary
//! implementation, [`JsonlAuditWriter`], appends JSONL records to
//! daily-rotating files. The router and transport are the only writers;
//! the decision core itself stays free of audit side effects.

pub mod writer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event type classification for audit log entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Delivery skipped because the actor is not in the trusted set.
    ClassificationSkip,
    /// Delivery skipped because the change set touches a protected path.
    RiskSkip,
    /// Direct run approval attempt through the Actions API.
    DirectApproval,
    /// Fallback comment attempt on the originating pull request.
    FallbackComment,
    /// Acknowledgement comment posted on a trusted clean pull request.
    Acknowledgement,
    /// Delivery rejected because its payload was missing required fields.
    MalformedEvent,
}

/// A structured record of one governance decision or side effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// ISO 8601 timestamp with timezone.
    pub timestamp: DateTime<Utc>,
    /// Event classification.
    pub event_type: AuditEventType,
    /// Platform delivery identifier the record belongs to.
    pub delivery_id: Option<String>,
    /// `owner/name` of the repository concerned.
    pub repository: Option<String>,
    /// Pull request number concerned.
    pub pr_number: Option<u64>,
    /// Workflow run identifier concerned.
    pub run_id: Option<u64>,
    /// Actor login that triggered the decision.
    pub actor: Option<String>,
    /// `success` or `failure` for side-effect records.
    pub outcome: Option<String>,
    /// Failure detail or skip reason.
    pub detail: Option<String>,
}

impl AuditEntry {
    /// Construct a minimal audit entry for the given event type.
    #[must_use]
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            delivery_id: None,
            repository: None,
            pr_number: None,
            run_id: None,
            actor: None,
            outcome: None,
            detail: None,
        }
    }

    /// Set the delivery identifier for this entry.
    #[must_use]
    pub fn with_delivery(mut self, delivery_id: impl Into<String>) -> Self {
        self.delivery_id = Some(delivery_id.into());
        self
    }

    /// Set the repository for this entry.
    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Set the pull request number for this entry.
    #[must_use]
    pub fn with_pr(mut self, pr_number: u64) -> Self {
        self.pr_number = Some(pr_number);
        self
    }

    /// Set the workflow run identifier for this entry.
    #[must_use]
    pub fn with_run(mut self, run_id: u64) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Set the actor login for this entry.
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Set the side-effect outcome for this entry.
    #[must_use]
    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    /// Set the failure detail or skip reason for this entry.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Writes structured audit entries to a persistent store.
///
/// Implementations must be [`Send`] and [`Sync`] to allow sharing across
/// handling tasks via [`std::sync::Arc`].
pub trait AuditLogger: Send + Sync {
    /// Record a single audit entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying write operation fails.
    fn log_entry(&self, entry: AuditEntry) -> crate::Result<()>;
}

pub use writer::JsonlAuditWriter;
