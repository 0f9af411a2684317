//! GitHub REST collaborator contract.
//!
//! The router and orchestrator only ever see the [`GithubApi`] trait; the
//! production client in [`client`] implements it over reqwest, and tests
//! substitute a recording double.

pub mod client;

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::pull_request::{FileChange, PullRequest};
use crate::models::repository::RepoRef;

/// Result type for collaborator calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure modes of the collaborator, as the protocol distinguishes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Call rejected by repository permissions (HTTP 403). Expected on
    /// repositories with restrictive settings.
    Forbidden,
    /// Requested entity does not exist (HTTP 404).
    NotFound,
    /// Transport, authentication, or unexpected-status failure.
    NetworkOrAuth(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forbidden => write!(f, "forbidden by repository permissions"),
            Self::NotFound => write!(f, "not found"),
            Self::NetworkOrAuth(msg) => write!(f, "network or auth failure: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Operations this service consumes from the platform, bound to one
/// repository.
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// List the files touched by a pull request, in API order.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::NetworkOrAuth`] on transport or
    /// authentication failure.
    async fn list_pull_request_files(&self, pr_number: u64) -> ApiResult<Vec<FileChange>>;

    /// Fetch a pull request by number.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::NotFound`] when the pull request does not
    /// exist, or [`ApiError::NetworkOrAuth`] on transport failure.
    async fn get_pull_request(&self, pr_number: u64) -> ApiResult<PullRequest>;

    /// Post a comment on the issue thread of a pull request.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::Forbidden`] when commenting is not
    /// permitted, or [`ApiError::NetworkOrAuth`] on transport failure.
    async fn create_issue_comment(&self, issue_number: u64, body: &str) -> ApiResult<()>;

    /// Approve a workflow run awaiting manual approval.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::Forbidden`] on repositories with
    /// restrictive settings (an expected outcome), or
    /// [`ApiError::NetworkOrAuth`] on transport failure.
    async fn approve_workflow_run(&self, run_id: u64) -> ApiResult<()>;
}

/// Produces a [`GithubApi`] handle bound to the repository a delivery
/// concerns.
///
/// Implementations must be [`Send`] and [`Sync`] so the router can be
/// shared across handling tasks.
pub trait GithubApiProvider: Send + Sync {
    /// Bind a client to the given repository.
    fn client_for(&self, repo: &RepoRef) -> Arc<dyn GithubApi>;
}
