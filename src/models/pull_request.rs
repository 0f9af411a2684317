//! Read-only pull request view and per-evaluation file changes.

use serde::{Deserialize, Serialize};

/// A pull request referenced by a delivery.
///
/// Fetched from the REST API or extracted from the payload; never mutated
/// by this service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PullRequest {
    /// Pull request number within its repository.
    pub number: u64,
    /// Title at the time the delivery was produced.
    pub title: String,
    /// Login of the account that opened the pull request.
    ///
    /// Empty when the payload carried no `user` object; an empty login
    /// never matches the trusted set.
    pub author_login: String,
    /// `owner/name` of the head repository, absent for deleted forks.
    pub head_repository: Option<String>,
}

/// One file touched by a pull request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct FileChange {
    /// Repository-relative path with forward-slash separators.
    pub path: String,
}

/// Wire shape shared by the webhook payload's `pull_request` object and
/// the REST `GET /pulls/{n}` response.
#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestWire {
    pub(crate) number: u64,
    pub(crate) title: String,
    pub(crate) user: Option<UserWire>,
    pub(crate) head: Option<HeadWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserWire {
    pub(crate) login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeadWire {
    pub(crate) repo: Option<HeadRepoWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeadRepoWire {
    pub(crate) full_name: String,
}

impl From<PullRequestWire> for PullRequest {
    fn from(wire: PullRequestWire) -> Self {
        Self {
            number: wire.number,
            title: wire.title,
            author_login: wire.user.map(|user| user.login).unwrap_or_default(),
            head_repository: wire.head.and_then(|head| head.repo).map(|repo| repo.full_name),
        }
    }
}
