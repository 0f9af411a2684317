//! Repository reference carried by every routable delivery.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// The `owner/name` pair identifying the repository a delivery concerns.
///
/// Extracted from the payload's `repository.full_name`; the REST client is
/// bound to one of these per delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct RepoRef {
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name without the owner segment.
    pub name: String,
}

impl RepoRef {
    /// Parse an `owner/name` string as delivered in `repository.full_name`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedEvent` when either segment is missing
    /// or empty.
    pub fn parse(full_name: &str) -> Result<Self> {
        match full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_owned(),
                name: name.to_owned(),
            }),
            _ => Err(AppError::MalformedEvent(format!(
                "repository full_name is not owner/name: {full_name:?}"
            ))),
        }
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
