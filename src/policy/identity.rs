//! Trusted-actor classification.

use std::collections::HashSet;

/// Decides whether an actor login belongs to the configured set of trusted
/// automated identities.
///
/// Membership is an exact, case-sensitive string match; there are no
/// partial or pattern matches. The classifier is pure and stateless.
#[derive(Debug, Clone)]
pub struct IdentityClassifier {
    trusted: HashSet<String>,
}

impl IdentityClassifier {
    /// Build a classifier over the configured trusted logins.
    #[must_use]
    pub fn new(logins: impl IntoIterator<Item = String>) -> Self {
        Self {
            trusted: logins.into_iter().collect(),
        }
    }

    /// Whether `login` is a trusted automated contributor.
    ///
    /// An empty login (payload carried no usable actor) is never trusted.
    #[must_use]
    pub fn is_trusted_actor(&self, login: &str) -> bool {
        !login.is_empty() && self.trusted.contains(login)
    }
}
