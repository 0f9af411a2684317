//! Protected-path risk evaluation.

use crate::models::pull_request::FileChange;

/// Decides whether a change set touches the protected path prefix
/// (CI workflow definitions).
///
/// The match is a case-sensitive prefix test on the path string; no
/// normalization is applied beyond what the upstream API guarantees
/// (forward-slash separators). The evaluator is pure and stateless.
#[derive(Debug, Clone)]
pub struct RiskEvaluator {
    protected_prefix: String,
}

impl RiskEvaluator {
    /// Build an evaluator for the configured protected prefix.
    #[must_use]
    pub fn new(protected_prefix: impl Into<String>) -> Self {
        Self {
            protected_prefix: protected_prefix.into(),
        }
    }

    /// Whether at least one changed path starts with the protected prefix.
    ///
    /// An empty change set never matches.
    #[must_use]
    pub fn touches_protected_paths(&self, changes: &[FileChange]) -> bool {
        changes
            .iter()
            .any(|change| change.path.starts_with(&self.protected_prefix))
    }
}
