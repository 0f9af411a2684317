//! Global configuration parsing, validation, and credential loading.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Nested GitHub REST API settings.
///
/// The API token is loaded at runtime via OS keychain or environment
/// variable, not from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GithubConfig {
    /// Base URL of the REST API (override for GitHub Enterprise).
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Value sent as `X-GitHub-Api-Version`.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// API token used for all REST calls (populated at runtime).
    #[serde(skip)]
    pub token: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_version: default_api_version(),
            token: String::new(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".into()
}

fn default_api_version() -> String {
    "2022-11-28".into()
}

/// Audit log destination settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AuditConfig {
    /// Directory receiving daily-rotated JSONL audit files.
    pub log_dir: PathBuf,
}

fn default_http_port() -> u16 {
    3000
}

fn default_protected_path_prefix() -> String {
    ".github/workflows/".into()
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Account logins treated as trusted automated contributors.
    pub trusted_logins: HashSet<String>,
    /// Path prefix whose modification disqualifies automated approval.
    #[serde(default = "default_protected_path_prefix")]
    pub protected_path_prefix: String,
    /// HTTP port for the webhook listener.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// GitHub REST API settings.
    #[serde(default)]
    pub github: GithubConfig,
    /// Optional audit log destination; auditing is disabled when absent.
    #[serde(default)]
    pub audit: Option<AuditConfig>,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the GitHub API token from OS keychain with env-var fallback.
    ///
    /// Tries the `workflow-warden` keyring service first, then falls back
    /// to the `GITHUB_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env var provide
    /// the token.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.github.token = load_credential("github_token", "GITHUB_TOKEN").await?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.trusted_logins.is_empty() {
            return Err(AppError::Config("trusted_logins must not be empty".into()));
        }

        if self.trusted_logins.iter().any(|login| login.is_empty()) {
            return Err(AppError::Config(
                "trusted_logins must not contain empty entries".into(),
            ));
        }

        if self.protected_path_prefix.is_empty() {
            return Err(AppError::Config(
                "protected_path_prefix must not be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // Try OS keychain first via spawn_blocking (keyring is synchronous I/O).
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new("workflow-warden", &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    // Fallback to environment variable.
    env::var(env_key).map_err(|_| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))
    })
}
