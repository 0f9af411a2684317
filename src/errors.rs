//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Inbound delivery is missing a required field or is not valid JSON.
    MalformedEvent(String),
    /// GitHub REST client construction failure.
    Github(String),
    /// Audit log write or setup failure.
    Audit(String),
    /// Webhook listener bind or serve failure.
    Server(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::MalformedEvent(msg) => write!(f, "malformed event: {msg}"),
            Self::Github(msg) => write!(f, "github: {msg}"),
            Self::Audit(msg) => write!(f, "audit: {msg}"),
            Self::Server(msg) => write!(f, "server: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}
