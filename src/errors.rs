use std::fmt;
use std::result::Result as StdResult;

use thiserror::Error;

/// Error type shared by the remote client, the cache, and the session controller.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, DashboardError>;

/// Payload-free discriminant of [`DashboardError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Validation,
    NotFound,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Network => "network",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Config => "config",
        };
        f.write_str(label)
    }
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::Network(_) => ErrorKind::Network,
            DashboardError::Validation(_) => ErrorKind::Validation,
            DashboardError::NotFound(_) => ErrorKind::NotFound,
            DashboardError::Config(_) => ErrorKind::Config,
        }
    }

    /// Maps a non-2xx HTTP status onto the error taxonomy.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = if body.trim().is_empty() {
            format!("backend responded with status {status}")
        } else {
            format!("backend responded with status {status}: {}", body.trim())
        };
        match status {
            404 => DashboardError::NotFound(detail),
            400 | 422 => DashboardError::Validation(detail),
            _ => DashboardError::Network(detail),
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Network(format!("malformed payload: {err}"))
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Config(err.to_string())
    }
}
