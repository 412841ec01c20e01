//! Error types for gemer

use std::time::Duration;
use thiserror::Error;

/// Result type alias using gemer's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the bump workflow and its collaborators
///
/// The enum is `Clone + PartialEq` so callers (and tests) can compare the
/// error a workflow returned against the one a hosting call produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Required input was missing or empty
    #[error("missing {0}")]
    Validation(String),

    /// The tracked file has no usable `VERSION` line
    #[error("version format error: {0}")]
    VersionFormat(String),

    /// The tracked file changed since it was read (stale fingerprint)
    #[error("conflict: {0}")]
    Conflict(String),

    /// GitHub API failure
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic hosting platform failure
    #[error("platform error: {0}")]
    Platform(String),

    /// A hosting call did not complete within the configured step timeout
    #[error("{step} timed out after {after:?}")]
    Timeout {
        /// Name of the step that timed out
        step: String,
        /// Configured timeout
        after: Duration,
    },

    /// The workflow failed and at least one compensation also failed
    #[error("{cause} (rollback incomplete: {})", format_failures(.failures))]
    RollbackFailed {
        /// The error that triggered the rollback
        cause: Box<Error>,
        /// Errors raised by compensations, in execution order
        failures: Vec<Error>,
    },

    /// No GitHub token could be found
    #[error("authentication error: {0}")]
    Auth(String),

    /// Internal failure (terminal I/O and the like)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The error that originally caused a failure.
    ///
    /// For `RollbackFailed` this is the wrapped cause; every other variant
    /// is its own root cause.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::RollbackFailed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

fn format_failures(failures: &[Error]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        match e {
            octocrab::Error::GitHub { source, .. } => Self::GitHubApi(source.message),
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}
