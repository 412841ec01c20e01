//! Progress reporting for the bump workflow

use crate::bump::compensation::Compensation;
use crate::error::Error;
use async_trait::async_trait;

/// A forward step of the bump workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Read the version file
    Fetch,
    /// Create the bump branch
    Branch,
    /// Commit the new version to the bump branch
    Write,
    /// Open the pull request
    PullRequest,
    /// Compare the previous release tag with the bump branch
    Compare,
    /// Create the draft release
    Release,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch version file"),
            Self::Branch => write!(f, "create branch"),
            Self::Write => write!(f, "write version file"),
            Self::PullRequest => write!(f, "open pull request"),
            Self::Compare => write!(f, "compare commits"),
            Self::Release => write!(f, "create release"),
        }
    }
}

/// Receives progress updates while a bump runs
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A forward step completed; `detail` names what it produced
    async fn on_step(&self, step: Step, detail: &str);

    /// A compensation ran during rollback; `error` is set if it failed
    async fn on_rollback(&self, compensation: &Compensation, error: Option<&Error>);
}

/// Progress callback that ignores every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_step(&self, _step: Step, _detail: &str) {}

    async fn on_rollback(&self, _compensation: &Compensation, _error: Option<&Error>) {}
}
