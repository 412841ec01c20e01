//! Compensating actions for rolling back a partially applied bump
//!
//! Each mutating step that succeeds pushes the action undoing it. On
//! failure the stack is unwound last-in first-out through a single
//! dispatcher, [`Compensation::run`].

use crate::bump::execute::with_timeout;
use crate::bump::progress::ProgressCallback;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use std::time::Duration;
use tracing::{info, warn};

/// Undo action bound to one completed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// Delete a branch the workflow created
    DeleteBranch {
        /// Branch name
        name: String,
    },
    /// Close a PR the workflow opened
    ClosePullRequest {
        /// PR number
        number: u64,
    },
    /// Delete a release the workflow created
    DeleteRelease {
        /// Release ID
        id: u64,
    },
}

impl Compensation {
    /// Perform the undo action
    pub async fn run(&self, platform: &dyn PlatformService) -> Result<()> {
        match self {
            Self::DeleteBranch { name } => platform.delete_branch(name).await,
            Self::ClosePullRequest { number } => platform.close_pr(*number).await,
            Self::DeleteRelease { id } => platform.delete_release(*id).await,
        }
    }
}

impl std::fmt::Display for Compensation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeleteBranch { name } => write!(f, "delete branch {name}"),
            Self::ClosePullRequest { number } => write!(f, "close PR #{number}"),
            Self::DeleteRelease { id } => write!(f, "delete release {id}"),
        }
    }
}

/// Outcome of unwinding a [`CompensationStack`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollbackReport {
    /// Compensations that succeeded, in execution order
    pub completed: Vec<Compensation>,
    /// Compensations that failed, with their errors, in execution order
    pub failed: Vec<(Compensation, Error)>,
}

impl RollbackReport {
    /// Whether every compensation succeeded
    pub const fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Compensations for the steps completed so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompensationStack {
    entries: Vec<Compensation>,
}

impl CompensationStack {
    /// Record the undo action for a step that just succeeded
    pub fn push(&mut self, compensation: Compensation) {
        self.entries.push(compensation);
    }

    /// Pending compensations, oldest first
    pub fn pending(&self) -> &[Compensation] {
        &self.entries
    }

    /// Number of pending compensations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing needs compensating
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every pending compensation, newest first.
    ///
    /// A failing compensation does not stop the ones below it.
    pub async fn unwind(
        mut self,
        platform: &dyn PlatformService,
        timeout: Option<Duration>,
        progress: &dyn ProgressCallback,
    ) -> RollbackReport {
        let mut report = RollbackReport::default();

        while let Some(compensation) = self.entries.pop() {
            let label = compensation.to_string();
            match with_timeout(&label, timeout, compensation.run(platform)).await {
                Ok(()) => {
                    info!(action = %compensation, "compensation succeeded");
                    progress.on_rollback(&compensation, None).await;
                    report.completed.push(compensation);
                }
                Err(e) => {
                    warn!(action = %compensation, error = %e, "compensation failed");
                    progress.on_rollback(&compensation, Some(&e)).await;
                    report.failed.push((compensation, e));
                }
            }
        }

        report
    }
}
