//! Bump execution - the saga coordinator
//!
//! Runs the bump steps strictly in order against the platform:
//! fetch, plan, branch, write, pull request, compare, release.
//! Every mutating step that succeeds pushes its compensation; the first
//! failure unwinds the stack and the original error is returned.

use crate::bump::compensation::{Compensation, CompensationStack};
use crate::bump::plan::{BumpPlan, BumpRequest};
use crate::bump::progress::{ProgressCallback, Step};
use crate::changelog::format_commits;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{TrackedFile, WorkflowResult};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Options for running a bump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BumpOptions {
    /// Upper bound on each individual platform call (forward steps and
    /// compensations alike); `None` waits indefinitely
    pub step_timeout: Option<Duration>,
}

/// A failed bump
///
/// Carries the side effects recorded before the failure and the
/// compensations that were successfully undone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct WorkflowFailure {
    /// The causing error, wrapped in `RollbackFailed` if an undo also failed
    pub error: Error,
    /// Result as accumulated when the failure happened
    pub result: WorkflowResult,
    /// Compensations executed successfully, in execution order
    pub rolled_back: Vec<Compensation>,
}

impl WorkflowFailure {
    /// Failure before anything was mutated
    fn early(error: Error) -> Self {
        Self {
            error,
            result: WorkflowResult::default(),
            rolled_back: Vec::new(),
        }
    }

    /// The error that originally stopped the workflow
    pub fn root_cause(&self) -> &Error {
        self.error.root_cause()
    }
}

/// Await `fut`, failing with `Error::Timeout` if it outlives `timeout`
pub(crate) async fn with_timeout<T>(
    step: impl Display,
    timeout: Option<Duration>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match timeout {
        Some(after) => tokio::time::timeout(after, fut)
            .await
            .map_err(|_| Error::Timeout {
                step: step.to_string(),
                after,
            })?,
        None => fut.await,
    }
}

/// Execute a bump (EFFECTFUL)
///
/// On success every field of the returned `WorkflowResult` is set and the
/// draft release exists. On failure everything created so far has been
/// undone (or the failure says which undo failed).
pub async fn update_version(
    platform: &dyn PlatformService,
    request: &BumpRequest,
    options: &BumpOptions,
    progress: &dyn ProgressCallback,
) -> std::result::Result<WorkflowResult, WorkflowFailure> {
    request.validate().map_err(WorkflowFailure::early)?;

    let file = fetch(platform, request, options, progress)
        .await
        .map_err(WorkflowFailure::early)?;
    let plan = BumpPlan::from_file(&file, request.kind).map_err(WorkflowFailure::early)?;

    info!(
        repo = %platform.config().slug(),
        current = %plan.current,
        next = %plan.next,
        kind = %plan.kind,
        "bumping version"
    );

    let mut saga = Saga {
        platform,
        progress,
        timeout: options.step_timeout,
        stack: CompensationStack::default(),
        result: WorkflowResult::default(),
    };

    match saga.apply(request, &file, &plan).await {
        Ok(()) => {
            info!(branch = %saga.result.branch, pr = saga.result.pr_number, "bump complete");
            Ok(saga.result)
        }
        Err(error) => Err(saga.rollback(error).await),
    }
}

/// Read the version file (step 1, read-only)
pub(crate) async fn fetch(
    platform: &dyn PlatformService,
    request: &BumpRequest,
    options: &BumpOptions,
    progress: &dyn ProgressCallback,
) -> Result<TrackedFile> {
    let file = with_timeout(
        Step::Fetch,
        options.step_timeout,
        platform.get_file(&request.source_branch, &request.file_path),
    )
    .await?;
    progress.on_step(Step::Fetch, &file.path).await;
    Ok(file)
}

/// State of one running bump
struct Saga<'a> {
    platform: &'a dyn PlatformService,
    progress: &'a dyn ProgressCallback,
    timeout: Option<Duration>,
    stack: CompensationStack,
    result: WorkflowResult,
}

impl Saga<'_> {
    async fn call<T>(&self, step: Step, fut: impl Future<Output = Result<T>>) -> Result<T> {
        let value = with_timeout(step, self.timeout, fut).await.inspect_err(|e| {
            warn!(%step, error = %e, "step failed");
        })?;
        info!(%step, "step succeeded");
        Ok(value)
    }

    /// Steps 3 to 7; returns at the first failure
    async fn apply(&mut self, request: &BumpRequest, file: &TrackedFile, plan: &BumpPlan) -> Result<()> {
        let platform = self.platform;

        self.call(
            Step::Branch,
            platform.create_branch(&request.source_branch, &plan.branch),
        )
        .await?;
        self.stack.push(Compensation::DeleteBranch {
            name: plan.branch.clone(),
        });
        self.result.branch.clone_from(&plan.branch);
        self.progress.on_step(Step::Branch, &plan.branch).await;

        // The branch deletion also discards this commit
        self.call(
            Step::Write,
            platform.write_file(
                &file.path,
                &plan.message,
                &file.fingerprint,
                &plan.branch,
                &plan.new_content,
            ),
        )
        .await?;
        self.progress.on_step(Step::Write, &plan.new_version_line).await;

        let pr = self
            .call(
                Step::PullRequest,
                platform.create_pr(
                    &plan.message,
                    &plan.branch,
                    &request.source_branch,
                    &plan.message,
                ),
            )
            .await?;
        self.stack
            .push(Compensation::ClosePullRequest { number: pr.number });
        self.result.pr_number = pr.number;
        self.result.pr_url.clone_from(&pr.html_url);
        self.progress.on_step(Step::PullRequest, &pr.html_url).await;

        let commits = self
            .call(
                Step::Compare,
                platform.compare_commits(&plan.base_tag, &plan.branch),
            )
            .await?;
        self.progress
            .on_step(Step::Compare, &format!("{} commit(s)", commits.len()))
            .await;

        let notes = format_commits(&commits);
        let body = if notes.is_empty() { &plan.message } else { &notes };
        let release = self
            .call(
                Step::Release,
                platform.create_release(&plan.tag, &request.source_branch, &plan.tag, body),
            )
            .await?;
        self.stack
            .push(Compensation::DeleteRelease { id: release.id });
        self.result.release_id = release.id;
        self.result.release_url.clone_from(&release.html_url);
        self.progress.on_step(Step::Release, &release.html_url).await;

        Ok(())
    }

    /// Undo everything pushed so far and build the failure
    async fn rollback(&mut self, error: Error) -> WorkflowFailure {
        warn!(
            error = %error,
            pending = self.stack.len(),
            "bump failed, rolling back"
        );

        let stack = std::mem::take(&mut self.stack);
        let report = stack.unwind(self.platform, self.timeout, self.progress).await;

        let error = if report.is_clean() {
            error
        } else {
            Error::RollbackFailed {
                cause: Box::new(error),
                failures: report.failed.into_iter().map(|(_, e)| e).collect(),
            }
        };

        WorkflowFailure {
            error,
            result: self.result.clone(),
            rolled_back: report.completed,
        }
    }
}
