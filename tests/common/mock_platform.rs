//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use gemer::error::{Error, Result};
use gemer::platform::PlatformService;
use gemer::types::{ComparedCommit, PlatformConfig, PullRequest, Release, TrackedFile};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Platform operation, used to target error injection and delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    GetFile,
    CreateBranch,
    WriteFile,
    CreatePr,
    ClosePr,
    CompareCommits,
    CreateRelease,
    DeleteRelease,
    DeleteBranch,
}

impl Op {
    /// Whether the operation changes remote state
    pub const fn is_mutation(self) -> bool {
        !matches!(self, Self::GetFile | Self::CompareCommits)
    }
}

/// Record of one call, with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetFile {
        branch: String,
        path: String,
    },
    CreateBranch {
        base: String,
        name: String,
    },
    WriteFile {
        path: String,
        message: String,
        fingerprint: String,
        branch: String,
        content: String,
    },
    CreatePr {
        title: String,
        head: String,
        base: String,
        body: String,
    },
    ClosePr(u64),
    CompareCommits {
        base: String,
        head: String,
    },
    CreateRelease {
        tag: String,
        target: String,
        name: String,
        body: String,
    },
    DeleteRelease(u64),
    DeleteBranch(String),
}

impl Call {
    pub const fn op(&self) -> Op {
        match self {
            Self::GetFile { .. } => Op::GetFile,
            Self::CreateBranch { .. } => Op::CreateBranch,
            Self::WriteFile { .. } => Op::WriteFile,
            Self::CreatePr { .. } => Op::CreatePr,
            Self::ClosePr(_) => Op::ClosePr,
            Self::CompareCommits { .. } => Op::CompareCommits,
            Self::CreateRelease { .. } => Op::CreateRelease,
            Self::DeleteRelease(_) => Op::DeleteRelease,
            Self::DeleteBranch(_) => Op::DeleteBranch,
        }
    }
}

/// Simple mock platform service for testing
///
/// Features:
/// - One version file, with a fingerprint checked on write
/// - Auto-incrementing PR numbers and release IDs
/// - Ordered call log for verifying step and rollback order
/// - Per-operation error injection and artificial delays
pub struct MockPlatformService {
    config: PlatformConfig,
    file: Mutex<Option<(String, String)>>,
    sha_after_fetch: Mutex<Option<String>>,
    commits: Mutex<Vec<ComparedCommit>>,
    next_pr_number: AtomicU64,
    next_release_id: AtomicU64,
    calls: Mutex<Vec<Call>>,
    errors: Mutex<HashMap<Op, Error>>,
    delays: Mutex<HashMap<Op, Duration>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config and no version file
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            file: Mutex::new(None),
            sha_after_fetch: Mutex::new(None),
            commits: Mutex::new(Vec::new()),
            next_pr_number: AtomicU64::new(1),
            next_release_id: AtomicU64::new(100),
            calls: Mutex::new(Vec::new()),
            errors: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
        }
    }

    // === Setup ===

    /// Serve `content` as the version file, with fingerprint `sha`
    pub fn set_file(&self, content: &str, sha: &str) {
        *self.file.lock().unwrap() = Some((content.to_string(), sha.to_string()));
    }

    /// Simulate someone else pushing to the file right after the next fetch
    pub fn push_after_fetch(&self, sha: &str) {
        *self.sha_after_fetch.lock().unwrap() = Some(sha.to_string());
    }

    /// Commits returned by `compare_commits`
    pub fn set_commits(&self, commits: Vec<ComparedCommit>) {
        *self.commits.lock().unwrap() = commits;
    }

    // === Error injection ===

    /// Make `op` fail with `error`
    pub fn fail_with(&self, op: Op, error: Error) {
        self.errors.lock().unwrap().insert(op, error);
    }

    /// Make `op` fail with a platform error carrying `msg`
    pub fn fail(&self, op: Op, msg: &str) {
        self.fail_with(op, Error::Platform(msg.to_string()));
    }

    /// Make `op` sleep before answering
    pub fn delay(&self, op: Op, duration: Duration) {
        self.delays.lock().unwrap().insert(op, duration);
    }

    // === Call verification ===

    /// Every call, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Every operation called, in order
    pub fn ops(&self) -> Vec<Op> {
        self.calls().iter().map(Call::op).collect()
    }

    /// Number of calls that change remote state
    pub fn mutation_count(&self) -> usize {
        self.ops().into_iter().filter(|op| op.is_mutation()).count()
    }

    /// Assert that `op` was never called
    pub fn assert_not_called(&self, op: Op) {
        let ops = self.ops();
        assert!(
            !ops.contains(&op),
            "Expected {op:?} NOT to be called but got: {ops:?}"
        );
    }

    /// Assert that `call` was made
    pub fn assert_called(&self, call: &Call) {
        let calls = self.calls();
        assert!(
            calls.contains(call),
            "Expected {call:?} but got: {calls:?}"
        );
    }

    /// Log the call, apply its delay, and return the injected error if any
    async fn record(&self, call: Call) -> Result<()> {
        let op = call.op();
        self.calls.lock().unwrap().push(call);

        let delay = self.delays.lock().unwrap().get(&op).copied();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }

        let injected = self.errors.lock().unwrap().get(&op).cloned();
        injected.map_or(Ok(()), Err)
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_file(&self, branch: &str, path: &str) -> Result<TrackedFile> {
        self.record(Call::GetFile {
            branch: branch.to_string(),
            path: path.to_string(),
        })
        .await?;

        let mut file = self.file.lock().unwrap();
        let (content, sha) = file
            .clone()
            .ok_or_else(|| Error::GitHubApi(format!("get version file: 404: {path}")))?;
        if let Some(pushed) = self.sha_after_fetch.lock().unwrap().take()
            && let Some((_, current)) = file.as_mut()
        {
            *current = pushed;
        }
        drop(file);

        Ok(TrackedFile {
            path: path.to_string(),
            branch: branch.to_string(),
            content,
            fingerprint: sha,
        })
    }

    async fn create_branch(&self, base: &str, name: &str) -> Result<()> {
        self.record(Call::CreateBranch {
            base: base.to_string(),
            name: name.to_string(),
        })
        .await
    }

    async fn write_file(
        &self,
        path: &str,
        message: &str,
        fingerprint: &str,
        branch: &str,
        content: &str,
    ) -> Result<()> {
        self.record(Call::WriteFile {
            path: path.to_string(),
            message: message.to_string(),
            fingerprint: fingerprint.to_string(),
            branch: branch.to_string(),
            content: content.to_string(),
        })
        .await?;

        let current_sha = self.file.lock().unwrap().as_ref().map(|(_, sha)| sha.clone());
        if current_sha.as_deref() != Some(fingerprint) {
            return Err(Error::Conflict(format!(
                "{path} does not match {fingerprint}"
            )));
        }
        Ok(())
    }

    async fn create_pr(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.record(Call::CreatePr {
            title: title.to_string(),
            head: head.to_string(),
            base: base.to_string(),
            body: body.to_string(),
        })
        .await?;

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/test/repo/pull/{number}"),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
        })
    }

    async fn close_pr(&self, pr_number: u64) -> Result<()> {
        self.record(Call::ClosePr(pr_number)).await
    }

    async fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<ComparedCommit>> {
        self.record(Call::CompareCommits {
            base: base.to_string(),
            head: head.to_string(),
        })
        .await?;
        Ok(self.commits.lock().unwrap().clone())
    }

    async fn create_release(
        &self,
        tag: &str,
        target: &str,
        name: &str,
        body: &str,
    ) -> Result<Release> {
        self.record(Call::CreateRelease {
            tag: tag.to_string(),
            target: target.to_string(),
            name: name.to_string(),
            body: body.to_string(),
        })
        .await?;

        let id = self.next_release_id.fetch_add(1, Ordering::SeqCst);
        Ok(Release {
            id,
            html_url: format!("https://github.com/test/repo/releases/tag/{tag}"),
            tag_name: tag.to_string(),
            draft: true,
        })
    }

    async fn delete_release(&self, release_id: u64) -> Result<()> {
        self.record(Call::DeleteRelease(release_id)).await
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        self.record(Call::DeleteBranch(name.to_string())).await
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
