//! Hosting platform services
//!
//! Provides the remote operations the bump workflow needs: reading and
//! writing the version file, branches, pull requests, comparisons and
//! releases.

mod factory;
mod github;

pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{ComparedCommit, PlatformConfig, PullRequest, Release, TrackedFile};
use async_trait::async_trait;

/// Platform service trait for the operations a bump performs
///
/// Every call is a single remote round trip. The bump workflow treats all
/// errors from these methods alike: any failure stops the workflow and
/// rolls back what was already done.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Read a file from a branch, along with its fingerprint
    async fn get_file(&self, branch: &str, path: &str) -> Result<TrackedFile>;

    /// Create branch `name` pointing at the head of `base`
    async fn create_branch(&self, base: &str, name: &str) -> Result<()>;

    /// Replace the content of `path` on `branch` with a new commit.
    ///
    /// `fingerprint` must be the value returned by [`get_file`]; a stale
    /// fingerprint fails with [`Error::Conflict`].
    ///
    /// [`get_file`]: Self::get_file
    /// [`Error::Conflict`]: crate::error::Error::Conflict
    async fn write_file(
        &self,
        path: &str,
        message: &str,
        fingerprint: &str,
        branch: &str,
        content: &str,
    ) -> Result<()>;

    /// Open a pull request from `head` into `base`
    async fn create_pr(&self, title: &str, head: &str, base: &str, body: &str)
    -> Result<PullRequest>;

    /// Close a pull request without merging
    async fn close_pr(&self, pr_number: u64) -> Result<()>;

    /// List the commits reachable from `head` but not from `base`, oldest first
    async fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<ComparedCommit>>;

    /// Create a draft release
    async fn create_release(
        &self,
        tag: &str,
        target: &str,
        name: &str,
        body: &str,
    ) -> Result<Release>;

    /// Delete a release
    async fn delete_release(&self, release_id: u64) -> Result<()>;

    /// Delete a branch
    async fn delete_branch(&self, name: &str) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
