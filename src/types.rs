//! Core types for gemer

use serde::{Deserialize, Serialize};

/// Which component of the version to increment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BumpKind {
    /// Increment the major component
    Major,
    /// Increment the minor component
    Minor,
    /// Increment the patch component
    #[default]
    Patch,
}

impl std::fmt::Display for BumpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

/// A version file read from the hosting platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Path from the repository root
    pub path: String,
    /// Branch the file was read from
    pub branch: String,
    /// Decoded file content
    pub content: String,
    /// Opaque token (blob SHA) that must be echoed back on write
    pub fingerprint: String,
}

/// One commit from a base...head comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparedCommit {
    /// Author login
    pub author: String,
    /// Commit message
    pub message: String,
    /// Web URL for the commit
    pub html_url: String,
}

/// A pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// A release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release ID
    pub id: u64,
    /// Web URL for the release
    pub html_url: String,
    /// Tag the release points at
    pub tag_name: String,
    /// Whether the release is still a draft
    pub draft: bool,
}

/// Side effects a bump workflow has produced so far
///
/// Fields are filled in only after the remote call producing them has
/// succeeded, and are never cleared by the workflow itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResult {
    /// Branch created for the bump (empty until created)
    pub branch: String,
    /// PR number (zero until opened)
    pub pr_number: u64,
    /// PR web URL (empty until opened)
    pub pr_url: String,
    /// Release ID (zero until created)
    pub release_id: u64,
    /// Release web URL (empty until created)
    pub release_url: String,
}

impl WorkflowResult {
    /// Whether no remote side effect has been recorded
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether a PR has been recorded
    pub const fn has_pr(&self) -> bool {
        self.pr_number != 0
    }

    /// Whether a release has been recorded
    pub const fn has_release(&self) -> bool {
        self.release_id != 0
    }
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl PlatformConfig {
    /// `owner/repo` slug
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
