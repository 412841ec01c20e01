//! Bump planning - pure functions deriving every name and edit a bump makes
//!
//! No I/O happens here. The coordinator and the dry run both build a
//! `BumpPlan` from the fetched version file and then act on (or report) it.

use crate::error::{Error, Result};
use crate::types::{BumpKind, TrackedFile};
use crate::version::{Version, extract_version, find_version_line, replace_version};

/// Prefix of every bump branch
pub const BRANCH_PREFIX: &str = "bumps_up_to_";

/// What to bump, and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpRequest {
    /// Branch holding the version file; also the PR base and release target
    pub source_branch: String,
    /// Path of the version file from the repository root
    pub file_path: String,
    /// Component to increment
    pub kind: BumpKind,
}

impl BumpRequest {
    /// Create a new request
    pub fn new(source_branch: impl Into<String>, file_path: impl Into<String>, kind: BumpKind) -> Self {
        Self {
            source_branch: source_branch.into(),
            file_path: file_path.into(),
            kind,
        }
    }

    /// Reject empty inputs before any remote call is made
    pub fn validate(&self) -> Result<()> {
        if self.source_branch.is_empty() {
            return Err(Error::Validation("GitHub branch name".to_string()));
        }
        if self.file_path.is_empty() {
            return Err(Error::Validation("version file path".to_string()));
        }
        Ok(())
    }
}

/// Branch a bump to `next` is made on
pub fn branch_name(next: &Version) -> String {
    format!("{BRANCH_PREFIX}{next}")
}

/// Commit message, PR title and PR body for a bump to `next`
pub fn bump_message(next: &Version) -> String {
    format!("Bumps up to {next}")
}

/// Everything a bump will do, derived from the current version file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpPlan {
    /// Component being incremented
    pub kind: BumpKind,
    /// Version found in the file
    pub current: Version,
    /// Version after the bump
    pub next: Version,
    /// Branch to create (`bumps_up_to_<next>`)
    pub branch: String,
    /// Tag of the current release, the base of the commit comparison
    pub base_tag: String,
    /// Tag of the new release (`v<next>`)
    pub tag: String,
    /// Commit message and PR title/body
    pub message: String,
    /// The `VERSION` line as it is now
    pub version_line: String,
    /// The `VERSION` line after the edit
    pub new_version_line: String,
    /// Full file content after the edit
    pub new_content: String,
}

impl BumpPlan {
    /// Plan a bump of `file` (PURE - no I/O)
    pub fn from_file(file: &TrackedFile, kind: BumpKind) -> Result<Self> {
        let current = extract_version(&file.content)?;
        let next = current.bump(kind)?;
        let version_line = find_version_line(&file.content).unwrap_or_default();

        // Only the first occurrence is replaced, which may sit before VERSION
        let new_content = replace_version(&file.content, &current, &next);
        if extract_version(&new_content)? != next {
            return Err(Error::VersionFormat(format!(
                "{current} appears in {} before the VERSION line; bumping it would leave VERSION unchanged",
                file.path
            )));
        }
        let new_version_line = find_version_line(&new_content)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            kind,
            current,
            next,
            branch: branch_name(&next),
            base_tag: current.tag(),
            tag: next.tag(),
            message: bump_message(&next),
            version_line: version_line.to_string(),
            new_version_line,
            new_content,
        })
    }
}
