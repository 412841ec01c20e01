//! Dry run - read-only preview of a bump
//!
//! Fetches the version file, plans the bump and lists the commits the
//! release would contain, without creating or modifying anything.

use crate::bump::execute::{BumpOptions, fetch, with_timeout};
use crate::bump::plan::{BumpPlan, BumpRequest};
use crate::bump::progress::{NoopProgress, Step};
use crate::changelog::format_commits;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::ComparedCommit;
use std::fmt;
use tracing::info;

/// What a bump would do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunReport {
    /// `owner/repo`
    pub repository: String,
    /// Branch the bump is based on
    pub source_branch: String,
    /// Version file path
    pub file_path: String,
    /// The planned bump
    pub plan: BumpPlan,
    /// Commits since the current release tag
    pub commits: Vec<ComparedCommit>,
}

impl DryRunReport {
    /// Release notes the draft release would get
    pub fn release_notes(&self) -> String {
        format_commits(&self.commits)
    }
}

impl fmt::Display for DryRunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = &self.plan;
        writeln!(
            f,
            "Would bump {} ({}) from {} to {} ({} bump)",
            self.repository, self.source_branch, plan.current, plan.next, plan.kind
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "1. Create branch {} from {}",
            plan.branch, self.source_branch
        )?;
        writeln!(f, "2. Edit {} on {}:", self.file_path, plan.branch)?;
        writeln!(f, "   - {}", plan.version_line.trim())?;
        writeln!(f, "   + {}", plan.new_version_line.trim())?;
        writeln!(
            f,
            "3. Open pull request \"{}\" ({} -> {})",
            plan.message, plan.branch, self.source_branch
        )?;
        if self.commits.is_empty() {
            write!(
                f,
                "4. Draft release {} targeting {} (no commits since {})",
                plan.tag, self.source_branch, plan.base_tag
            )
        } else {
            writeln!(
                f,
                "4. Draft release {} targeting {} with {} commit(s) since {}:",
                plan.tag,
                self.source_branch,
                self.commits.len(),
                plan.base_tag
            )?;
            write!(f, "{}", self.release_notes())
        }
    }
}

/// Preview a bump without mutating anything
///
/// Compares against `source_branch` itself, since no bump branch exists.
pub async fn dry_run(
    platform: &dyn PlatformService,
    request: &BumpRequest,
    options: &BumpOptions,
) -> Result<DryRunReport> {
    request.validate()?;

    let file = fetch(platform, request, options, &NoopProgress).await?;
    let plan = BumpPlan::from_file(&file, request.kind)?;

    let commits = with_timeout(
        Step::Compare,
        options.step_timeout,
        platform.compare_commits(&plan.base_tag, &request.source_branch),
    )
    .await?;

    info!(
        current = %plan.current,
        next = %plan.next,
        commits = commits.len(),
        "dry run planned"
    );

    Ok(DryRunReport {
        repository: platform.config().slug(),
        source_branch: request.source_branch.clone(),
        file_path: file.path,
        plan,
        commits,
    })
}
