//! Release notes from compared commits

use crate::types::ComparedCommit;

/// Render one commit as `@author [message](url)`
///
/// Only the first line of the commit message is used.
pub fn format_commit(commit: &ComparedCommit) -> String {
    let summary = commit.message.lines().next().unwrap_or_default().trim_end();
    format!("@{} [{}]({})", commit.author, summary, commit.html_url)
}

/// Render commits one per line, in the order given, with no trailing newline
pub fn format_commits(commits: &[ComparedCommit]) -> String {
    commits
        .iter()
        .map(format_commit)
        .collect::<Vec<_>>()
        .join("\n")
}
