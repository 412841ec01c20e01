//! Command-line interface

mod bump;
mod context;
mod style;

pub use bump::run_bump;
pub use context::BumpArgs;

use anstream::println;
use async_trait::async_trait;
use gemer::bump::{Compensation, ProgressCallback, Step};
use gemer::error::Error;
use style::{Stylize, arrow, check, cross};

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Success
    Ok = 0,
    /// The workflow failed
    Error = 1,
    /// A required flag is missing or invalid
    InvalidFlag = 3,
}

/// Progress callback printing one line per step
pub struct CliProgress;

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_step(&self, step: Step, detail: &str) {
        let label = match step {
            Step::Fetch => "Read",
            Step::Branch => "Created branch",
            Step::Write => "Committed",
            Step::PullRequest => "Opened pull request",
            Step::Compare => "Compared",
            Step::Release => "Drafted release",
        };
        println!("{} {} {}", check(), label, detail.accent());
    }

    async fn on_rollback(&self, compensation: &Compensation, error: Option<&Error>) {
        match error {
            None => println!("  {} Rolled back: {}", arrow(), compensation.muted()),
            Some(e) => println!(
                "  {} Rollback failed: {} ({})",
                cross(),
                compensation.warn(),
                e.muted()
            ),
        }
    }
}
