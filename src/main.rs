//! gemer - bump a gem's version on GitHub, open the PR and draft the release

mod cli;

use clap::{ArgGroup, Parser};
use cli::BumpArgs;
use gemer::types::BumpKind;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Bump a gem's version on GitHub, open the PR and draft the release
#[derive(Parser, Debug)]
#[command(name = "gemer", version, about, disable_version_flag = true)]
#[command(group(ArgGroup::new("bump").args(["major", "minor", "patch"])))]
struct Cli {
    /// GitHub owner (user or organization) of the gem's repository
    #[arg(short = 'u', long, value_name = "OWNER")]
    username: Option<String>,

    /// GitHub repository of the gem
    #[arg(short = 'r', long, value_name = "REPO")]
    repository: Option<String>,

    /// Branch the release is based on
    #[arg(short = 'b', long, default_value = "master")]
    branch: String,

    /// Path to version.rb from the repository root [default: lib/<repository>/version.rb]
    #[arg(short = 'p', long)]
    path: Option<String>,

    /// GitHub token [default: $GITHUB_TOKEN, $GH_TOKEN, or `gh auth token`]
    #[arg(short = 't', long)]
    token: Option<String>,

    /// GitHub Enterprise host
    #[arg(long)]
    host: Option<String>,

    /// Show what would be done without making changes
    #[arg(short = 'd', long)]
    dry_run: bool,

    /// Preview the plan and prompt for confirmation before executing
    #[arg(long, conflicts_with = "dry_run")]
    confirm: bool,

    /// Increment the major version
    #[arg(long)]
    major: bool,

    /// Increment the minor version
    #[arg(long)]
    minor: bool,

    /// Increment the patch version (default)
    #[arg(long)]
    patch: bool,

    /// Give up on any single GitHub call after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Log more detail (repeat for more)
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print version
    #[arg(short = 'v', short_alias = 'V', long = "version", action = clap::ArgAction::Version)]
    _version: Option<bool>,
}

impl Cli {
    const fn bump_kind(&self) -> BumpKind {
        if self.major {
            BumpKind::Major
        } else if self.minor {
            BumpKind::Minor
        } else {
            BumpKind::Patch
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "gemer=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let kind = cli.bump_kind();
    let args = BumpArgs {
        owner: cli.username,
        repo: cli.repository,
        branch: cli.branch,
        path: cli.path,
        token: cli.token,
        host: cli.host,
        kind,
        dry_run: cli.dry_run,
        confirm: cli.confirm,
        step_timeout: cli.timeout.map(std::time::Duration::from_secs),
    };

    let status = cli::run_bump(args).await;
    tracing::debug!(?status, "exiting");
    ExitCode::from(status as u8)
}
