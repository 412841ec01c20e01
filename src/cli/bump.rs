//! Bump command - bump the version, open the PR and draft the release

use crate::cli::context::{BumpArgs, CommandContext};
use crate::cli::style::{CHECK, Stylize, arrow};
use crate::cli::{CliProgress, ExitStatus};
use anstream::{eprintln, println};
use dialoguer::Confirm;
use gemer::bump::{DryRunReport, WorkflowFailure, dry_run, update_version};
use gemer::error::{Error, Result};
use gemer::types::WorkflowResult;

/// Exit status for an error
const fn exit_status_for(error: &Error) -> ExitStatus {
    match error {
        Error::Validation(_) | Error::Auth(_) => ExitStatus::InvalidFlag,
        _ => ExitStatus::Error,
    }
}

/// Run the bump command
pub async fn run_bump(args: BumpArgs) -> ExitStatus {
    let ctx = match CommandContext::new(&args).await {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{} {e}", "Failed to set up gemer:".warn());
            return exit_status_for(&e);
        }
    };

    if args.dry_run {
        return match dry_run(ctx.platform.as_ref(), &ctx.request, &ctx.options).await {
            Ok(report) => {
                print_dry_run(&report);
                ExitStatus::Ok
            }
            Err(e) => {
                eprintln!(
                    "{} {e}",
                    "Failed to update version with dry-run option:".warn()
                );
                exit_status_for(&e)
            }
        };
    }

    if args.confirm {
        match confirm(&ctx).await {
            Ok(true) => println!(),
            Ok(false) => {
                println!("{}", "Aborted".muted());
                return ExitStatus::Ok;
            }
            Err(e) => {
                eprintln!("{} {e}", "Failed to prepare the bump:".warn());
                return exit_status_for(&e);
            }
        }
    }

    println!(
        "{} {}",
        "Bumping".emphasis(),
        format!(
            "{} ({} on {})",
            ctx.platform.config().slug(),
            ctx.request.kind,
            ctx.request.source_branch
        )
        .accent()
    );

    match update_version(
        ctx.platform.as_ref(),
        &ctx.request,
        &ctx.options,
        &CliProgress,
    )
    .await
    {
        Ok(result) => {
            print_success(&result);
            ExitStatus::Ok
        }
        Err(failure) => {
            print_failure(&failure);
            exit_status_for(failure.root_cause())
        }
    }
}

/// Show the plan and ask whether to go ahead
async fn confirm(ctx: &CommandContext) -> Result<bool> {
    let report = dry_run(ctx.platform.as_ref(), &ctx.request, &ctx.options).await?;
    print_dry_run(&report);

    Confirm::new()
        .with_prompt("Proceed with bump?")
        .default(true)
        .interact()
        .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))
}

fn print_dry_run(report: &DryRunReport) {
    println!("{}:", "Bump plan".emphasis());
    println!();
    println!("{report}");
    println!();
    println!("{}", "Run without --dry-run to execute.".muted());
}

fn print_success(result: &WorkflowResult) {
    println!();
    println!(
        "{}",
        format!("{CHECK} Now, your gem is ready to release! Remaining tasks are ...").success()
    );
    println!();
    println!(
        "  1. Access {} and merge the PR",
        result.pr_url.accent()
    );
    println!(
        "  2. Access {} and publish the release",
        result.release_url.accent()
    );
}

fn print_failure(failure: &WorkflowFailure) {
    eprintln!();
    eprintln!("{} {}", "Failed to update version:".warn(), failure.root_cause());

    if let Error::RollbackFailed { failures, .. } = &failure.error {
        eprintln!(
            "{}",
            "Rollback was incomplete; clean up these by hand:".warn()
        );
        for e in failures {
            eprintln!("  {} {}", arrow(), e.muted());
        }
    } else if !failure.rolled_back.is_empty() {
        eprintln!(
            "{}",
            format!("Rolled back {} step(s).", failure.rolled_back.len()).muted()
        );
    }

    let result = &failure.result;
    if !result.is_empty() {
        eprintln!("{}", "Partial results:".muted());
        if !result.branch.is_empty() {
            eprintln!("  branch: {}", result.branch);
        }
        if result.has_pr() {
            eprintln!("  pull request: #{} {}", result.pr_number, result.pr_url);
        }
        if result.has_release() {
            eprintln!("  release: {} {}", result.release_id, result.release_url);
        }
    }
}
