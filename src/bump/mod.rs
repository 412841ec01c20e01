//! Version bump engine
//!
//! Two-phase pattern:
//! 1. Plan - derive the next version, branch, tag and file edit (pure)
//! 2. Execute - apply the plan as a saga with compensations (effectful)
//!
//! `dry_run` stops after planning and lists what execution would do.

mod compensation;
mod dry_run;
mod execute;
mod plan;
mod progress;

pub use compensation::{Compensation, CompensationStack, RollbackReport};
pub use dry_run::{DryRunReport, dry_run};
pub use execute::{BumpOptions, WorkflowFailure, update_version};
pub use plan::{BRANCH_PREFIX, BumpPlan, BumpRequest, branch_name, bump_message};
pub use progress::{NoopProgress, ProgressCallback, Step};
