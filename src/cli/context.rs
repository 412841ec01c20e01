//! Shared command context for the CLI
//!
//! Turns parsed arguments into the typed request, options and platform
//! service the bump engine works with.

use gemer::bump::{BumpOptions, BumpRequest};
use gemer::error::{Error, Result};
use gemer::platform::{PlatformService, create_platform_service};
use gemer::types::{BumpKind, PlatformConfig};
use std::time::Duration;

/// Arguments of a bump invocation
#[derive(Debug, Clone, Default)]
pub struct BumpArgs {
    /// Repository owner
    pub owner: Option<String>,
    /// Repository name
    pub repo: Option<String>,
    /// Source branch
    pub branch: String,
    /// Version file path
    pub path: Option<String>,
    /// Explicit token
    pub token: Option<String>,
    /// GitHub Enterprise host
    pub host: Option<String>,
    /// Component to bump
    pub kind: BumpKind,
    /// Only preview
    pub dry_run: bool,
    /// Preview and ask before executing
    pub confirm: bool,
    /// Per-call timeout
    pub step_timeout: Option<Duration>,
}

/// Default location of a gem's version file
pub fn default_version_path(repo: &str) -> String {
    format!("lib/{}/version.rb", repo.to_lowercase())
}

/// Everything a command needs to run a bump
pub struct CommandContext {
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
    /// What to bump
    pub request: BumpRequest,
    /// How to run it
    pub options: BumpOptions,
}

impl CommandContext {
    /// Validate arguments, resolve the token and create the platform service
    pub async fn new(args: &BumpArgs) -> Result<Self> {
        let owner = args
            .owner
            .clone()
            .filter(|o| !o.is_empty())
            .ok_or_else(|| Error::Validation("GitHub username. Set it via `-u`".to_string()))?;
        let repo = args
            .repo
            .clone()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                Error::Validation("GitHub repository name. Set it via `-r`".to_string())
            })?;

        let file_path = args
            .path
            .clone()
            .unwrap_or_else(|| default_version_path(&repo));

        let config = PlatformConfig {
            owner,
            repo,
            host: args.host.clone(),
        };
        let platform = create_platform_service(&config, args.token.as_deref()).await?;

        Ok(Self {
            platform,
            request: BumpRequest::new(args.branch.clone(), file_path, args.kind),
            options: BumpOptions {
                step_timeout: args.step_timeout,
            },
        })
    }
}
