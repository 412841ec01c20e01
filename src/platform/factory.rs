//! Platform service construction

use crate::auth::get_github_auth;
use crate::error::Result;
use crate::platform::{GitHubService, PlatformService};
use crate::types::PlatformConfig;
use tracing::debug;

/// Create a GitHub platform service for `config`.
///
/// `token` takes precedence over every other token source.
pub async fn create_platform_service(
    config: &PlatformConfig,
    token: Option<&str>,
) -> Result<Box<dyn PlatformService>> {
    let auth = get_github_auth(token, config.host.as_deref()).await?;
    debug!(source = ?auth.source, host = ?config.host, "resolved GitHub token");

    let service = GitHubService::new(
        &auth.token,
        config.owner.clone(),
        config.repo.clone(),
        config.host.clone(),
    )?;
    Ok(Box::new(service))
}
