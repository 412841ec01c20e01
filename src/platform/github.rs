//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{ComparedCommit, PlatformConfig, PullRequest, Release, TrackedFile};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use octocrab::Octocrab;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const WRITE_FILE_ACTION: &str = "update version file";

// REST response types for the endpoints called without octocrab

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    content: Option<String>,
}

#[derive(Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Deserialize)]
struct CompareResponse {
    commits: Vec<CompareCommit>,
}

#[derive(Deserialize)]
struct CompareCommit {
    html_url: String,
    author: Option<CompareUser>,
    commit: CompareCommitDetail,
}

#[derive(Deserialize)]
struct CompareUser {
    login: String,
}

#[derive(Deserialize)]
struct CompareCommitDetail {
    message: String,
    author: Option<CompareGitAuthor>,
}

#[derive(Deserialize)]
struct CompareGitAuthor {
    name: String,
}

impl From<CompareCommit> for ComparedCommit {
    fn from(c: CompareCommit) -> Self {
        // Commits whose email isn't linked to an account have no login
        let author = c
            .author
            .map(|u| u.login)
            .or_else(|| c.commit.author.map(|a| a.name))
            .unwrap_or_default();

        Self {
            author,
            message: c.commit.message,
            html_url: c.html_url,
        }
    }
}

/// GitHub service using octocrab for pulls/releases and raw REST for the rest
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests (contents, refs, compare, deletions)
    http_client: Client,
    /// API base URL without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` means github.com.
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let api_base = host
            .as_ref()
            .map_or_else(|| DEFAULT_API_BASE.to_string(), |h| format!("https://{h}/api/v3"));

        Self::with_api_base(
            token,
            PlatformConfig { owner, repo, host },
            &api_base,
        )
    }

    /// Create a service talking to an explicit API base URL
    pub fn with_api_base(token: &str, config: PlatformConfig, api_base: &str) -> Result<Self> {
        let parsed = Url::parse(api_base)
            .map_err(|e| Error::GitHubApi(format!("invalid API base URL '{api_base}': {e}")))?;
        let api_base = parsed.as_str().trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("gemer")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn repo_url(&self, rest: &str) -> String {
        format!(
            "{}/repos/{}/{}/{rest}",
            self.api_base, self.config.owner, self.config.repo
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

/// Send a request and turn non-success statuses into errors
async fn send(builder: RequestBuilder, action: &str) -> Result<Response> {
    let response = builder
        .send()
        .await
        .map_err(|e| Error::GitHubApi(format!("failed to {action}: {e}")))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ApiErrorBody>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());

    debug!(%status, action, %message, "GitHub request failed");
    // A stale or missing blob sha on write comes back as 409 or 422
    let stale_sha = status == StatusCode::UNPROCESSABLE_ENTITY
        && action == WRITE_FILE_ACTION
        && message.contains("sha");
    if status == StatusCode::CONFLICT || stale_sha {
        return Err(Error::Conflict(format!("failed to {action}: {message}")));
    }
    Err(Error::GitHubApi(format!(
        "failed to {action}: {status}: {message}"
    )))
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation(what.to_string()));
    }
    Ok(())
}

/// Percent-encode each segment of a repository path, keeping the slashes
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_file(&self, branch: &str, path: &str) -> Result<TrackedFile> {
        require(branch, "GitHub branch name")?;
        require(path, "version file path")?;
        debug!(branch, path, "getting file");

        let url = self.repo_url(&format!("contents/{}", encode_path(path)));
        let response = send(
            self.request(Method::GET, &url).query(&[("ref", branch)]),
            "get version file",
        )
        .await?;

        let file: ContentResponse = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse file contents: {e}")))?;

        if file.kind != "file" {
            return Err(Error::GitHubApi(format!(
                "{path} on {branch} is a {}, not a file",
                file.kind
            )));
        }

        // GitHub wraps the base64 payload at 60 columns
        let encoded: String = file
            .content
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| Error::GitHubApi(format!("Failed to decode {path}: {e}")))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| Error::GitHubApi(format!("{path} is not valid UTF-8: {e}")))?;

        debug!(path, sha = %file.sha, "got file");
        Ok(TrackedFile {
            path: path.to_string(),
            branch: branch.to_string(),
            content,
            fingerprint: file.sha,
        })
    }

    async fn create_branch(&self, base: &str, name: &str) -> Result<()> {
        require(base, "GitHub base branch name")?;
        require(name, "GitHub new branch name")?;
        debug!(base, name, "creating branch");

        let url = self.repo_url(&format!("git/ref/heads/{}", encode_path(base)));
        let base_ref: RefResponse = send(self.request(Method::GET, &url), "get ref")
            .await?
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse ref: {e}")))?;

        send(
            self.request(Method::POST, &self.repo_url("git/refs"))
                .json(&json!({
                    "ref": format!("refs/heads/{name}"),
                    "sha": base_ref.object.sha,
                })),
            "create a new branch",
        )
        .await?;

        debug!(name, sha = %base_ref.object.sha, "created branch");
        Ok(())
    }

    async fn write_file(
        &self,
        path: &str,
        message: &str,
        fingerprint: &str,
        branch: &str,
        content: &str,
    ) -> Result<()> {
        require(path, "version file path")?;
        require(message, "commit message")?;
        require(fingerprint, "file sha")?;
        require(branch, "GitHub branch name")?;
        require(content, "file content")?;
        debug!(path, branch, fingerprint, "writing file");

        let url = self.repo_url(&format!("contents/{}", encode_path(path)));
        send(
            self.request(Method::PUT, &url).json(&json!({
                "message": message,
                "content": STANDARD.encode(content),
                "sha": fingerprint,
                "branch": branch,
            })),
            WRITE_FILE_ACTION,
        )
        .await?;

        debug!(path, branch, "wrote file");
        Ok(())
    }

    async fn create_pr(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest> {
        require(title, "pull request title")?;
        require(head, "pull request head branch")?;
        require(base, "pull request base branch")?;
        require(body, "pull request body")?;
        debug!(head, base, "creating PR");

        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn close_pr(&self, pr_number: u64) -> Result<()> {
        debug!(pr_number, "closing PR");
        self.client
            .pulls(&self.config.owner, &self.config.repo)
            .update(pr_number)
            .state(octocrab::params::pulls::State::Closed)
            .send()
            .await?;
        debug!(pr_number, "closed PR");
        Ok(())
    }

    async fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<ComparedCommit>> {
        require(base, "base commit")?;
        require(head, "head commit")?;
        debug!(base, head, "comparing commits");

        let url = self.repo_url(&format!(
            "compare/{}...{}",
            urlencoding::encode(base),
            urlencoding::encode(head)
        ));
        let comparison: CompareResponse =
            send(self.request(Method::GET, &url), "compare commits")
                .await?
                .json()
                .await
                .map_err(|e| Error::GitHubApi(format!("Failed to parse comparison: {e}")))?;

        let commits: Vec<ComparedCommit> =
            comparison.commits.into_iter().map(Into::into).collect();
        debug!(base, head, count = commits.len(), "compared commits");
        Ok(commits)
    }

    async fn create_release(
        &self,
        tag: &str,
        target: &str,
        name: &str,
        body: &str,
    ) -> Result<Release> {
        require(tag, "release tag name")?;
        require(target, "release target commitish")?;
        require(name, "release name")?;
        require(body, "release body")?;
        debug!(tag, target, "creating draft release");

        let release = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .create(tag)
            .target_commitish(target)
            .name(name)
            .body(body)
            .draft(true)
            .send()
            .await?;

        let result = Release {
            id: release.id.0,
            html_url: release.html_url.to_string(),
            tag_name: release.tag_name,
            draft: release.draft,
        };
        debug!(release_id = result.id, "created draft release");
        Ok(result)
    }

    async fn delete_release(&self, release_id: u64) -> Result<()> {
        debug!(release_id, "deleting release");
        let url = self.repo_url(&format!("releases/{release_id}"));
        send(self.request(Method::DELETE, &url), "delete release").await?;
        debug!(release_id, "deleted release");
        Ok(())
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        require(name, "GitHub branch name")?;
        debug!(name, "deleting branch");
        let url = self.repo_url(&format!("git/refs/heads/{}", encode_path(name)));
        send(self.request(Method::DELETE, &url), "delete branch").await?;
        debug!(name, "deleted branch");
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
