//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{Call, MockPlatformService, Op};

use gemer::bump::BumpRequest;
use gemer::types::{BumpKind, ComparedCommit, PlatformConfig};

pub const VERSION_PATH: &str = "lib/test_gem/version.rb";
pub const FILE_SHA: &str = "3d21ec53a331a6f037a91c368710b99387d012c1";

pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "testowner".to_string(),
        repo: "test_gem".to_string(),
        host: None,
    }
}

/// A gem's version.rb declaring `version`
pub fn version_file(version: &str) -> String {
    format!("module TestGem\n  VERSION = '{version}'\nend\n")
}

/// Mock serving a version.rb declaring `version`
pub fn mock_with_version(version: &str) -> MockPlatformService {
    let mock = MockPlatformService::with_config(github_config());
    mock.set_file(&version_file(version), FILE_SHA);
    mock
}

pub fn make_commit(author: &str, message: &str, sha: &str) -> ComparedCommit {
    ComparedCommit {
        author: author.to_string(),
        message: message.to_string(),
        html_url: format!("https://github.com/testowner/test_gem/commit/{sha}"),
    }
}

pub fn request(kind: BumpKind) -> BumpRequest {
    BumpRequest::new("master", VERSION_PATH, kind)
}
