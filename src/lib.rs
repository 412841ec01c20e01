//! gemer - bump a gem's version on GitHub
//!
//! Reads `VERSION` from a gem's `version.rb`, commits the bumped version to
//! a new branch, opens a pull request and drafts a release listing the
//! commits since the previous tag. If any step fails, the steps already
//! done are rolled back.

pub mod auth;
pub mod bump;
pub mod changelog;
pub mod error;
pub mod platform;
pub mod types;
pub mod version;

pub use error::{Error, Result};
