//! Version extraction and bumping
//!
//! Pure functions over the text of a gem's `version.rb`. The version line
//! must assign a quoted `major.minor.patch` literal to `VERSION`.

use crate::error::{Error, Result};
use crate::types::BumpKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

/// Matches `VERSION = '1.2.3'` (single or double quotes)
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"VERSION\s*=\s*['"](\d+\.\d+\.\d+)['"]"#).expect("version pattern is valid")
});

/// A `major.minor.patch` version triple
///
/// Ordering is lexicographic over (major, minor, patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component
    pub patch: u64,
}

impl Version {
    /// Create a version from its components
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Increment exactly one component.
    ///
    /// Lower-order components are left as they are: `1.2.3` bumped by
    /// `Minor` is `1.3.3`, not `1.3.0`.
    pub fn bump(self, kind: BumpKind) -> Result<Self> {
        let overflow = || Error::VersionFormat(format!("cannot bump {kind} of {self}: overflow"));
        let mut next = self;
        match kind {
            BumpKind::Major => next.major = self.major.checked_add(1).ok_or_else(overflow)?,
            BumpKind::Minor => next.minor = self.minor.checked_add(1).ok_or_else(overflow)?,
            BumpKind::Patch => next.patch = self.patch.checked_add(1).ok_or_else(overflow)?,
        }
        Ok(next)
    }

    /// Release tag for this version (`v1.2.3`)
    pub fn tag(&self) -> String {
        format!("v{self}")
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parsed = semver::Version::parse(s)
            .map_err(|e| Error::VersionFormat(format!("invalid version '{s}': {e}")))?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(Error::VersionFormat(format!(
                "invalid version '{s}': pre-release and build metadata are not supported"
            )));
        }

        Ok(Self::new(parsed.major, parsed.minor, parsed.patch))
    }
}

/// Find the version literal assigned to `VERSION`.
///
/// Returns the literal exactly as written in the file. The first matching
/// line wins.
pub fn find_version_literal(content: &str) -> Option<&str> {
    VERSION_PATTERN
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The full line holding the `VERSION` assignment, without its newline
pub fn find_version_line(content: &str) -> Option<&str> {
    let m = VERSION_PATTERN.find(content)?;
    let start = content[..m.start()].rfind('\n').map_or(0, |i| i + 1);
    let end = content[m.end()..]
        .find('\n')
        .map_or(content.len(), |i| m.end() + i);
    Some(content[start..end].trim_end_matches('\r'))
}

/// Extract the version assigned to `VERSION` in `content`
pub fn extract_version(content: &str) -> Result<Version> {
    let literal = find_version_literal(content).ok_or_else(|| {
        Error::VersionFormat(
            "no line of the form VERSION = 'x.y.z' found in the version file".to_string(),
        )
    })?;
    literal.parse()
}

/// Parse `current` and bump it
pub fn bump(current: &str, kind: BumpKind) -> Result<Version> {
    current.parse::<Version>()?.bump(kind)
}

/// Replace the first occurrence of `current` with `next` in `content`
pub fn replace_version(content: &str, current: &Version, next: &Version) -> String {
    content.replacen(&current.to_string(), &next.to_string(), 1)
}
