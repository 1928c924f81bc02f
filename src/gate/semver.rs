//! Semantic version parsing for gate decisions

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::gate::error::VersionParseError;

/// Leading `major.minor.patch` of a build version string, ASCII digits only
static LEADING_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+").unwrap());

/// A `major.minor.patch` triple.
///
/// Ordering is lexicographic on (major, minor, patch); pre-release and build
/// suffixes are dropped at parse time and never take part in comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a strict semantic version.
    ///
    /// Exactly three dot-separated non-negative integers, optionally followed
    /// by a `-pre` and/or `+build` suffix.
    ///
    /// Examples:
    /// - "1.2.3" -> (1, 2, 3)
    /// - "1.2.3-beta.1+456" -> (1, 2, 3)
    /// - "1.2" -> error
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        if input.is_empty() {
            return Err(VersionParseError::Empty);
        }
        let version = semver::Version::parse(input).map_err(|e| VersionParseError::Malformed {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from(version))
    }
}

impl From<semver::Version> for SemanticVersion {
    fn from(version: semver::Version) -> Self {
        Self::new(version.major, version.minor, version.patch)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Extract the leading `major.minor.patch` of a build version string.
///
/// Returns `None` if the string does not start with a version triple.
///
/// Examples:
/// - "1.2.3+build.456" -> Some("1.2.3")
/// - "10.20.30-rc1" -> Some("10.20.30")
/// - "v1.2.3" -> None
pub fn leading_version(raw: &str) -> Option<&str> {
    LEADING_VERSION_RE.find(raw).map(|m| m.as_str())
}
