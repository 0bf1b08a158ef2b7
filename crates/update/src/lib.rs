//! Update descriptor published per platform.
//!
//! Plain data consumed by whatever checks for updates. Field names match
//! the camelCase JSON documents served by the update endpoint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Four-part application version (`major.minor.build.revision`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Errors produced when parsing a [`Version`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,

    #[error("too many version components in {0:?}")]
    TooManyParts(String),

    #[error("invalid version component {0:?}")]
    InvalidPart(String),
}

impl FromStr for Version {
    type Err = VersionError;

    /// Parses `1`, `1.2`, `1.2.3` or `1.2.3.4`; missing parts are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut parts = [0u32; 4];
        let mut count = 0;
        for piece in s.split('.') {
            if count == parts.len() {
                return Err(VersionError::TooManyParts(s.to_string()));
            }
            parts[count] = piece
                .parse()
                .map_err(|_| VersionError::InvalidPart(piece.to_string()))?;
            count += 1;
        }

        let [major, minor, build, revision] = parts;
        Ok(Self::new(major, minor, build, revision))
    }
}

/// Extra key/value attached to an update (release notes URL, checksum, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraAttribute {
    pub key: String,
    pub value: String,
}

/// Latest release available for one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformUpdate {
    pub platform_name: String,
    pub major_version: u32,
    pub minor_version: u32,
    pub build_version: u32,
    pub revision_version: u32,
    pub download_url: String,
    #[serde(default)]
    pub extra_attributes: Vec<ExtraAttribute>,
}

impl PlatformUpdate {
    /// Version advertised by this update.
    pub fn version(&self) -> Version {
        Version::new(
            self.major_version,
            self.minor_version,
            self.build_version,
            self.revision_version,
        )
    }

    /// Whether this update is newer than `current`.
    pub fn is_newer_than(&self, current: &Version) -> bool {
        self.version() > *current
    }

    /// Value of an extra attribute by key.
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra_attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}
