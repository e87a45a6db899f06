//! Robot Framework language versions and the `[min, max)` windows that gate
//! which syntax a file may use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid Robot Framework version: {0:?}")]
    Invalid(String),
}

/// A `major.minor[.patch]` language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RobotVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl RobotVersion {
    /// Newest grammar this crate knows about; used when nothing is declared.
    pub const LATEST: RobotVersion = RobotVersion::new(3, 1, 0);

    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub const fn minor(major: u16, minor: u16) -> Self {
        Self::new(major, minor, 0)
    }
}

impl Default for RobotVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl FromStr for RobotVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::Invalid(s.to_string());
        let mut parts = s.trim().split('.');
        let mut next = |required: bool| -> Result<u16, VersionError> {
            match parts.next() {
                Some(part) => part.parse::<u16>().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };
        let major = next(true)?;
        let minor = next(true)?;
        let patch = next(false)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(major, minor, patch))
    }
}

impl TryFrom<String> for RobotVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RobotVersion> for String {
    fn from(value: RobotVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RobotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

/// Inclusive-exclusive window of versions; an absent bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionRange {
    pub min: Option<RobotVersion>,
    pub max: Option<RobotVersion>,
}

impl VersionRange {
    pub const ANY: VersionRange = VersionRange {
        min: None,
        max: None,
    };

    pub const fn since(min: RobotVersion) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn before(max: RobotVersion) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub const fn between(min: RobotVersion, max: RobotVersion) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    #[must_use]
    pub fn contains(&self, version: RobotVersion) -> bool {
        self.min.is_none_or(|min| version >= min) && self.max.is_none_or(|max| version < max)
    }
}
