//! SIF protocol versions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A SIF specification version such as `1.5r1` or `2.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SifVersion {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

impl SifVersion {
    pub const SIF11: SifVersion = SifVersion::new(1, 1, 0);
    pub const SIF15R1: SifVersion = SifVersion::new(1, 5, 1);
    pub const SIF20: SifVersion = SifVersion::new(2, 0, 0);
    pub const SIF20R1: SifVersion = SifVersion::new(2, 0, 1);
    pub const SIF21: SifVersion = SifVersion::new(2, 1, 0);
    pub const SIF22: SifVersion = SifVersion::new(2, 2, 0);
    pub const SIF23: SifVersion = SifVersion::new(2, 3, 0);
    pub const SIF24: SifVersion = SifVersion::new(2, 4, 0);
    pub const SIF25: SifVersion = SifVersion::new(2, 5, 0);
    pub const SIF26: SifVersion = SifVersion::new(2, 6, 0);

    pub const EARLIEST: SifVersion = SifVersion::SIF11;
    pub const LATEST: SifVersion = SifVersion::SIF26;

    pub const fn new(major: u8, minor: u8, revision: u8) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// Pre-2.0 versions use the 1.x wire conventions.
    pub fn is_sif1x(&self) -> bool {
        self.major == 1
    }

    /// Parse the `major.minor[rN]` form.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (major, rest) = text.split_once('.')?;
        let (minor, revision) = match rest.split_once('r') {
            Some((minor, revision)) => (minor, revision.parse().ok()?),
            None => (rest, 0),
        };
        Some(Self::new(major.parse().ok()?, minor.parse().ok()?, revision))
    }
}

impl Default for SifVersion {
    fn default() -> Self {
        SifVersion::LATEST
    }
}

impl fmt::Display for SifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.revision == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}r{}", self.major, self.minor, self.revision)
        }
    }
}

impl FromStr for SifVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SifVersion::parse(s).ok_or_else(|| format!("invalid SIF version: {}", s))
    }
}

impl TryFrom<String> for SifVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SifVersion> for String {
    fn from(version: SifVersion) -> Self {
        version.to_string()
    }
}
