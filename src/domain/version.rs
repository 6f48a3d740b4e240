use crate::error::{ReleaseError, Result};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Version used when neither a current nor a valid fallback version exists
    pub const INITIAL: Version = Version {
        major: 0,
        minor: 1,
        patch: 0,
    };

    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string read from a manifest or a tag (prefix already stripped).
    ///
    /// Plain `X.Y.Z` is accepted directly. Anything else must be a valid semver
    /// string (pre-release and build metadata are dropped), otherwise the string
    /// is rejected with [`ReleaseError::InvalidVersionFormat`].
    pub fn parse(version: &str) -> Result<Self> {
        let trimmed = version.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() == 3 {
            let numeric: Option<Vec<u64>> = parts.iter().map(|p| p.parse::<u64>().ok()).collect();
            if let Some(n) = numeric {
                return Ok(Version::new(n[0], n[1], n[2]));
            }
        }

        semver::Version::parse(trimmed)
            .map(|v| Version::new(v.major, v.minor, v.patch))
            .map_err(|_| ReleaseError::invalid_version(version))
    }

    /// Validate a fallback version with the semver parser.
    ///
    /// Returns `None` when the string is not a valid semantic version.
    pub fn from_semver(version: &str) -> Option<Self> {
        semver::Version::parse(version.trim())
            .ok()
            .map(|v| Version::new(v.major, v.minor, v.patch))
    }

    /// Bump version according to release type.
    ///
    /// A component that would overflow is rejected with
    /// [`ReleaseError::InvalidVersionFormat`].
    pub fn bump(&self, release_type: &ReleaseType) -> Result<Self> {
        let overflow = || ReleaseError::invalid_version(self.to_string());
        let bumped = match release_type {
            ReleaseType::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            ReleaseType::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            ReleaseType::Patch | ReleaseType::Other(_) => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        };
        Ok(bumped)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Magnitude of the next release as recommended by commit analysis.
///
/// Any token other than `major`, `minor` or `patch` is kept verbatim and bumps
/// like a patch release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
    Other(String),
}

impl ReleaseType {
    pub fn as_str(&self) -> &str {
        match self {
            ReleaseType::Major => "major",
            ReleaseType::Minor => "minor",
            ReleaseType::Patch => "patch",
            ReleaseType::Other(token) => token,
        }
    }
}

impl FromStr for ReleaseType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "major" => ReleaseType::Major,
            "minor" => ReleaseType::Minor,
            "patch" => ReleaseType::Patch,
            other => ReleaseType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_prerelease_keeps_triple() {
        let v = Version::parse("2.0.0-beta.1").unwrap();
        assert_eq!(v, Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("one.two.three").is_err());
        assert!(matches!(
            Version::parse("v1.2.3"),
            Err(ReleaseError::InvalidVersionFormat { .. })
        ));
    }

    #[test]
    fn test_from_semver_rejects_garbage() {
        assert_eq!(Version::from_semver("2.3.4"), Some(Version::new(2, 3, 4)));
        assert_eq!(Version::from_semver("not-a-version"), None);
        assert_eq!(Version::from_semver(""), None);
    }

    #[test]
    fn test_version_bump_major() {
        let bumped = Version::new(1, 2, 3).bump(&ReleaseType::Major).unwrap();
        assert_eq!(bumped, Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let bumped = Version::new(1, 2, 3).bump(&ReleaseType::Minor).unwrap();
        assert_eq!(bumped, Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let bumped = Version::new(1, 2, 3).bump(&ReleaseType::Patch).unwrap();
        assert_eq!(bumped, Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_unknown_token_is_patch() {
        let bumped = Version::new(1, 2, 3)
            .bump(&"prerelease".parse::<ReleaseType>().unwrap())
            .unwrap();
        assert_eq!(bumped, Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_overflow_is_rejected() {
        let max = Version::new(u64::MAX, 0, 0);
        assert!(matches!(
            max.bump(&ReleaseType::Major),
            Err(ReleaseError::InvalidVersionFormat { .. })
        ));
        assert_eq!(max.bump(&ReleaseType::Minor).unwrap(), Version::new(u64::MAX, 1, 0));

        let max_patch = Version::new(1, 2, u64::MAX);
        assert!(max_patch.bump(&ReleaseType::Patch).is_err());
        assert!(Version::new(1, u64::MAX, 0).bump(&ReleaseType::Minor).is_err());
    }

    #[test]
    fn test_release_type_round_trip_names() {
        for name in ["major", "minor", "patch", "custom"] {
            let rt: ReleaseType = name.parse().unwrap();
            assert_eq!(rt.to_string(), name);
        }
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(Version::INITIAL.to_string(), "0.1.0");
    }
}
