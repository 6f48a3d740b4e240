use crate::error::{ReleaseError, Result};

/// Prefix prepended to a version to form a release tag (e.g. "v" -> "v1.2.3")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPrefix {
    pub prefix: String,
}

impl TagPrefix {
    /// Create a new tag prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        TagPrefix {
            prefix: prefix.into(),
        }
    }

    /// Format a version as a tag name
    /// Example: prefix="v", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &str) -> String {
        format!("{}{}", self.prefix, version)
    }

    /// Strip the prefix from a tag, returning the version part.
    ///
    /// Returns `None` if the tag does not carry this prefix.
    pub fn strip<'a>(&self, tag: &'a str) -> Option<&'a str> {
        tag.strip_prefix(self.prefix.as_str())
    }

    /// Whether the tag is this prefix followed by a valid semantic version
    pub fn matches(&self, tag: &str) -> bool {
        self.strip(tag)
            .map(|rest| semver::Version::parse(rest).is_ok())
            .unwrap_or(false)
    }

    /// Parsed semantic version carried by a tag with this prefix
    pub fn semver_of(&self, tag: &str) -> Result<semver::Version> {
        let rest = self.strip(tag).ok_or_else(|| {
            ReleaseError::tag(format!(
                "Tag '{}' does not start with prefix '{}'",
                tag, self.prefix
            ))
        })?;
        semver::Version::parse(rest)
            .map_err(|e| ReleaseError::tag(format!("Tag '{}' is not a semver tag: {}", tag, e)))
    }
}
