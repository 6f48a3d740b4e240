use crate::error::{ReleaseError, Result};
use std::fmt;

/// One step of a [`VersionPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object/table key. A purely numeric key also indexes arrays.
    Key(String),
    /// Explicit array index written as `[n]`
    Index(usize),
}

impl Segment {
    /// Array index this segment addresses, if any
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(k) => k.parse().ok(),
        }
    }
}

/// Location of the version inside a manifest, e.g. `version`,
/// `package.version` or `packages[0].version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPath {
    raw: String,
    segments: Vec<Segment>,
}

impl VersionPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |why: &str| {
            ReleaseError::manifest(format!("Invalid version path '{}': {}", raw, why))
        };

        let mut segments = Vec::new();
        for part in raw.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(pos) => (&part[..pos], &part[pos..]),
                None => (part, ""),
            };

            if key.is_empty() && rest.is_empty() {
                return Err(invalid("empty segment"));
            }
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                if !rest.starts_with('[') {
                    return Err(invalid("unexpected characters after ']'"));
                }
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| invalid("array index must be a non-negative integer"))?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
            }
        }

        Ok(VersionPath {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The last segment and the ones leading to it
    pub fn split_last(&self) -> Result<(&Segment, &[Segment])> {
        self.segments
            .split_last()
            .ok_or_else(|| ReleaseError::manifest("Version path is empty"))
    }
}

impl fmt::Display for VersionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
