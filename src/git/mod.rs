//! Git operations abstraction layer
//!
//! The [Repository] trait defines the git operations git-release needs:
//! reading the semver tag history, collecting commits for analysis, and
//! publishing the release commit and tag.
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for tests
//!
//! Code should depend on the trait so the release flow can be exercised
//! without a repository on disk.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Commit information for analysis and changelog rendering
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

impl CommitInfo {
    /// First seven characters of the hash
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.hash.len());
        &self.hash[..end]
    }
}

/// Identity used for the release commit and tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// Common git operation trait for abstraction
///
/// All implementors must be `Send + Sync`: the tag history is read from
/// concurrent version tasks.
pub trait Repository: Send + Sync {
    /// Tags of the form `{prefix}{semver}` reachable from HEAD, newest first.
    ///
    /// "Newest" follows history order from HEAD; tags on the same commit are
    /// ordered by descending version. Callers must not re-sort.
    fn semver_tags(&self, tag_prefix: &str) -> Result<Vec<String>>;

    /// Commits reachable from HEAD but not from `since_tag`, oldest first.
    ///
    /// When `path` is given, only commits touching that path are returned.
    fn commits_since(&self, since_tag: Option<&str>, path: Option<&Path>)
        -> Result<Vec<CommitInfo>>;

    /// Name of the branch HEAD points to
    fn current_branch(&self) -> Result<String>;

    /// Stage `paths` and commit them on HEAD. Returns the new commit hash.
    fn commit_paths(&self, paths: &[PathBuf], message: &str, author: &Author) -> Result<String>;

    /// Create (or move) an annotated tag on HEAD
    fn create_annotated_tag(&self, name: &str, message: &str, author: &Author) -> Result<()>;

    /// Push refspecs to a remote
    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()>;
}
