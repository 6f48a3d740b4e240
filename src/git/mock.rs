use crate::error::{ReleaseError, Result};
use crate::git::{Author, CommitInfo, Repository};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A commit recorded by [`MockRepository::commit_paths`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommit {
    pub paths: Vec<PathBuf>,
    pub message: String,
    pub author: Author,
}

/// Mock repository for testing without actual git operations
///
/// Tags are returned exactly in the order they were added (newest first),
/// filtered by prefix. Write operations are recorded for assertions.
pub struct MockRepository {
    tags: Vec<String>,
    commits: Vec<CommitInfo>,
    branch: String,
    fail_push: bool,
    recorded_commits: Mutex<Vec<RecordedCommit>>,
    created_tags: Mutex<Vec<(String, String)>>,
    pushes: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            tags: Vec::new(),
            commits: Vec::new(),
            branch: "main".to_string(),
            fail_push: false,
            recorded_commits: Mutex::new(Vec::new()),
            created_tags: Mutex::new(Vec::new()),
            pushes: Mutex::new(Vec::new()),
        }
    }

    /// Add a tag; tags added first are reported first (newest)
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.push(name.into());
    }

    /// Add a commit with the given message
    pub fn add_commit(&mut self, hash: impl Into<String>, message: impl Into<String>) {
        self.commits.push(CommitInfo {
            hash: hash.into(),
            message: message.into(),
            author: "Test Author".to_string(),
        });
    }

    /// Set the branch HEAD points to
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    /// Make every push fail
    pub fn fail_pushes(&mut self) {
        self.fail_push = true;
    }

    pub fn recorded_commits(&self) -> Vec<RecordedCommit> {
        self.recorded_commits
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Tags created so far as `(name, message)`
    pub fn created_tags(&self) -> Vec<(String, String)> {
        self.created_tags
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    pub fn pushes(&self) -> Vec<(String, Vec<String>)> {
        self.pushes.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> ReleaseError {
    ReleaseError::Git(git2::Error::from_str("mock lock poisoned"))
}

impl Repository for MockRepository {
    fn semver_tags(&self, tag_prefix: &str) -> Result<Vec<String>> {
        let prefix = crate::domain::TagPrefix::new(tag_prefix);
        Ok(self
            .tags
            .iter()
            .filter(|t| prefix.matches(t))
            .cloned()
            .collect())
    }

    fn commits_since(
        &self,
        _since_tag: Option<&str>,
        _path: Option<&Path>,
    ) -> Result<Vec<CommitInfo>> {
        Ok(self.commits.clone())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn commit_paths(&self, paths: &[PathBuf], message: &str, author: &Author) -> Result<String> {
        let mut commits = self.recorded_commits.lock().map_err(|_| poisoned())?;
        commits.push(RecordedCommit {
            paths: paths.to_vec(),
            message: message.to_string(),
            author: author.clone(),
        });
        Ok(format!("{:040x}", commits.len()))
    }

    fn create_annotated_tag(&self, name: &str, message: &str, _author: &Author) -> Result<()> {
        self.created_tags
            .lock()
            .map_err(|_| poisoned())?
            .push((name.to_string(), message.to_string()));
        Ok(())
    }

    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()> {
        if self.fail_push {
            return Err(ReleaseError::remote(format!("Push to '{}' failed", remote)));
        }
        self.pushes
            .lock()
            .map_err(|_| poisoned())?
            .push((remote.to_string(), refspecs.to_vec()));
        Ok(())
    }
}
