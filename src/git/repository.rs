use crate::domain::TagPrefix;
use crate::error::{ReleaseError, Result};
use crate::git::{Author, CommitInfo};
use git2::{
    Cred, CredentialType, DiffOptions, IndexAddOption, ObjectType, Oid, PushOptions,
    RemoteCallbacks, Repository as Git2Repo, Signature, Sort,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|_| ReleaseError::Git(git2::Error::from_str("repository lock poisoned")))
    }
}

fn head_oid(repo: &Git2Repo) -> Result<Option<Oid>> {
    match repo.head() {
        Ok(head) => Ok(head.target()),
        Err(e)
            if e.code() == git2::ErrorCode::UnbornBranch
                || e.code() == git2::ErrorCode::NotFound =>
        {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Relative path of `path` inside the work tree, as the index expects it
fn relative_to_workdir(workdir: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        return path.to_path_buf();
    }
    if let Ok(rel) = path.strip_prefix(workdir) {
        return rel.to_path_buf();
    }
    match (path.canonicalize(), workdir.canonicalize()) {
        (Ok(p), Ok(w)) => p.strip_prefix(&w).map(Path::to_path_buf).unwrap_or(p),
        _ => path.to_path_buf(),
    }
}

fn touches_path(repo: &Git2Repo, commit: &git2::Commit<'_>, path: &Path) -> Result<bool> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parents().next() {
        Some(parent) => Some(parent.tree()?),
        None => None,
    };
    let mut opts = DiffOptions::new();
    opts.pathspec(path);
    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;
    Ok(diff.deltas().len() > 0)
}

/// Credentials callback shared by push operations.
///
/// `GITHUB_TOKEN` is used for HTTPS remotes; SSH remotes try the usual key
/// files, then the agent.
fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                if !token.is_empty() {
                    return Cred::userpass_plaintext("x-access-token", &token);
                }
            }
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            let user = username_from_url.unwrap_or("git");
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(user, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }
            if let Ok(cred) = Cred::ssh_key_from_agent(user) {
                return Ok(cred);
            }
        }

        Cred::default()
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => {
            warn!(refname, status, "remote rejected reference update");
            Err(git2::Error::from_str(&format!("Push failed for {}", refname)))
        }
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn semver_tags(&self, tag_prefix: &str) -> Result<Vec<String>> {
        let repo = self.lock()?;
        let prefix = TagPrefix::new(tag_prefix);

        let Some(head) = head_oid(&repo)? else {
            return Ok(Vec::new());
        };

        // commit oid -> tags pointing at it
        let mut tagged: HashMap<Oid, Vec<(semver::Version, String)>> = HashMap::new();
        for name in repo.tag_names(None)?.iter().flatten() {
            let Ok(version) = prefix.semver_of(name) else {
                continue;
            };
            let target = repo
                .find_reference(&format!("refs/tags/{}", name))
                .and_then(|r| r.peel(ObjectType::Commit))
                .map(|obj| obj.id());
            match target {
                Ok(oid) => tagged
                    .entry(oid)
                    .or_default()
                    .push((version, name.to_string())),
                Err(e) => debug!(tag = name, error = %e, "skipping tag that does not point at a commit"),
            }
        }

        if tagged.is_empty() {
            return Ok(Vec::new());
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;

        let mut tags = Vec::new();
        for oid in revwalk {
            if let Some(mut on_commit) = tagged.remove(&oid?) {
                on_commit.sort_by(|a, b| b.0.cmp(&a.0));
                tags.extend(on_commit.into_iter().map(|(_, name)| name));
            }
        }

        Ok(tags)
    }

    fn commits_since(
        &self,
        since_tag: Option<&str>,
        path: Option<&Path>,
    ) -> Result<Vec<CommitInfo>> {
        let repo = self.lock()?;

        let Some(head) = head_oid(&repo)? else {
            return Ok(Vec::new());
        };

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;

        if let Some(tag) = since_tag {
            let stop = repo
                .find_reference(&format!("refs/tags/{}", tag))
                .and_then(|r| r.peel(ObjectType::Commit))
                .map_err(|e| ReleaseError::tag(format!("Cannot find tag '{}': {}", tag, e)))?;
            revwalk.hide(stop.id())?;
        }

        let pathspec = path.map(|p| match repo.workdir() {
            Some(workdir) => relative_to_workdir(workdir, p),
            None => p.to_path_buf(),
        });

        let mut commits = Vec::new();

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = repo.find_commit(oid)?;

            if let Some(pathspec) = &pathspec {
                if !touches_path(&repo, &commit, pathspec)? {
                    continue;
                }
            }

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message: commit.message().unwrap_or("(empty message)").to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
            });
        }

        commits.reverse();
        Ok(commits)
    }

    fn current_branch(&self) -> Result<String> {
        let repo = self.lock()?;
        let head = repo.head()?;
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::Git(git2::Error::from_str("HEAD is not a branch")))
    }

    fn commit_paths(&self, paths: &[PathBuf], message: &str, author: &Author) -> Result<String> {
        let repo = self.lock()?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| ReleaseError::Git(git2::Error::from_str("bare repository")))?
            .to_path_buf();

        let mut index = repo.index()?;
        let relative: Vec<PathBuf> = paths
            .iter()
            .map(|p| relative_to_workdir(&workdir, p))
            .collect();
        index.add_all(
            relative.iter().map(PathBuf::as_path),
            IndexAddOption::DEFAULT,
            None,
        )?;
        index.write()?;

        let tree = repo.find_tree(index.write_tree()?)?;
        let signature = Signature::now(&author.name, &author.email)?;
        let parent = match head_oid(&repo)? {
            Some(oid) => Some(repo.find_commit(oid)?),
            None => None,
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        Ok(oid.to_string())
    }

    fn create_annotated_tag(&self, name: &str, message: &str, author: &Author) -> Result<()> {
        let repo = self.lock()?;
        let head = repo
            .head()?
            .peel(ObjectType::Commit)
            .map_err(|e| ReleaseError::tag(format!("Cannot resolve HEAD: {}", e)))?;
        let signature = Signature::now(&author.name, &author.email)?;

        repo.tag(name, &head, &signature, message, true)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()> {
        let repo = self.lock()?;
        let mut remote_handle = repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        let specs: Vec<&str> = refspecs.iter().map(String::as_str).collect();
        remote_handle
            .push(&specs, Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    ReleaseError::remote(format!("Network error during push: {}", e))
                }
                _ => ReleaseError::remote(format!("Push to '{}' failed: {}", remote, e)),
            })
    }
}
