//! Main workflow orchestration logic
//!
//! Drives one release end to end: recommend a release type from the commit
//! log, resolve the new version through the configured strategies, render
//! the changelog, and publish the commit and tag. Everything the workflow
//! touches is injected, so it runs against [`crate::git::MockRepository`]
//! and a scratch directory in tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::analyzer::{Recommendation, VersionAnalyzer};
use crate::bump::BumpContext;
use crate::changelog::{write_changelog, Changelog, ChangelogGenerator};
use crate::config::ReleaseConfig;
use crate::domain::{ReleaseType, TagPrefix};
use crate::error::{ReleaseError, Result};
use crate::git::{Author, CommitInfo, Repository};
use crate::hooks::{apply_override, CommitContext, OverrideHooks};
use crate::strategy::{extension_of, resolve_strategy, StrategyDeps, VersioningStrategy};
use crate::ui::Outputs;

/// Dispatch token of the tag strategy
pub const GIT_TOKEN: &str = "git";

/// Whether strategies persist the new version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMode {
    /// `bump`: write the new version back
    Write,
    /// `get_version`: compute only
    ReadOnly,
}

/// Options of a single run that are not part of the configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Resolve and render, but write nothing
    pub dry_run: bool,
}

/// Version settled by the strategies of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Version of the first target
    pub version: String,
    /// Existing files backing the targets, in configuration order
    pub files: Vec<PathBuf>,
}

/// Result of a successful release
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub recommendation: Recommendation,
    pub version: String,
    pub tag: String,
    pub changelog: String,
    pub clean_changelog: String,
    /// Whether a release commit was created
    pub committed: bool,
    /// Whether anything was pushed to the remote
    pub pushed: bool,
}

impl WorkflowResult {
    /// Step outputs for CI
    pub fn outputs(&self) -> Outputs {
        let mut outputs = Outputs::new();
        outputs.set("changelog", self.changelog.as_str());
        outputs.set("clean_changelog", self.clean_changelog.as_str());
        outputs.set("version", self.version.as_str());
        outputs.set("tag", self.tag.as_str());
        outputs.set("skipped", "false");
        outputs
    }
}

/// Outputs of a run that stopped because there was nothing to release
pub fn skipped_outputs() -> Outputs {
    let mut outputs = Outputs::new();
    outputs.set("skipped", "true");
    outputs
}

/// The release engine for one invocation
pub struct ReleaseWorkflow {
    config: ReleaseConfig,
    repository: Arc<dyn Repository>,
    hooks: Arc<dyn OverrideHooks>,
    workdir: PathBuf,
}

impl ReleaseWorkflow {
    /// Files in the configuration are resolved against `workdir`
    pub fn new(
        config: ReleaseConfig,
        repository: Arc<dyn Repository>,
        hooks: Arc<dyn OverrideHooks>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        ReleaseWorkflow {
            config,
            repository,
            hooks,
            workdir: workdir.into(),
        }
    }

    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    fn bump_context(&self) -> BumpContext {
        BumpContext::new(self.config.fallback_version.clone(), Arc::clone(&self.hooks))
    }

    fn strategy_deps(&self) -> StrategyDeps {
        StrategyDeps::new(Arc::clone(&self.repository), self.config.tag_prefix.clone())
    }

    /// Run a repository call on the blocking pool
    async fn with_repository<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn Repository) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        tokio::task::spawn_blocking(move || f(repository.as_ref()))
            .await
            .map_err(|e| ReleaseError::Task(e.to_string()))?
    }

    /// Commits since the newest prefixed tag, scoped to `commit_path`
    pub async fn release_commits(&self) -> Result<Vec<CommitInfo>> {
        let prefix = self.config.tag_prefix.clone();
        let path = self
            .config
            .commit_path_filter()
            .map(|p| self.workdir.join(p));

        self.with_repository(move |repo| {
            let tags = repo.semver_tags(&prefix)?;
            let since = tags.first().map(String::as_str);
            debug!(since = since.unwrap_or("<root>"), "collecting commits");
            repo.commits_since(since, path.as_deref())
        })
        .await
    }

    /// Recommended release type for `commits`
    pub fn recommend(&self, commits: &[CommitInfo]) -> Recommendation {
        let messages: Vec<String> = commits.iter().map(|c| c.message.clone()).collect();
        let recommendation =
            VersionAnalyzer::new(self.config.conventional_commits.clone()).recommend(&messages);
        info!(
            release_type = %recommendation.release_type,
            reason = %recommendation.reason,
            "recommended release type"
        );
        recommendation
    }

    /// Bind a fresh strategy for `token` to `file` and resolve its version.
    ///
    /// Fails with [`ReleaseError::UnsupportedTarget`] when no strategy
    /// handles `token`.
    pub async fn handle_versioning_by_extension(
        &self,
        token: &str,
        file: &str,
        release_type: &ReleaseType,
        mode: VersionMode,
    ) -> Result<Box<dyn VersioningStrategy>> {
        let mut strategy = resolve_strategy(token, &self.strategy_deps())
            .ok_or_else(|| ReleaseError::unsupported_target(file, token))?;

        strategy.init(&self.workdir.join(file), &self.config.version_path);

        let context = self.bump_context();
        match mode {
            VersionMode::Write => strategy.bump(release_type, &context).await?,
            VersionMode::ReadOnly => strategy.get_version(release_type, &context).await?,
        }
        Ok(strategy)
    }

    /// Resolve the new version from tags or from every version file.
    ///
    /// Version files are handled concurrently; the first failure aborts the
    /// rest. The first file's version is the release version.
    pub async fn resolve_version(
        &self,
        release_type: &ReleaseType,
        mode: VersionMode,
    ) -> Result<ResolvedVersion> {
        let strategies = if self.config.uses_tag_version() {
            info!("using git tags to determine the new version");
            vec![
                self.handle_versioning_by_extension(
                    GIT_TOKEN,
                    &self.config.version_file,
                    release_type,
                    mode,
                )
                .await?,
            ]
        } else {
            let files = self.config.version_files();
            if files.is_empty() {
                return Err(ReleaseError::config("No version file configured"));
            }
            info!(files = %files.join(", "), "files to bump");

            try_join_all(files.iter().map(|file| {
                let token = extension_of(file);
                debug!(file = %file, extension = token, "resolving version");
                self.handle_versioning_by_extension(token, file, release_type, mode)
            }))
            .await?
        };

        settle(&strategies).await
    }

    /// Tag for `version`, after the pre-tag-generation hook
    pub async fn tag_for(&self, version: &str) -> Result<String> {
        let tag = TagPrefix::new(self.config.tag_prefix.as_str()).format(version);
        let replacement = self.hooks.pre_tag_generation(&tag).await?;
        Ok(apply_override(tag, replacement))
    }

    fn changelog_generator(&self) -> ChangelogGenerator {
        ChangelogGenerator::new(self.config.changelog.sections.clone())
    }

    fn ensure_not_empty(&self, commits: &[CommitInfo]) -> Result<()> {
        if self.config.skip_on_empty && !self.changelog_generator().has_entries(commits) {
            info!("generated changelog is empty and skip-on-empty is enabled");
            return Err(ReleaseError::NoChanges);
        }
        Ok(())
    }

    /// Version that a release would produce, without writing anything
    pub async fn get_version(&self) -> Result<(Recommendation, String)> {
        let commits = self.release_commits().await?;
        let recommendation = self.recommend(&commits);
        self.ensure_not_empty(&commits)?;

        let resolved = self
            .resolve_version(&recommendation.release_type, VersionMode::ReadOnly)
            .await?;
        Ok((recommendation, resolved.version))
    }

    /// Full release
    ///
    /// 1. Collect commits since the last release and recommend a type
    /// 2. Stop with [`ReleaseError::NoChanges`] if configured and empty
    /// 3. Resolve the new version (writing version files)
    /// 4. Compute the tag and render the changelog
    /// 5. Write the changelog, commit, tag and push
    ///
    /// With `dry_run`, steps 3 to 5 write nothing.
    pub async fn run(&self, options: WorkflowOptions) -> Result<WorkflowResult> {
        let commits = self.release_commits().await?;
        let recommendation = self.recommend(&commits);
        self.ensure_not_empty(&commits)?;

        let mode = if options.dry_run {
            VersionMode::ReadOnly
        } else {
            VersionMode::Write
        };
        let resolved = self
            .resolve_version(&recommendation.release_type, mode)
            .await?;
        info!(version = %resolved.version, "new version");

        let tag = self.tag_for(&resolved.version).await?;
        let changelog = self.changelog_generator().render(&tag, &commits);
        debug!(changelog = %changelog.text, "changelog generated");

        let (committed, pushed) = if options.dry_run {
            info!(%tag, "dry run, nothing written");
            (false, false)
        } else {
            self.publish(&resolved, &tag, &changelog).await?
        };

        Ok(WorkflowResult {
            recommendation,
            version: resolved.version,
            tag,
            changelog: changelog.text,
            clean_changelog: changelog.clean,
            committed,
            pushed,
        })
    }

    fn changelog_path(&self) -> Option<PathBuf> {
        self.config.changelog_file().map(|f| self.workdir.join(f))
    }

    /// Write the changelog, then commit, tag and push. Returns whether a
    /// commit was made and whether anything was pushed.
    async fn publish(
        &self,
        resolved: &ResolvedVersion,
        tag: &str,
        changelog: &Changelog,
    ) -> Result<(bool, bool)> {
        let changelog_path = self.changelog_path();
        if let Some(path) = &changelog_path {
            write_changelog(path, &changelog.text).await?;
            info!(file = %path.display(), "changelog written");
        }

        let author = Author {
            name: self.config.git_user_name.clone(),
            email: self.config.git_user_email.clone(),
        };

        let committed = if self.config.skip_commit {
            false
        } else {
            self.hooks
                .pre_commit(&CommitContext {
                    tag: tag.to_string(),
                    version: resolved.version.clone(),
                })
                .await?;

            let mut paths = resolved.files.clone();
            paths.extend(changelog_path);
            let message = self.config.commit_message(tag);
            let commit_author = author.clone();
            let hash = self
                .with_repository(move |repo| repo.commit_paths(&paths, &message, &commit_author))
                .await?;
            info!(commit = %hash, "release commit created");
            true
        };

        let tag_name = tag.to_string();
        let tag_message = changelog.text.clone();
        self.with_repository(move |repo| repo.create_annotated_tag(&tag_name, &tag_message, &author))
            .await?;
        info!(%tag, "tag created");

        if self.config.skip_push {
            return Ok((committed, false));
        }

        let remote = self.config.remote.clone();
        let tag_ref = format!("+refs/tags/{tag}:refs/tags/{tag}");
        self.with_repository(move |repo| {
            let mut refspecs = Vec::new();
            if committed {
                let branch = repo.current_branch()?;
                refspecs.push(format!("refs/heads/{branch}:refs/heads/{branch}"));
            }
            refspecs.push(tag_ref);
            repo.push(&remote, &refspecs)
        })
        .await?;
        info!(remote = %self.config.remote, "release pushed");

        Ok((committed, true))
    }
}

async fn settle(strategies: &[Box<dyn VersioningStrategy>]) -> Result<ResolvedVersion> {
    let version = strategies
        .first()
        .and_then(|s| s.resolved_version())
        .ok_or_else(|| ReleaseError::Task("no version was resolved".to_string()))?
        .to_string();

    for strategy in strategies.iter().skip(1) {
        if strategy.resolved_version() != Some(version.as_str()) {
            warn!(
                file = %strategy.location().map(Path::display).map(|d| d.to_string()).unwrap_or_default(),
                resolved = strategy.resolved_version().unwrap_or_default(),
                release = %version,
                "version differs from the release version"
            );
        }
    }

    let mut files = Vec::new();
    for location in strategies.iter().filter_map(|s| s.location()) {
        if is_file(location).await {
            files.push(location.to_path_buf());
        }
    }

    Ok(ResolvedVersion { version, files })
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
