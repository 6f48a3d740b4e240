//! Override hooks for extensibility
//!
//! Users can supply scripts that run at key release points:
//! - pre-version-generation: may replace the computed version
//! - pre-tag-generation: may replace the computed tag
//! - pre-commit: side effects before the release commit
//!
//! The first two are served by the "pre-changelog-generation" script, the last
//! by the "pre-commit" script. A hook that is not configured, or whose script
//! does not exist, leaves the computed value untouched.

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{CommitContext, HookContext, HookType};

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Optional overrides applied while computing a release.
///
/// Every method defaults to "no change". `Ok(None)` means the hook declined to
/// replace the value; `Ok(Some(v))` replaces it; `Err` aborts the run.
#[async_trait]
pub trait OverrideHooks: Send + Sync {
    async fn pre_version_generation(&self, _version: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn pre_tag_generation(&self, _tag: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn pre_commit(&self, _context: &CommitContext) -> Result<()> {
        Ok(())
    }
}

/// No hooks configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl OverrideHooks for NoHooks {}

/// Hook scripts loaded from the configured paths
#[derive(Debug, Clone, Default)]
pub struct HookSet {
    pre_changelog_generation: Option<PathBuf>,
    pre_commit: Option<PathBuf>,
}

impl HookSet {
    /// Bind the configured script paths, resolved against `base_dir`.
    ///
    /// A configured path that does not exist is dropped with a warning.
    pub fn load(
        base_dir: &Path,
        pre_changelog_generation: Option<&str>,
        pre_commit: Option<&str>,
    ) -> Self {
        HookSet {
            pre_changelog_generation: resolve_script(base_dir, pre_changelog_generation),
            pre_commit: resolve_script(base_dir, pre_commit),
        }
    }

    pub fn pre_changelog_generation(&self) -> Option<&Path> {
        self.pre_changelog_generation.as_deref()
    }

    pub fn pre_commit_script(&self) -> Option<&Path> {
        self.pre_commit.as_deref()
    }
}

fn resolve_script(base_dir: &Path, configured: Option<&str>) -> Option<PathBuf> {
    let configured = configured.filter(|p| !p.trim().is_empty())?;
    let path = base_dir.join(configured);
    if path.is_file() {
        info!(script = %path.display(), "using hook script");
        Some(path)
    } else {
        warn!(script = %path.display(), "hook script does not exist, ignoring");
        None
    }
}

#[async_trait]
impl OverrideHooks for HookSet {
    async fn pre_version_generation(&self, version: &str) -> Result<Option<String>> {
        let Some(script) = self.pre_changelog_generation.as_deref() else {
            return Ok(None);
        };
        let context = HookContext::new(HookType::PreVersionGeneration).with_version(version);
        let modified = HookExecutor::execute(script, &context).await?;
        if let Some(ref v) = modified {
            info!(version = %v, "using modified version");
        }
        Ok(modified)
    }

    async fn pre_tag_generation(&self, tag: &str) -> Result<Option<String>> {
        let Some(script) = self.pre_changelog_generation.as_deref() else {
            return Ok(None);
        };
        let context = HookContext::new(HookType::PreTagGeneration).with_tag(tag);
        let modified = HookExecutor::execute(script, &context).await?;
        if let Some(ref t) = modified {
            info!(tag = %t, "using modified tag");
        }
        Ok(modified)
    }

    async fn pre_commit(&self, commit: &CommitContext) -> Result<()> {
        let Some(script) = self.pre_commit.as_deref() else {
            return Ok(());
        };
        let context = HookContext::new(HookType::PreCommit)
            .with_version(&commit.version)
            .with_tag(&commit.tag);
        // pre-commit output is informational only
        if let Some(output) = HookExecutor::execute(script, &context).await? {
            debug!(%output, "pre-commit hook output");
        }
        Ok(())
    }
}

/// Apply a replacement returned by a hook, keeping `value` when there is none
pub fn apply_override(value: String, replacement: Option<String>) -> String {
    replacement.filter(|r| !r.is_empty()).unwrap_or(value)
}
