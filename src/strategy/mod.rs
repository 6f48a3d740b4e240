//! Versioning strategies
//!
//! A strategy is bound to one version-bearing target: a manifest file plus
//! the path of the version inside it, or the repository's tag history. It
//! reads the current version, delegates to [`crate::bump`] and, when the
//! medium is writable, stores the new version back.
//!
//! - [manifest::ManifestStrategy] over [json_file::JsonFormat] and
//!   [toml_file::TomlFormat]
//! - [git::GitTagStrategy]: read-only, tag history scoped by prefix
//!
//! [dispatch::resolve_strategy] picks the implementation for a file.

pub mod dispatch;
pub mod git;
pub mod json_file;
pub mod manifest;
pub mod toml_file;
pub mod version_path;

pub use dispatch::{extension_of, resolve_strategy, StrategyDeps};
pub use git::GitTagStrategy;
pub use json_file::JsonFormat;
pub use manifest::{ManifestFormat, ManifestStrategy};
pub use toml_file::TomlFormat;
pub use version_path::{Segment, VersionPath};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use crate::bump::BumpContext;
use crate::domain::ReleaseType;
use crate::error::{ReleaseError, Result};

/// Binding shared by all strategies: where the version lives and what was
/// resolved for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyTarget {
    pub location: Option<PathBuf>,
    pub version_path: Option<String>,
    pub resolved_version: Option<String>,
}

impl StrategyTarget {
    pub fn bind(&mut self, location: Option<&Path>, version_path: &str) {
        self.location = location.map(Path::to_path_buf);
        self.version_path = Some(version_path.to_string());
    }
}

/// One storage medium for a version.
///
/// Lifecycle: construct, [`init`](Self::init), then exactly one of
/// [`bump`](Self::bump) or [`get_version`](Self::get_version); afterwards
/// [`resolved_version`](Self::resolved_version) holds the result.
#[async_trait]
pub trait VersioningStrategy: Send + Sync {
    /// Short name of the medium, used in logs
    fn name(&self) -> &'static str;

    fn target(&self) -> &StrategyTarget;

    fn target_mut(&mut self) -> &mut StrategyTarget;

    /// Bind the target. No I/O.
    fn init(&mut self, location: &Path, version_path: &str) {
        self.target_mut().bind(Some(location), version_path);
    }

    fn location(&self) -> Option<&Path> {
        self.target().location.as_deref()
    }

    fn version_path(&self) -> Option<&str> {
        self.target().version_path.as_deref()
    }

    /// Version computed by the last `bump`/`get_version`
    fn resolved_version(&self) -> Option<&str> {
        self.target().resolved_version.as_deref()
    }

    /// Raw content of the target, or an empty string if it does not exist
    async fn read(&self) -> Result<String> {
        let Some(location) = self.location() else {
            return Ok(String::new());
        };
        match tokio::fs::read_to_string(location).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    file = %location.display(),
                    "tried to read file but it does not exist"
                );
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the target with `new_content`
    async fn update(&self, new_content: &str) -> Result<()> {
        let location = self.location().ok_or_else(|| {
            ReleaseError::manifest(format!("{} strategy has no file to update", self.name()))
        })?;
        tokio::fs::write(location, new_content).await?;
        Ok(())
    }

    /// Compute the next version, persist it if the medium is writable, and
    /// record it as the resolved version.
    async fn bump(&mut self, release_type: &ReleaseType, context: &BumpContext) -> Result<()>;

    /// Compute the next version without persisting it
    async fn get_version(&mut self, release_type: &ReleaseType, context: &BumpContext)
        -> Result<()>;
}
