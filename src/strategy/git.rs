use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{StrategyTarget, VersioningStrategy};
use crate::bump::{compute_next_version, BumpContext};
use crate::domain::{ReleaseType, TagPrefix};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;

/// Version taken from the newest `{prefix}{semver}` tag.
///
/// Read-only: nothing is written back, the tag itself is created later when
/// the release is published.
pub struct GitTagStrategy {
    target: StrategyTarget,
    repository: Arc<dyn Repository>,
    tag_prefix: TagPrefix,
}

impl GitTagStrategy {
    pub fn new(repository: Arc<dyn Repository>, tag_prefix: &str) -> Self {
        GitTagStrategy {
            target: StrategyTarget::default(),
            repository,
            tag_prefix: TagPrefix::new(tag_prefix),
        }
    }

    /// Newest tag with the prefix removed
    pub async fn latest_tagged_version(&self) -> Result<Option<String>> {
        let repository = Arc::clone(&self.repository);
        let prefix = self.tag_prefix.prefix.clone();
        let tags = tokio::task::spawn_blocking(move || repository.semver_tags(&prefix))
            .await
            .map_err(|e| ReleaseError::Task(e.to_string()))??;

        Ok(tags.first().map(|tag| {
            self.tag_prefix
                .strip(tag)
                .unwrap_or(tag.as_str())
                .to_string()
        }))
    }

    async fn resolve(&mut self, release_type: &ReleaseType, context: &BumpContext) -> Result<()> {
        let current = self.latest_tagged_version().await?;
        debug!(
            prefix = %self.tag_prefix.prefix,
            current = current.as_deref().unwrap_or("<none>"),
            "read latest tagged version"
        );
        let next = compute_next_version(release_type, current.as_deref(), context).await?;
        self.target.resolved_version = Some(next);
        Ok(())
    }
}

#[async_trait]
impl VersioningStrategy for GitTagStrategy {
    fn name(&self) -> &'static str {
        "git"
    }

    fn target(&self) -> &StrategyTarget {
        &self.target
    }

    fn target_mut(&mut self) -> &mut StrategyTarget {
        &mut self.target
    }

    /// Only the version path is kept; tags have no file location.
    fn init(&mut self, _location: &Path, version_path: &str) {
        self.target.bind(None, version_path);
    }

    async fn read(&self) -> Result<String> {
        Ok(self.latest_tagged_version().await?.unwrap_or_default())
    }

    async fn update(&self, _new_content: &str) -> Result<()> {
        Ok(())
    }

    async fn bump(&mut self, release_type: &ReleaseType, context: &BumpContext) -> Result<()> {
        self.resolve(release_type, context).await
    }

    async fn get_version(
        &mut self,
        release_type: &ReleaseType,
        context: &BumpContext,
    ) -> Result<()> {
        self.resolve(release_type, context).await
    }
}
