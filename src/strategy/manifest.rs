use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{StrategyTarget, VersionPath, VersioningStrategy};
use crate::bump::{compute_next_version, BumpContext};
use crate::domain::ReleaseType;
use crate::error::Result;

/// Default location of the version inside a manifest
pub const DEFAULT_VERSION_PATH: &str = "version";

/// Textual manifest format: how to find and replace a version string.
pub trait ManifestFormat: Send + Sync + 'static {
    const NAME: &'static str;

    /// Version string stored at `path`, `None` if the path does not exist.
    ///
    /// A value that exists but is not a string is an error.
    fn read_version(content: &str, path: &VersionPath) -> Result<Option<String>>;

    /// `content` with the value at `path` set to `version`. Intermediate
    /// objects are created as needed; everything else is kept.
    fn write_version(content: &str, path: &VersionPath, version: &str) -> Result<String>;
}

/// Strategy over a manifest file in format `F`
pub struct ManifestStrategy<F> {
    target: StrategyTarget,
    _format: PhantomData<fn() -> F>,
}

impl<F: ManifestFormat> ManifestStrategy<F> {
    pub fn new() -> Self {
        ManifestStrategy {
            target: StrategyTarget::default(),
            _format: PhantomData,
        }
    }

    async fn resolve(
        &mut self,
        release_type: &ReleaseType,
        context: &BumpContext,
        persist: bool,
    ) -> Result<()> {
        let path = VersionPath::parse(self.version_path().unwrap_or(DEFAULT_VERSION_PATH))?;
        let content = self.read().await?;
        let has_content = !content.trim().is_empty();

        let current = if has_content {
            F::read_version(&content, &path)?
        } else {
            None
        };
        debug!(
            format = F::NAME,
            current = current.as_deref().unwrap_or("<none>"),
            "read current version"
        );

        let next = compute_next_version(release_type, current.as_deref(), context).await?;

        if persist {
            if has_content {
                let updated = F::write_version(&content, &path, &next)?;
                self.update(&updated).await?;
            } else if let Some(location) = self.location() {
                warn!(
                    file = %location.display(),
                    "version file is empty or missing, not writing {}", next
                );
            }
        }

        self.target.resolved_version = Some(next);
        Ok(())
    }
}

impl<F: ManifestFormat> Default for ManifestStrategy<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<F: ManifestFormat> VersioningStrategy for ManifestStrategy<F> {
    fn name(&self) -> &'static str {
        F::NAME
    }

    fn target(&self) -> &StrategyTarget {
        &self.target
    }

    fn target_mut(&mut self) -> &mut StrategyTarget {
        &mut self.target
    }

    async fn bump(&mut self, release_type: &ReleaseType, context: &BumpContext) -> Result<()> {
        self.resolve(release_type, context, true).await
    }

    async fn get_version(
        &mut self,
        release_type: &ReleaseType,
        context: &BumpContext,
    ) -> Result<()> {
        self.resolve(release_type, context, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{JsonFormat, TomlFormat};
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_bump_rewrites_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("package.json");
        fs::write(&file, "{\n  \"name\": \"app\",\n  \"version\": \"1.2.3\"\n}\n").unwrap();

        let mut strategy = ManifestStrategy::<JsonFormat>::new();
        strategy.init(&file, "version");
        strategy
            .bump(&ReleaseType::Minor, &BumpContext::default())
            .await
            .unwrap();

        assert_eq!(strategy.resolved_version(), Some("1.3.0"));
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "{\n  \"name\": \"app\",\n  \"version\": \"1.3.0\"\n}\n"
        );
    }

    #[tokio::test]
    async fn test_get_version_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("package.json");
        let original = "{\"version\":\"2.0.0\"}";
        fs::write(&file, original).unwrap();

        let mut strategy = ManifestStrategy::<JsonFormat>::new();
        strategy.init(&file, "version");
        strategy
            .get_version(&ReleaseType::Major, &BumpContext::default())
            .await
            .unwrap();

        assert_eq!(strategy.resolved_version(), Some("3.0.0"));
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
    }

    #[tokio::test]
    async fn test_missing_file_uses_fallback_and_is_not_created() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("missing.json");

        let mut strategy = ManifestStrategy::<JsonFormat>::new();
        strategy.init(&file, "version");
        let context = BumpContext::new("4.5.6", std::sync::Arc::new(crate::hooks::NoHooks));
        strategy.bump(&ReleaseType::Patch, &context).await.unwrap();

        assert_eq!(strategy.resolved_version(), Some("4.5.6"));
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_missing_key_uses_fallback_and_inserts_it() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("package.json");
        fs::write(&file, "{\"name\":\"app\"}").unwrap();

        let mut strategy = ManifestStrategy::<JsonFormat>::new();
        strategy.init(&file, "version");
        strategy
            .bump(&ReleaseType::Major, &BumpContext::default())
            .await
            .unwrap();

        assert_eq!(strategy.resolved_version(), Some("0.1.0"));
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "{\"name\":\"app\",\"version\":\"0.1.0\"}"
        );
    }

    #[tokio::test]
    async fn test_empty_version_uses_fallback_and_writes_it() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("package.json");
        fs::write(&file, "{\"name\":\"app\",\"version\":\"\"}").unwrap();

        let mut strategy = ManifestStrategy::<JsonFormat>::new();
        strategy.init(&file, "version");
        strategy
            .bump(&ReleaseType::Patch, &BumpContext::default())
            .await
            .unwrap();

        assert_eq!(strategy.resolved_version(), Some("0.1.0"));
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "{\"name\":\"app\",\"version\":\"0.1.0\"}"
        );
    }

    #[tokio::test]
    async fn test_empty_toml_version_uses_fallback() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Cargo.toml");
        fs::write(&file, "[package]\nname = \"app\"\nversion = \"\"\n").unwrap();

        let mut strategy = ManifestStrategy::<TomlFormat>::new();
        strategy.init(&file, "package.version");
        let context = BumpContext::new("1.0.0", std::sync::Arc::new(crate::hooks::NoHooks));
        strategy.bump(&ReleaseType::Minor, &context).await.unwrap();

        assert_eq!(strategy.resolved_version(), Some("1.0.0"));
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "[package]\nname = \"app\"\nversion = \"1.0.0\"\n"
        );
    }

    #[tokio::test]
    async fn test_malformed_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("package.json");
        fs::write(&file, "{\"version\":\"1.2\"}").unwrap();

        let mut strategy = ManifestStrategy::<JsonFormat>::new();
        strategy.init(&file, "version");
        let err = strategy
            .bump(&ReleaseType::Patch, &BumpContext::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::ReleaseError::InvalidVersionFormat { .. }
        ));
        assert!(strategy.resolved_version().is_none());
    }
}
