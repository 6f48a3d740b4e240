use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use super::{GitTagStrategy, JsonFormat, ManifestStrategy, TomlFormat, VersioningStrategy};
use crate::git::Repository;

/// Everything a strategy may need besides its target
#[derive(Clone)]
pub struct StrategyDeps {
    pub repository: Arc<dyn Repository>,
    pub tag_prefix: String,
}

impl StrategyDeps {
    pub fn new(repository: Arc<dyn Repository>, tag_prefix: impl Into<String>) -> Self {
        StrategyDeps {
            repository,
            tag_prefix: tag_prefix.into(),
        }
    }
}

/// Dispatch token of a file: its extension, or the whole name when it has
/// none (so `git` selects the tag strategy).
pub fn extension_of(file: &str) -> &str {
    Path::new(file)
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or(file)
}

/// Fresh strategy for a dispatch token, `None` when unsupported
pub fn resolve_strategy(token: &str, deps: &StrategyDeps) -> Option<Box<dyn VersioningStrategy>> {
    match token {
        "json" => Some(Box::new(ManifestStrategy::<JsonFormat>::new())),
        "toml" => Some(Box::new(ManifestStrategy::<TomlFormat>::new())),
        "git" => Some(Box::new(GitTagStrategy::new(
            Arc::clone(&deps.repository),
            &deps.tag_prefix,
        ))),
        _ => None,
    }
}
