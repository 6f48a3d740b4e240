//! Next-version computation.
//!
//! [`next_version`] is the pure arithmetic; [`compute_next_version`] adds the
//! `pre-version-generation` override on top of it. Both take the fallback
//! version and hooks as explicit arguments.

use std::sync::Arc;

use tracing::info;

use crate::domain::{ReleaseType, Version};
use crate::error::Result;
use crate::hooks::{apply_override, NoHooks, OverrideHooks};

/// Default fallback when none is configured
pub const DEFAULT_FALLBACK_VERSION: &str = "0.1.0";

/// Inputs shared by every strategy of one run
#[derive(Clone)]
pub struct BumpContext {
    pub fallback_version: String,
    pub hooks: Arc<dyn OverrideHooks>,
}

impl BumpContext {
    pub fn new(fallback_version: impl Into<String>, hooks: Arc<dyn OverrideHooks>) -> Self {
        BumpContext {
            fallback_version: fallback_version.into(),
            hooks,
        }
    }
}

impl Default for BumpContext {
    fn default() -> Self {
        BumpContext::new(DEFAULT_FALLBACK_VERSION, Arc::new(NoHooks))
    }
}

impl std::fmt::Debug for BumpContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BumpContext")
            .field("fallback_version", &self.fallback_version)
            .finish_non_exhaustive()
    }
}

/// Compute the next version from the current one.
///
/// - with a current version, bump it according to `release_type`
/// - without one, take `fallback_version` verbatim if it is valid semver
/// - otherwise start at `0.1.0`
///
/// A current version that is not `X.Y.Z` (or valid semver) is rejected with
/// [`crate::ReleaseError::InvalidVersionFormat`].
pub fn next_version(
    release_type: &ReleaseType,
    current_version: Option<&str>,
    fallback_version: &str,
) -> Result<Version> {
    match current_version {
        Some(current) => Version::parse(current)?.bump(release_type),
        None => {
            let version = Version::from_semver(fallback_version).unwrap_or(Version::INITIAL);
            info!(
                %version,
                "the version could not be detected, using fallback version"
            );
            Ok(version)
        }
    }
}

/// Compute the next version string and let the `pre-version-generation`
/// hook replace it.
pub async fn compute_next_version(
    release_type: &ReleaseType,
    current_version: Option<&str>,
    context: &BumpContext,
) -> Result<String> {
    let version = next_version(release_type, current_version, &context.fallback_version)?;
    let composed = version.to_string();
    let replacement = context.hooks.pre_version_generation(&composed).await?;
    Ok(apply_override(composed, replacement))
}
