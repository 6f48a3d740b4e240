use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::bump::DEFAULT_FALLBACK_VERSION;
use crate::error::{ReleaseError, Result};

/// Value of `output_file` that disables writing the changelog
pub const OUTPUT_FILE_DISABLED: &str = "false";

/// Represents the complete configuration for git-release.
///
/// Every field has a default, so an empty file (or no file at all) yields a
/// working configuration for a `package.json` project tagged `v{version}`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Release commit message; `{version}` is replaced with the tag
    #[serde(default = "default_git_message")]
    pub git_message: String,

    #[serde(default = "default_git_user_name")]
    pub git_user_name: String,

    #[serde(default = "default_git_user_email")]
    pub git_user_email: String,

    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// Changelog file; `"false"` disables writing it
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Comma-separated list of version-bearing files
    #[serde(default = "default_version_file")]
    pub version_file: String,

    #[serde(default = "default_version_path")]
    pub version_path: String,

    #[serde(default = "default_fallback_version")]
    pub fallback_version: String,

    /// Only commits touching this path count for the release
    #[serde(default = "default_commit_path")]
    pub commit_path: String,

    #[serde(default)]
    pub skip_version_file: bool,

    #[serde(default)]
    pub skip_commit: bool,

    #[serde(default)]
    pub skip_on_empty: bool,

    #[serde(default)]
    pub skip_push: bool,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Script serving the pre-version and pre-tag generation hooks
    #[serde(default)]
    pub pre_changelog_generation: Option<String>,

    /// Script run before the release commit
    #[serde(default)]
    pub pre_commit: Option<String>,

    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,
}

fn default_git_message() -> String {
    "chore(release): {version}".to_string()
}

fn default_git_user_name() -> String {
    "github-actions[bot]".to_string()
}

fn default_git_user_email() -> String {
    "41898282+github-actions[bot]@users.noreply.github.com".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_output_file() -> String {
    "CHANGELOG.md".to_string()
}

fn default_version_file() -> String {
    "./package.json".to_string()
}

fn default_version_path() -> String {
    "version".to_string()
}

fn default_fallback_version() -> String {
    DEFAULT_FALLBACK_VERSION.to_string()
}

fn default_commit_path() -> String {
    "./".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            git_message: default_git_message(),
            git_user_name: default_git_user_name(),
            git_user_email: default_git_user_email(),
            tag_prefix: default_tag_prefix(),
            output_file: default_output_file(),
            version_file: default_version_file(),
            version_path: default_version_path(),
            fallback_version: default_fallback_version(),
            commit_path: default_commit_path(),
            skip_version_file: false,
            skip_commit: false,
            skip_on_empty: false,
            skip_push: false,
            remote: default_remote(),
            pre_changelog_generation: None,
            pre_commit: None,
            conventional_commits: ConventionalCommitsConfig::default(),
            changelog: ChangelogConfig::default(),
        }
    }
}

impl ReleaseConfig {
    /// Version files in the order given, blanks dropped
    pub fn version_files(&self) -> Vec<String> {
        self.version_file
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether the version comes from tags instead of version files
    pub fn uses_tag_version(&self) -> bool {
        self.skip_version_file || self.skip_commit
    }

    /// Changelog destination, `None` when disabled
    pub fn changelog_file(&self) -> Option<&str> {
        let file = self.output_file.trim();
        (file != OUTPUT_FILE_DISABLED && !file.is_empty()).then_some(file)
    }

    /// Commit path filter, `None` when the whole repository counts
    pub fn commit_path_filter(&self) -> Option<&str> {
        match self.commit_path.trim() {
            "" | "." | "./" => None,
            path => Some(path),
        }
    }

    /// Release commit message for `tag`
    pub fn commit_message(&self, tag: &str) -> String {
        self.git_message.replace("{version}", tag)
    }
}

/// Returns the default list of commit types that count as features.
fn default_feature_types() -> Vec<String> {
    vec!["feat".to_string(), "feature".to_string()]
}

/// Configuration for conventional commit analysis.
///
/// Breaking changes (`!` or a `BREAKING CHANGE:` footer) always mean a major
/// release; commits whose type is listed in `feature_types` mean minor.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_feature_types")]
    pub feature_types: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            feature_types: default_feature_types(),
        }
    }
}

/// One changelog section: commits of `commit_type` listed under `title`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChangelogSection {
    #[serde(rename = "type")]
    pub commit_type: String,
    pub title: String,
}

impl ChangelogSection {
    pub fn new(commit_type: &str, title: &str) -> Self {
        ChangelogSection {
            commit_type: commit_type.to_string(),
            title: title.to_string(),
        }
    }
}

fn default_sections() -> Vec<ChangelogSection> {
    vec![
        ChangelogSection::new("feat", "Features"),
        ChangelogSection::new("fix", "Bug Fixes"),
        ChangelogSection::new("refactor", "Refactors"),
    ]
}

/// Changelog rendering options
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_sections")]
    pub sections: Vec<ChangelogSection>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            sections: default_sections(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `.release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// An explicit path that cannot be read is an error; so is any file that
/// exists but does not parse.
pub fn load_config(config_path: Option<&str>) -> Result<ReleaseConfig> {
    if let Some(path) = config_path {
        return load_from(Path::new(path));
    }

    let local = Path::new("./release.toml");
    if local.exists() {
        return load_from(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join(".release.toml");
        if global.exists() {
            return load_from(&global);
        }
    }

    Ok(ReleaseConfig::default())
}

fn load_from(path: &Path) -> Result<ReleaseConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&content)
        .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> std::result::Result<ReleaseConfig, toml::de::Error> {
    toml::from_str(content)
}
