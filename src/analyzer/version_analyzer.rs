use crate::config::ConventionalCommitsConfig;
use crate::domain::{ParsedCommit, ReleaseType};

/// Release type suggested by the commit log, with the counts behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub release_type: ReleaseType,
    pub reason: String,
    pub breaking_changes: usize,
    pub features: usize,
}

/// Analyzes commits to determine the release type
pub struct VersionAnalyzer {
    config: ConventionalCommitsConfig,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(config: ConventionalCommitsConfig) -> Self {
        VersionAnalyzer { config }
    }

    /// Breaking change → major, any feature → minor, otherwise patch
    pub fn recommend(&self, messages: &[String]) -> Recommendation {
        let mut breaking_changes = 0;
        let mut features = 0;

        for message in messages {
            let parsed = ParsedCommit::parse(message);

            if parsed.is_breaking_change {
                breaking_changes += 1;
            }
            if self.config.feature_types.contains(&parsed.r#type) {
                features += 1;
            }
        }

        let release_type = if breaking_changes > 0 {
            ReleaseType::Major
        } else if features > 0 {
            ReleaseType::Minor
        } else {
            ReleaseType::Patch
        };

        let reason = if breaking_changes == 1 {
            format!("There is 1 BREAKING CHANGE and {} features", features)
        } else {
            format!(
                "There are {} BREAKING CHANGES and {} features",
                breaking_changes, features
            )
        };

        Recommendation {
            release_type,
            reason,
            breaking_changes,
            features,
        }
    }
}
