//! Analysis engine for recommending a release type from commits

pub mod version_analyzer;

pub use version_analyzer::{Recommendation, VersionAnalyzer};
