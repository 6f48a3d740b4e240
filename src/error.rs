use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Invalid version format: '{version}' - expected X.Y.Z")]
    InvalidVersionFormat { version: String },

    #[error("File extension \"{extension}\" from file \"{file}\" is not supported")]
    UnsupportedTarget { file: String, extension: String },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Hook failed: {0}")]
    HookFailure(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Commits not found on this package.")]
    NoChanges,

    #[error("Version task failed: {0}")]
    Task(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create an invalid version format error for the offending string
    pub fn invalid_version(version: impl Into<String>) -> Self {
        ReleaseError::InvalidVersionFormat {
            version: version.into(),
        }
    }

    /// Create an unsupported target error naming the file and its extension
    pub fn unsupported_target(file: impl Into<String>, extension: impl Into<String>) -> Self {
        ReleaseError::UnsupportedTarget {
            file: file.into(),
            extension: extension.into(),
        }
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        ReleaseError::HookFailure(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }
}
