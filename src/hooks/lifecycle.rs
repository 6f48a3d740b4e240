use std::collections::HashMap;

/// Extension points a user script can fill during a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    /// May replace the computed version string
    PreVersionGeneration,
    /// May replace the computed tag name
    PreTagGeneration,
    /// Runs side effects before the release commit
    PreCommit,
}

impl HookType {
    /// Get the hook name as passed to the script
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PreVersionGeneration => "pre-version-generation",
            HookType::PreTagGeneration => "pre-tag-generation",
            HookType::PreCommit => "pre-commit",
        }
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Type of hook being executed
    pub hook_type: HookType,
    /// Version computed so far
    pub version: Option<String>,
    /// Tag computed so far
    pub tag: Option<String>,
}

impl HookContext {
    pub fn new(hook_type: HookType) -> Self {
        HookContext {
            hook_type,
            version: None,
            tag: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Convert context to environment variables for the hook script
    ///
    /// Maps context fields to RELEASE_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("RELEASE_HOOK".to_string(), self.hook_type.name().to_string());

        if let Some(ref version) = self.version {
            env.insert("RELEASE_VERSION".to_string(), version.clone());
        }

        if let Some(ref tag) = self.tag {
            env.insert("RELEASE_TAG".to_string(), tag.clone());
        }

        env
    }
}

/// Data handed to the pre-commit hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitContext {
    pub tag: String,
    pub version: String,
}
