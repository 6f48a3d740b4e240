use crate::error::{ReleaseError, Result};
use crate::hooks::HookContext;
use std::path::Path;
use tokio::process::Command;

/// Executes git-release hook scripts
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook script with the given context
    ///
    /// The script receives the hook name as its only argument and the context
    /// as environment variables. Exit code 0 means success; trimmed stdout, when
    /// non-empty, is the replacement value. Any non-zero exit code is a failure.
    ///
    /// # Arguments
    /// * `script_path` - Path to the hook script (must be executable)
    /// * `context` - Hook context with environment variables
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the hook printed a replacement
    /// * `Ok(None)` if the hook succeeded silently
    /// * `Err` if script not found, not executable, or returns non-zero exit code
    pub async fn execute(script_path: &Path, context: &HookContext) -> Result<Option<String>> {
        if !script_path.is_file() {
            return Err(ReleaseError::hook(format!(
                "Hook path is not a file: {}",
                script_path.display()
            )));
        }

        let output = Command::new(script_path)
            .arg(context.hook_type.name())
            .envs(context.to_env_vars())
            .output()
            .await
            .map_err(|e| {
                ReleaseError::hook(format!(
                    "Failed to execute hook {}: {}",
                    script_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::hook(format!(
                "Hook {} ({}) failed with exit code {}\nStderr: {}",
                script_path.display(),
                context.hook_type.name(),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let value = stdout.trim();
        if value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(value.to_string()))
        }
    }
}
