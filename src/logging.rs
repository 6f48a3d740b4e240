//! Diagnostic logging setup.
//!
//! Engine code logs through `tracing` macros. The binary installs one
//! stderr subscriber so stdout stays reserved for status lines and outputs.

use std::io;

pub use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ReleaseError, Result};

/// Filter applied when `RUST_LOG` is not set
pub fn default_directive(level: Level) -> String {
    format!("git_release={}", level.as_str().to_ascii_lowercase())
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_tracing(level: Level) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(level)))
        .map_err(|e| ReleaseError::config(format!("Failed to create tracing filter: {e}")))?;

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()
        .map_err(|e| ReleaseError::config(format!("Failed to install tracing subscriber: {e}")))?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "tracing initialized");
    Ok(())
}
