//! Command-line surface and the release workflow it drives

pub mod args;
pub mod orchestration;

pub use args::{Cli, Command, ReleaseArgs};
pub use orchestration::{
    skipped_outputs, ReleaseWorkflow, ResolvedVersion, VersionMode, WorkflowOptions,
    WorkflowResult,
};
