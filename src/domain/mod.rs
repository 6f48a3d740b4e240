//! Domain logic - pure release rules independent of git and the filesystem

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::ParsedCommit;
pub use tag::TagPrefix;
pub use version::{ReleaseType, Version};
