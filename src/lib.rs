pub mod analyzer;
pub mod bump;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod logging;
pub mod strategy;
pub mod ui;

pub use error::{ReleaseError, Result};
