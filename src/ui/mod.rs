//! User interface module - status formatting and CI outputs.
//!
//! Separates concerns:
//! - `formatter` - Human-readable status lines
//! - This module - Machine-readable step outputs

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

pub mod formatter;

pub use formatter::{
    display_error, display_manual_push_instruction, display_release_plan, display_status,
    display_success,
};

/// Environment variable naming the GitHub Actions step-output file
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Named values published by a run, in publication order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outputs {
    entries: Vec<(String, String)>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Render in the step-output file format. Multi-line values use the
    /// `name<<DELIMITER` heredoc form.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.entries {
            if value.contains('\n') {
                let delimiter = heredoc_delimiter(value);
                out.push_str(&format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter));
            } else {
                out.push_str(&format!("{}={}\n", name, value));
            }
        }
        out
    }
}

fn heredoc_delimiter(value: &str) -> String {
    let mut delimiter = "EOF".to_string();
    while value.lines().any(|line| line == delimiter) {
        delimiter.push('_');
    }
    delimiter
}

/// Print outputs to stdout and, when running under GitHub Actions, append
/// them to the step-output file.
pub fn display_outputs(outputs: &Outputs) -> Result<()> {
    let rendered = outputs.render();
    print!("{}", rendered);

    if let Some(path) = std::env::var_os(GITHUB_OUTPUT_ENV) {
        append_outputs(Path::new(&path), &rendered)?;
    }
    Ok(())
}

fn append_outputs(path: &Path, rendered: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(rendered.as_bytes())?;
    Ok(())
}
