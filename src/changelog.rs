//! Changelog rendering and the changelog file.

use std::io::ErrorKind;
use std::path::Path;

use crate::config::ChangelogSection;
use crate::domain::ParsedCommit;
use crate::error::Result;
use crate::git::CommitInfo;

const BREAKING_TITLE: &str = "⚠ BREAKING CHANGES";

/// Rendered release notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    /// Full section, starting with the `## {tag}` heading
    pub text: String,
    /// Section body without the heading lines, trimmed
    pub clean: String,
}

impl Changelog {
    pub fn new(text: String) -> Self {
        let clean = text
            .split('\n')
            .skip(3)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
        Changelog { text, clean }
    }

    pub fn is_empty(&self) -> bool {
        self.clean.is_empty()
    }
}

pub struct ChangelogGenerator {
    sections: Vec<ChangelogSection>,
}

impl ChangelogGenerator {
    pub fn new(sections: Vec<ChangelogSection>) -> Self {
        ChangelogGenerator { sections }
    }

    /// Whether [`render`](Self::render) would produce any entry for `commits`
    pub fn has_entries(&self, commits: &[CommitInfo]) -> bool {
        commits.iter().any(|c| {
            let parsed = ParsedCommit::parse(&c.message);
            parsed.is_breaking_change
                || self
                    .sections
                    .iter()
                    .any(|s| s.commit_type == parsed.r#type)
        })
    }

    /// Render the release section for `tag` from `commits` (oldest first)
    pub fn render(&self, tag: &str, commits: &[CommitInfo]) -> Changelog {
        let parsed: Vec<(ParsedCommit, &CommitInfo)> = commits
            .iter()
            .rev()
            .map(|c| (ParsedCommit::parse(&c.message), c))
            .collect();

        let mut text = format!("## {}\n\n\n", tag);

        let breaking: Vec<String> = parsed
            .iter()
            .filter(|(p, _)| p.is_breaking_change)
            .map(|(p, _)| {
                let note = p.breaking_note.as_deref().unwrap_or(&p.description);
                entry(p.scope.as_deref(), note)
            })
            .collect();
        push_section(&mut text, BREAKING_TITLE, &breaking);

        for section in &self.sections {
            let entries: Vec<String> = parsed
                .iter()
                .filter(|(p, _)| p.r#type == section.commit_type)
                .map(|(p, c)| {
                    format!(
                        "{} ({})",
                        entry(p.scope.as_deref(), &p.description),
                        c.short_hash()
                    )
                })
                .collect();
            push_section(&mut text, &section.title, &entries);
        }

        Changelog::new(text)
    }
}

fn entry(scope: Option<&str>, text: &str) -> String {
    match scope {
        Some(scope) => format!("* **{}:** {}", scope, text),
        None => format!("* {}", text),
    }
}

fn push_section(text: &mut String, title: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    text.push_str(&format!("### {}\n\n", title));
    for entry in entries {
        text.push_str(entry);
        text.push('\n');
    }
    text.push('\n');
}

/// Insert `section` at the top of an existing changelog, below its `# `
/// title line if it has one
pub fn prepend_section(existing: &str, section: &str) -> String {
    let (title, body) = if existing.starts_with("# ") {
        existing.split_once('\n').unwrap_or((existing, ""))
    } else {
        ("", existing)
    };

    let mut out = String::new();
    if !title.is_empty() {
        out.push_str(title.trim_end());
        out.push_str("\n\n");
    }
    out.push_str(section.trim_end());
    out.push('\n');

    let body = body.trim_start();
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Prepend `section` to the changelog file at `path`, creating it if needed
pub async fn write_changelog(path: &Path, section: &str) -> Result<()> {
    let existing = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    tokio::fs::write(path, prepend_section(&existing, section)).await?;
    Ok(())
}
