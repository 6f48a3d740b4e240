use regex::Regex;

const BREAKING_FOOTERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
    /// Text of the `BREAKING CHANGE:` footer, if the commit carries one
    pub breaking_note: Option<String>,
}

impl ParsedCommit {
    /// Parse a commit message in Conventional Commits form
    ///
    /// Only the first line is matched against `type(scope)!: description`;
    /// the body is scanned for breaking change footers. Non-conventional
    /// messages are treated as `chore`.
    pub fn parse(message: &str) -> Self {
        let header = message.lines().next().unwrap_or_default().trim();
        let breaking_note = find_breaking_note(message);

        if let Some(captures) = Regex::new(r"^([a-zA-Z]+)(?:\(([^)]+)\))?(!)?:\s*(.*)$")
            .ok()
            .and_then(|re| re.captures(header))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_default();
            let scope = captures.get(2).map(|m| m.as_str().to_string());
            let has_exclamation = captures.get(3).is_some();
            let description = captures
                .get(4)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            return ParsedCommit {
                r#type,
                scope,
                description,
                is_breaking_change: has_exclamation || breaking_note.is_some(),
                breaking_note,
            };
        }

        ParsedCommit {
            r#type: "chore".to_string(),
            scope: None,
            description: header.to_string(),
            is_breaking_change: breaking_note.is_some(),
            breaking_note,
        }
    }
}

fn find_breaking_note(message: &str) -> Option<String> {
    message.lines().skip(1).find_map(|line| {
        BREAKING_FOOTERS
            .iter()
            .find_map(|footer| line.trim_start().strip_prefix(footer))
            .map(|note| note.trim().to_string())
    })
}
