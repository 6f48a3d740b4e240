use serde::Serialize;
use serde_json::{Map, Value};

use super::{ManifestFormat, Segment, VersionPath};
use crate::error::{ReleaseError, Result};

const DEFAULT_INDENT: &str = "  ";

/// JSON manifests such as `package.json` or `composer.json`.
///
/// The document is re-serialized after an update. Key order, the detected
/// indentation, single-line layout and the trailing newline are kept.
pub struct JsonFormat;

impl ManifestFormat for JsonFormat {
    const NAME: &'static str = "json";

    fn read_version(content: &str, path: &VersionPath) -> Result<Option<String>> {
        let document: Value = serde_json::from_str(content)?;

        let mut node = &document;
        for segment in path.segments() {
            let child = match node {
                Value::Object(map) => map.get(&key_of(segment)),
                Value::Array(items) => segment.as_index().and_then(|i| items.get(i)),
                _ => None,
            };
            match child {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }

        match node {
            Value::String(version) if version.trim().is_empty() => Ok(None),
            Value::String(version) => Ok(Some(version.clone())),
            Value::Null => Ok(None),
            other => Err(not_a_string(path, other)),
        }
    }

    fn write_version(content: &str, path: &VersionPath, version: &str) -> Result<String> {
        let mut document: Value = serde_json::from_str(content)?;
        let (last, parents) = path.split_last()?;

        let mut node = &mut document;
        for segment in parents {
            node = child_or_insert(node, segment, path)?;
        }

        match node {
            Value::Object(map) => {
                let key = key_of(last);
                if let Some(existing) = map.get(&key) {
                    if !matches!(existing, Value::String(_) | Value::Null) {
                        return Err(not_a_string(path, existing));
                    }
                }
                map.insert(key, Value::String(version.to_string()));
            }
            Value::Array(items) => {
                let slot = last
                    .as_index()
                    .and_then(|i| items.get_mut(i))
                    .ok_or_else(|| missing_index(path))?;
                if !matches!(slot, Value::String(_) | Value::Null) {
                    return Err(not_a_string(path, slot));
                }
                *slot = Value::String(version.to_string());
            }
            _ => return Err(not_a_container(path)),
        }

        render(&document, content)
    }
}

fn key_of(segment: &Segment) -> String {
    match segment {
        Segment::Key(key) => key.clone(),
        Segment::Index(i) => i.to_string(),
    }
}

fn child_or_insert<'a>(
    node: &'a mut Value,
    segment: &Segment,
    path: &VersionPath,
) -> Result<&'a mut Value> {
    match node {
        Value::Object(map) => Ok(map
            .entry(key_of(segment))
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => segment
            .as_index()
            .and_then(move |i| items.get_mut(i))
            .ok_or_else(|| missing_index(path)),
        _ => Err(not_a_container(path)),
    }
}

fn render(document: &Value, original: &str) -> Result<String> {
    let mut rendered = if original.trim().contains('\n') {
        let indent = detect_indent(original).unwrap_or(DEFAULT_INDENT);
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        document.serialize(&mut serializer)?;
        String::from_utf8(buffer)
            .map_err(|e| ReleaseError::manifest(format!("Rendered JSON is not UTF-8: {}", e)))?
    } else {
        serde_json::to_string(document)?
    };

    if original.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Leading whitespace of the first indented line
fn detect_indent(content: &str) -> Option<&str> {
    content.lines().find_map(|line| {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];
        (!indent.is_empty() && !trimmed.is_empty()).then_some(indent)
    })
}

fn not_a_string(path: &VersionPath, value: &Value) -> ReleaseError {
    ReleaseError::manifest(format!(
        "Value at '{}' is not a string: {}",
        path, value
    ))
}

fn not_a_container(path: &VersionPath) -> ReleaseError {
    ReleaseError::manifest(format!(
        "Cannot follow '{}': an intermediate value is not an object or array",
        path
    ))
}

fn missing_index(path: &VersionPath) -> ReleaseError {
    ReleaseError::manifest(format!("Array index in '{}' is out of bounds", path))
}
