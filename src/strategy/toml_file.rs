use toml_edit::{Array, ArrayOfTables, DocumentMut, Item, TableLike, Value};

use super::{ManifestFormat, Segment, VersionPath};
use crate::error::{ReleaseError, Result};

/// TOML manifests such as `Cargo.toml` or `pyproject.toml`.
///
/// Edits go through `toml_edit`, so comments, ordering and whitespace
/// survive. Index segments address arrays of tables (`[[packages]]`) and
/// inline arrays.
pub struct TomlFormat;

/// Read-only position inside a document
enum Node<'a> {
    Table(&'a dyn TableLike),
    Tables(&'a ArrayOfTables),
    Array(&'a Array),
    Leaf(&'a Value),
}

/// Writable position inside a document
enum NodeMut<'a> {
    Table(&'a mut dyn TableLike),
    Tables(&'a mut ArrayOfTables),
    Array(&'a mut Array),
    Leaf,
}

impl<'a> Node<'a> {
    fn from_item(item: &'a Item) -> Option<Self> {
        match item {
            Item::None => None,
            Item::Table(table) => Some(Node::Table(table)),
            Item::ArrayOfTables(tables) => Some(Node::Tables(tables)),
            Item::Value(value) => Some(Node::from_value(value)),
        }
    }

    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::InlineTable(table) => Node::Table(table),
            Value::Array(array) => Node::Array(array),
            leaf => Node::Leaf(leaf),
        }
    }

    fn child(self, segment: &Segment) -> Option<Self> {
        match self {
            Node::Table(table) => table.get(&table_key(segment)).and_then(Node::from_item),
            Node::Tables(tables) => segment
                .as_index()
                .and_then(|i| tables.get(i))
                .map(|table| Node::Table(table)),
            Node::Array(array) => segment
                .as_index()
                .and_then(|i| array.get(i))
                .map(Node::from_value),
            Node::Leaf(_) => None,
        }
    }
}

impl<'a> NodeMut<'a> {
    fn from_item(item: &'a mut Item) -> Option<Self> {
        match item {
            Item::None => None,
            Item::Table(table) => Some(NodeMut::Table(table)),
            Item::ArrayOfTables(tables) => Some(NodeMut::Tables(tables)),
            Item::Value(value) => Some(NodeMut::from_value(value)),
        }
    }

    fn from_value(value: &'a mut Value) -> Self {
        match value {
            Value::InlineTable(table) => NodeMut::Table(table),
            Value::Array(array) => NodeMut::Array(array),
            _ => NodeMut::Leaf,
        }
    }

    /// Step into `segment`, creating a missing table on the way
    fn child_or_insert(self, segment: &Segment, path: &VersionPath) -> Result<Self> {
        match self {
            NodeMut::Table(table) => {
                let key = table_key(segment);
                if !table.contains_key(&key) {
                    table.insert(&key, toml_edit::table());
                }
                table
                    .get_mut(&key)
                    .and_then(NodeMut::from_item)
                    .ok_or_else(|| not_a_container(path))
            }
            NodeMut::Tables(tables) => segment
                .as_index()
                .and_then(|i| tables.get_mut(i))
                .map(|table| NodeMut::Table(table))
                .ok_or_else(|| missing_index(path)),
            NodeMut::Array(array) => segment
                .as_index()
                .and_then(|i| array.get_mut(i))
                .map(NodeMut::from_value)
                .ok_or_else(|| missing_index(path)),
            NodeMut::Leaf => Err(not_a_container(path)),
        }
    }
}

impl ManifestFormat for TomlFormat {
    const NAME: &'static str = "toml";

    fn read_version(content: &str, path: &VersionPath) -> Result<Option<String>> {
        let document = parse(content)?;

        let mut node = Node::Table(document.as_table());
        for segment in path.segments() {
            match node.child(segment) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }

        match node {
            Node::Leaf(value) => value
                .as_str()
                .map(|version| {
                    let version = version.trim();
                    (!version.is_empty()).then(|| version.to_string())
                })
                .ok_or_else(|| not_a_string(path)),
            _ => Err(not_a_string(path)),
        }
    }

    fn write_version(content: &str, path: &VersionPath, version: &str) -> Result<String> {
        let mut document = parse(content)?;
        let (last, parents) = path.split_last()?;

        let mut node = NodeMut::Table(document.as_table_mut());
        for segment in parents {
            node = node.child_or_insert(segment, path)?;
        }

        match node {
            NodeMut::Table(table) => {
                let key = table_key(last);
                match table.get_mut(&key) {
                    Some(Item::Value(value)) => replace_string(value, version, path)?,
                    Some(item) if item.is_none() => *item = toml_edit::value(version),
                    Some(_) => return Err(not_a_string(path)),
                    None => {
                        table.insert(&key, toml_edit::value(version));
                    }
                }
            }
            NodeMut::Array(array) => {
                let value = last
                    .as_index()
                    .and_then(|i| array.get_mut(i))
                    .ok_or_else(|| missing_index(path))?;
                replace_string(value, version, path)?;
            }
            NodeMut::Tables(_) | NodeMut::Leaf => return Err(not_a_string(path)),
        }

        Ok(document.to_string())
    }
}

/// Overwrite a string value, keeping its surrounding whitespace and comments
fn replace_string(value: &mut Value, version: &str, path: &VersionPath) -> Result<()> {
    if !value.is_str() {
        return Err(not_a_string(path));
    }
    let decor = value.decor().clone();
    *value = Value::from(version);
    *value.decor_mut() = decor;
    Ok(())
}

fn parse(content: &str) -> Result<DocumentMut> {
    content
        .parse::<DocumentMut>()
        .map_err(|e| ReleaseError::manifest(format!("Invalid TOML: {}", e)))
}

fn table_key(segment: &Segment) -> String {
    match segment {
        Segment::Key(key) => key.clone(),
        Segment::Index(i) => i.to_string(),
    }
}

fn not_a_string(path: &VersionPath) -> ReleaseError {
    ReleaseError::manifest(format!("Value at '{}' is not a string", path))
}

fn not_a_container(path: &VersionPath) -> ReleaseError {
    ReleaseError::manifest(format!(
        "Cannot follow '{}': an intermediate value is not a table or array",
        path
    ))
}

fn missing_index(path: &VersionPath) -> ReleaseError {
    ReleaseError::manifest(format!("Array index in '{}' is out of bounds", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARGO: &str = r#"# workspace root
[package]
name = "app"   # the name
version = "0.3.1" # bumped by CI
edition = "2021"

[dependencies]
serde = "1"
"#;

    fn path(raw: &str) -> VersionPath {
        VersionPath::parse(raw).unwrap()
    }

    #[test]
    fn test_read_nested_version() {
        assert_eq!(
            TomlFormat::read_version(CARGO, &path("package.version")).unwrap(),
            Some("0.3.1".to_string())
        );
    }

    #[test]
    fn test_read_missing_is_none() {
        assert_eq!(TomlFormat::read_version(CARGO, &path("version")).unwrap(), None);
        assert_eq!(
            TomlFormat::read_version(CARGO, &path("tool.poetry.version")).unwrap(),
            None
        );
    }

    #[test]
    fn test_read_inline_table() {
        let content = "package = { name = \"app\", version = \"1.0.0\" }\n";
        assert_eq!(
            TomlFormat::read_version(content, &path("package.version")).unwrap(),
            Some("1.0.0".to_string())
        );
    }

    #[test]
    fn test_read_non_string_is_error() {
        let content = "version = 3\n";
        assert!(TomlFormat::read_version(content, &path("version")).is_err());
    }

    #[test]
    fn test_write_preserves_comments_and_layout() {
        let updated = TomlFormat::write_version(CARGO, &path("package.version"), "0.4.0").unwrap();
        assert_eq!(updated, CARGO.replace("\"0.3.1\"", "\"0.4.0\""));
    }

    #[test]
    fn test_write_creates_missing_table() {
        let content = "name = \"app\"\n";
        let updated =
            TomlFormat::write_version(content, &path("tool.release.version"), "0.1.0").unwrap();
        assert_eq!(
            TomlFormat::read_version(&updated, &path("tool.release.version")).unwrap(),
            Some("0.1.0".to_string())
        );
        assert!(updated.starts_with("name = \"app\"\n"));
    }

    #[test]
    fn test_array_of_tables_by_index() {
        let content = "[[packages]]\nname = \"a\"\nversion = \"1.0.0\"\n\n[[packages]]\nname = \"b\"\nversion = \"2.0.0\" # b\n";
        assert_eq!(
            TomlFormat::read_version(content, &path("packages[1].version")).unwrap(),
            Some("2.0.0".to_string())
        );
        assert_eq!(
            TomlFormat::read_version(content, &path("packages.0.version")).unwrap(),
            Some("1.0.0".to_string())
        );

        let updated =
            TomlFormat::write_version(content, &path("packages[1].version"), "2.1.0").unwrap();
        assert_eq!(updated, content.replace("\"2.0.0\"", "\"2.1.0\""));
    }

    #[test]
    fn test_inline_array_by_index() {
        let content = "versions = [\"0.1.0\", \"0.2.0\"]\n";
        assert_eq!(
            TomlFormat::read_version(content, &path("versions[1]")).unwrap(),
            Some("0.2.0".to_string())
        );
        let updated = TomlFormat::write_version(content, &path("versions[0]"), "0.1.1").unwrap();
        assert_eq!(updated, "versions = [\"0.1.1\", \"0.2.0\"]\n");
    }

    #[test]
    fn test_out_of_bounds_index() {
        let content = "[[packages]]\nversion = \"1.0.0\"\n";
        assert_eq!(
            TomlFormat::read_version(content, &path("packages[3].version")).unwrap(),
            None
        );
        assert!(TomlFormat::write_version(content, &path("packages[3].version"), "1.0.1").is_err());
    }

    #[test]
    fn test_read_blank_version_is_none() {
        let content = "[package]\nversion = \"\"\n";
        assert_eq!(
            TomlFormat::read_version(content, &path("package.version")).unwrap(),
            None
        );
    }

    #[test]
    fn test_write_over_non_string_is_error() {
        let content = "[package]\nversion = { major = 1 }\n";
        assert!(TomlFormat::write_version(content, &path("package.version"), "1.0.0").is_err());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(TomlFormat::read_version("[package", &path("version")).is_err());
    }
}
