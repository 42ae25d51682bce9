//! Resolution of a document's `include:` list

use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const INCLUDE_KEY: &str = "include";

/// Whether the document is a mapping that carries an `include` key at all
pub fn declares_includes(document: &Value) -> bool {
    document
        .as_mapping()
        .map(|map| map.contains_key(INCLUDE_KEY))
        .unwrap_or(false)
}

/// Existing files referenced by `include:`, resolved against the directory of
/// `source` and canonicalized.
///
/// Malformed lists and missing targets are logged and skipped; non-string
/// entries are ignored. The result may contain duplicates.
pub fn resolve_includes(document: &Value, source: &Path) -> Vec<PathBuf> {
    let Some(include) = document.as_mapping().and_then(|map| map.get(INCLUDE_KEY)) else {
        return Vec::new();
    };
    if is_falsy(include) {
        return Vec::new();
    }
    let Some(items) = include.as_sequence() else {
        warn!(path = %source.display(), "include is not a list; ignoring");
        return Vec::new();
    };

    let base = source.parent().unwrap_or_else(|| Path::new("."));

    items
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|item| {
            let candidate = base.join(item);
            match candidate.canonicalize() {
                Ok(resolved) if resolved.is_file() => Some(resolved),
                _ => {
                    warn!(path = %candidate.display(), source = %source.display(), "include target missing");
                    None
                }
            }
        })
        .collect()
}

/// YAML values that count as "not set" for `include`
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|n| n == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        Value::Tagged(tagged) => is_falsy(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn yaml(source: &str) -> Value {
        serde_yaml::from_str(source).unwrap()
    }

    #[test]
    fn test_resolves_relative_to_referring_document() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("meta")).unwrap();
        fs::create_dir_all(root.join("stacks/media")).unwrap();
        fs::write(root.join("stacks/media/compose.yml"), "services: {}\n").unwrap();

        let source = root.join("meta/compose.yml");
        let document = yaml("include:\n  - ../stacks/media/compose.yml\n");

        assert_eq!(
            resolve_includes(&document, &source),
            vec![root.join("stacks/media/compose.yml")]
        );
    }

    #[test]
    fn test_missing_targets_are_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::write(root.join("present.yml"), "services: {}\n").unwrap();
        fs::create_dir(root.join("a-directory.yml")).unwrap();

        let document = yaml(
            "include:\n  - missing.yml\n  - present.yml\n  - a-directory.yml\n  - 7\n  - present.yml\n",
        );

        assert_eq!(
            resolve_includes(&document, &root.join("compose.yml")),
            vec![root.join("present.yml"), root.join("present.yml")]
        );
    }

    #[test]
    fn test_absent_or_falsy_include() {
        let source = Path::new("/nowhere/compose.yml");

        assert!(resolve_includes(&yaml("services: {}"), source).is_empty());
        assert!(resolve_includes(&yaml("include:"), source).is_empty());
        assert!(resolve_includes(&yaml("include: []"), source).is_empty());
        assert!(resolve_includes(&yaml("include: false"), source).is_empty());
    }

    #[test]
    fn test_include_not_a_list_is_ignored() {
        let source = Path::new("/nowhere/compose.yml");

        assert!(resolve_includes(&yaml("include: other.yml"), source).is_empty());
        assert!(resolve_includes(&yaml("include:\n  path: other.yml"), source).is_empty());
    }

    #[test]
    fn test_non_mapping_document() {
        let source = Path::new("/nowhere/compose.yml");

        assert!(resolve_includes(&yaml("- include"), source).is_empty());
        assert!(!declares_includes(&yaml("- include")));
        assert!(declares_includes(&yaml("include: []")));
    }
}
