//! Normalization of compose `labels` into a canonical annotation map
//!
//! Compose allows labels either as a list of `key=value` strings or as a plain
//! mapping. Both shapes are folded into [`Annotations`] once, here, so the rest
//! of discovery only ever sees one representation.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

/// Values accepted as "enabled" for boolean labels and environment flags
pub const TRUTHY_VALUES: [&str; 4] = ["true", "1", "yes", "on"];

/// Returns true when the trimmed, lowercased value is in [`TRUTHY_VALUES`]
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    TRUTHY_VALUES.contains(&value.as_str())
}

/// The shapes a service's `labels` field can take
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawLabels<'a> {
    /// No `labels` key, or an explicit null
    Absent,
    /// `- key=value` entries
    List(&'a [Value]),
    /// `key: value` entries
    Map(&'a Mapping),
    /// Anything else (a scalar, a tagged value); yields no annotations
    Unsupported,
}

impl<'a> RawLabels<'a> {
    pub fn from_value(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => RawLabels::Absent,
            Some(Value::Sequence(items)) => RawLabels::List(items),
            Some(Value::Mapping(map)) => RawLabels::Map(map),
            Some(_) => RawLabels::Unsupported,
        }
    }
}

/// Canonical label map of a single service
///
/// Keys are unique. Iteration follows first-insertion order, so "first match"
/// lookups over the labels follow the order they were written in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    entries: IndexMap<String, String>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes any label shape. Never fails; unusable entries are dropped.
    pub fn normalize(raw: RawLabels<'_>) -> Self {
        match raw {
            RawLabels::Absent | RawLabels::Unsupported => Self::new(),
            RawLabels::Map(map) => map
                .iter()
                .map(|(key, value)| (stringify(key), stringify(value)))
                .collect(),
            RawLabels::List(items) => items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|item| item.split_once('='))
                .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value of `key` when present and not blank, trimmed
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for Annotations {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut annotations = Annotations::new();
        for (key, value) in iter {
            annotations.insert(key, value);
        }
        annotations
    }
}

/// Renders a YAML node as the string a label consumer would see
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        Value::Tagged(tagged) => stringify(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
