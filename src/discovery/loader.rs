//! Compose document discovery and parsing

use super::DiscoveryError;
use ignore::WalkBuilder;
use serde_yaml::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extensions treated as compose documents
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

pub fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// All documents under `root`, at any depth, as sorted canonical paths.
///
/// Hidden directories and ignore files are not honoured: anything with a
/// document extension is picked up.
pub fn find_documents(root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::RootNotADirectory(root.to_path_buf()));
    }

    let mut documents = BTreeSet::new();

    for result in WalkBuilder::new(root).standard_filters(false).build() {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();

        if !path.is_file() || !is_document(path) {
            continue;
        }

        documents.insert(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
    }

    debug!(
        root = %root.display(),
        documents = documents.len(),
        "Document scan completed"
    );

    Ok(documents.into_iter().collect())
}

/// Parses a document. Unreadable or invalid YAML is logged and yields `None`.
pub fn load_document(path: &Path) -> Option<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read document");
            return None;
        }
    };

    match serde_yaml::from_str::<Value>(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "YAML parse failed");
            None
        }
    }
}
