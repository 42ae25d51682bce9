//! Monitor target discovery from docker compose trees
//!
//! A discovery cycle walks the compose directory, follows `include:` lists,
//! and turns every service's labels into named monitor targets:
//!
//! - **Public targets** (`https://`) come from `homepage.href` or the hosts named
//!   in Traefik router rules
//! - **Backend targets** (`http://`) point at the container's load balancer
//!   port on the compose network
//!
//! Nothing is cached between cycles. Within a cycle each document is parsed at
//! most once.
//!
//! # Example
//!
//! ```no_run
//! use kumasync::discovery::{discover_targets, DiscoveryOptions};
//! use std::path::Path;
//!
//! let options = DiscoveryOptions::new("example.com", false);
//! let targets = discover_targets(Path::new("/compose"), &options)?;
//!
//! for (name, url) in targets.merged() {
//!     println!("{} -> {}", name, url);
//! }
//! # Ok::<(), kumasync::discovery::DiscoveryError>(())
//! ```

pub mod includes;
pub mod labels;
pub mod loader;
pub mod rules;
pub mod targets;

pub use includes::{declares_includes, resolve_includes};
pub use labels::{is_truthy, Annotations, RawLabels};
pub use loader::{find_documents, load_document};
pub use rules::{expand_domain, extract_hosts};
pub use targets::{ServiceDeclaration, ServiceTargets, Target};

use serde::Serialize;
use serde_yaml::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that stop a discovery cycle before it starts.
/// Problems with individual documents never surface here.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Compose directory is not a directory: {0:?}")]
    RootNotADirectory(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Value substituted for `${DOMAIN}` / `$DOMAIN`; empty leaves placeholders as-is
    pub domain: String,
    /// Scan only documents reached through `include:` when any exist
    pub only_included: bool,
}

impl DiscoveryOptions {
    pub fn new(domain: impl Into<String>, only_included: bool) -> Self {
        Self {
            domain: domain.into(),
            only_included,
        }
    }
}

/// Result of one discovery cycle: monitor name -> URL, per target kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveredTargets {
    pub public: BTreeMap<String, String>,
    pub backend: BTreeMap<String, String>,
}

impl DiscoveredTargets {
    /// Public and backend targets in one map. Backend entries are inserted
    /// last and replace a public entry with the exact same name.
    pub fn merged(&self) -> BTreeMap<String, String> {
        let mut all = self.public.clone();
        all.extend(self.backend.clone());
        all
    }

    pub fn is_empty(&self) -> bool {
        self.public.is_empty() && self.backend.is_empty()
    }

    /// Adds one service's targets. A name seen before is overwritten.
    pub fn absorb(&mut self, targets: ServiceTargets) {
        for target in targets.public {
            insert_target(&mut self.public, target);
        }
        if let Some(target) = targets.backend {
            insert_target(&mut self.backend, target);
        }
    }
}

fn insert_target(map: &mut BTreeMap<String, String>, target: Target) {
    if let Some(previous) = map.insert(target.name.clone(), target.url.clone()) {
        if previous != target.url {
            debug!(
                name = %target.name,
                previous = %previous,
                url = %target.url,
                "Monitor name already discovered, later service wins"
            );
        }
    }
}

/// Per-cycle parse cache so each document is read once
#[derive(Default)]
struct DocumentCache {
    documents: HashMap<PathBuf, Option<Value>>,
}

impl DocumentCache {
    fn get(&mut self, path: &Path) -> Option<&Value> {
        self.documents
            .entry(path.to_path_buf())
            .or_insert_with(|| load_document(path))
            .as_ref()
    }
}

/// Discovers every monitor target under `root`.
///
/// Fails only when `root` is not a directory.
pub fn discover_targets(
    root: &Path,
    options: &DiscoveryOptions,
) -> Result<DiscoveredTargets, DiscoveryError> {
    let all_documents = find_documents(root)?;
    let mut cache = DocumentCache::default();

    let mut included = Vec::new();
    for path in &all_documents {
        if let Some(document) = cache.get(path) {
            if declares_includes(document) {
                included.extend(resolve_includes(document, path));
            }
        }
    }

    let scan_set: BTreeSet<PathBuf> = if options.only_included && !included.is_empty() {
        included.into_iter().collect()
    } else {
        all_documents.into_iter().chain(included).collect()
    };

    debug!(
        documents = scan_set.len(),
        only_included = options.only_included,
        "Scanning compose documents"
    );

    let mut discovered = DiscoveredTargets::default();

    for path in &scan_set {
        let Some(document) = cache.get(path) else {
            continue;
        };
        for service in services(document) {
            debug!(
                path = %path.display(),
                service = %service.name,
                "Inspecting service"
            );
            discovered.absorb(service.targets(&options.domain));
        }
    }

    debug!(
        public = discovered.public.len(),
        backend = discovered.backend.len(),
        "Discovery completed"
    );

    Ok(discovered)
}

/// Service declarations of a compose document, in document order.
/// Non-mapping documents, `services` values and service entries are skipped.
pub fn services(document: &Value) -> Vec<ServiceDeclaration> {
    let Some(services) = document.get("services").and_then(Value::as_mapping) else {
        return Vec::new();
    };

    services
        .iter()
        .filter_map(|(name, service)| ServiceDeclaration::from_yaml(service_name(name), service))
        .collect()
}

fn service_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
