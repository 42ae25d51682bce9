//! Per-service target derivation
//!
//! A compose service can produce public monitors (one per externally visible
//! hostname) and at most one backend monitor (the container's HTTP port on the
//! internal network).

use super::labels::{is_truthy, Annotations, RawLabels};
use super::rules::{self, expand_domain, PUBLIC_SCHEME};
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;
use std::sync::OnceLock;

pub const TRAEFIK_ENABLE: &str = "traefik.enable";
pub const HOMEPAGE_HREF: &str = "homepage.href";
pub const HOMEPAGE_NAME: &str = "homepage.name";
pub const RULE_SUFFIX: &str = ".rule";

/// Scheme used for every backend target
pub const BACKEND_SCHEME: &str = "http://";

fn lb_port_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^traefik\.http\.services\.[^.]+\.loadbalancer\.server\.port$")
            .expect("valid regex")
    })
}

/// A single monitor to be: display name and URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub name: String,
    pub url: String,
}

impl Target {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// The parts of a compose service that matter for discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDeclaration {
    pub name: String,
    pub container_name: Option<String>,
    pub annotations: Annotations,
}

impl ServiceDeclaration {
    /// Reads a service entry. Returns `None` when the entry is not a mapping.
    pub fn from_yaml(name: impl Into<String>, service: &Value) -> Option<Self> {
        let service = service.as_mapping()?;
        let annotations = Annotations::normalize(RawLabels::from_value(service.get("labels")));
        let container_name = service
            .get("container_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Some(Self {
            name: name.into(),
            container_name,
            annotations,
        })
    }

    pub fn traefik_enabled(&self) -> bool {
        self.annotations
            .get(TRAEFIK_ENABLE)
            .map(is_truthy)
            .unwrap_or(false)
    }

    /// `homepage.name` verbatim if present, else the compose service name
    pub fn display_name(&self) -> &str {
        self.annotations
            .get(HOMEPAGE_NAME)
            .unwrap_or(self.name.as_str())
    }

    /// Host the backend monitor should connect to
    pub fn backend_host(&self) -> &str {
        self.container_name.as_deref().unwrap_or(self.name.as_str())
    }

    /// Candidate public URLs, in priority order:
    /// `homepage.href`, then the first router rule (by key) naming a host.
    /// An href without a host yields nothing and does not fall through to the rules.
    pub fn public_urls(&self, domain: &str) -> Vec<String> {
        if let Some(href) = self.annotations.get_non_blank(HOMEPAGE_HREF) {
            return href_url(&expand_domain(href, domain)).into_iter().collect();
        }
        if !self.traefik_enabled() {
            return Vec::new();
        }

        let mut rule_keys: Vec<&str> = self
            .annotations
            .iter()
            .map(|(key, _)| key)
            .filter(|key| key.ends_with(RULE_SUFFIX))
            .collect();
        rule_keys.sort_unstable();

        rule_keys
            .into_iter()
            .filter_map(|key| self.annotations.get(key))
            .map(|rule| rules::public_urls(rule, domain))
            .find(|urls| !urls.is_empty())
            .unwrap_or_default()
    }

    /// Port from the first `traefik.http.services.<name>.loadbalancer.server.port`
    /// whose value is an integer. Keys with non-numeric values are skipped, but once
    /// an integer is found it decides: `0` or anything outside the TCP range means
    /// no backend.
    pub fn backend_port(&self) -> Option<u16> {
        self.annotations
            .iter()
            .filter(|(key, _)| lb_port_re().is_match(key))
            .find_map(|(_, value)| value.trim().parse::<i64>().ok())
            .and_then(|port| u16::try_from(port).ok())
            .filter(|port| *port != 0)
    }

    pub fn targets(&self, domain: &str) -> ServiceTargets {
        let display_name = self.display_name();

        let urls = self.public_urls(domain);
        let public = match urls.as_slice() {
            [] => Vec::new(),
            [url] => vec![Target::new(format!("{} (public)", display_name), url.clone())],
            _ => urls
                .iter()
                .map(|url| {
                    let host = url.strip_prefix(PUBLIC_SCHEME).unwrap_or(url.as_str());
                    Target::new(format!("{} (public) ({})", display_name, host), url.clone())
                })
                .collect(),
        };

        let backend = if self.traefik_enabled() {
            self.backend_port().map(|port| {
                Target::new(
                    format!("{} (backend)", display_name),
                    format!("{}{}:{}", BACKEND_SCHEME, self.backend_host(), port),
                )
            })
        } else {
            None
        };

        ServiceTargets { public, backend }
    }
}

/// Everything one service contributes to a discovery cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceTargets {
    pub public: Vec<Target>,
    pub backend: Option<Target>,
}

impl ServiceTargets {
    pub fn is_empty(&self) -> bool {
        self.public.is_empty() && self.backend.is_none()
    }
}

/// Adds `https://` when the href has no scheme. `None` when no host is left.
fn href_url(href: &str) -> Option<String> {
    let url = if href.contains("://") {
        href.to_string()
    } else {
        format!("{}{}", PUBLIC_SCHEME, href)
    };

    let host = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .and_then(|rest| rest.split(['/', '?', '#']).next())
        .and_then(|authority| authority.rsplit('@').next())
        .and_then(|host_port| host_port.split(':').next())
        .unwrap_or_default();

    if host.trim().is_empty() {
        None
    } else {
        Some(url)
    }
}
