//! Hostname extraction from Traefik router rules
//!
//! Only `Host(...)` matchers are understood. Every backtick-quoted token inside
//! a `Host(...)` group is a hostname; other matchers are ignored.

use regex::Regex;
use std::sync::OnceLock;

/// Scheme used for every public target
pub const PUBLIC_SCHEME: &str = "https://";

const DOMAIN_PLACEHOLDERS: [&str; 2] = ["${DOMAIN}", "$DOMAIN"];

fn host_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Host\(([^)]+)\)").expect("valid regex"))
}

fn backtick_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`]+)`").expect("valid regex"))
}

/// Argument lists of every `Host(...)` group, left to right
pub fn host_blocks(rule: &str) -> Vec<&str> {
    host_block_re()
        .captures_iter(rule)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Backtick-quoted tokens, left to right
pub fn quoted_hosts(block: &str) -> Vec<&str> {
    backtick_re()
        .captures_iter(block)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Replaces `${DOMAIN}` and `$DOMAIN` with `domain`.
///
/// With an empty `domain` the value is returned untouched, placeholders included.
pub fn expand_domain(value: &str, domain: &str) -> String {
    if domain.is_empty() {
        return value.to_string();
    }
    DOMAIN_PLACEHOLDERS
        .iter()
        .fold(value.to_string(), |acc, placeholder| {
            acc.replace(placeholder, domain)
        })
}

/// Hostnames named by a rule, with the domain placeholder expanded.
/// Blank hostnames are dropped.
pub fn extract_hosts(rule: &str, domain: &str) -> Vec<String> {
    host_blocks(rule)
        .into_iter()
        .flat_map(quoted_hosts)
        .map(|host| expand_domain(host, domain).trim().to_string())
        .filter(|host| !host.is_empty())
        .collect()
}

/// Public URLs for every hostname named by a rule
pub fn public_urls(rule: &str, domain: &str) -> Vec<String> {
    extract_hosts(rule, domain)
        .into_iter()
        .map(|host| format!("{}{}", PUBLIC_SCHEME, host))
        .collect()
}
