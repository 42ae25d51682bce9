//! Output formatting for discovered targets
//!
//! JSON and YAML are meant for scripts; the human format is a two-section
//! listing of monitor names and URLs.

use anyhow::{Context, Result};
use std::fmt::Write;

use crate::discovery::DiscoveredTargets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable listing
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, targets: &DiscoveredTargets) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(targets).context("Failed to serialize targets to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(targets).context("Failed to serialize targets to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(targets)),
        }
    }

    fn format_human(&self, targets: &DiscoveredTargets) -> String {
        let mut output = String::new();

        let sections = [("Public", &targets.public), ("Backend", &targets.backend)];
        for (title, entries) in sections {
            let _ = writeln!(output, "{} targets ({}):", title, entries.len());
            let width = entries.keys().map(|k| k.chars().count()).max().unwrap_or(0);
            for (name, url) in entries {
                let _ = writeln!(output, "  {:<width$}  {}", name, url, width = width);
            }
            output.push('\n');
        }

        let _ = writeln!(output, "Total: {}", targets.merged().len());
        output
    }
}
