mod cli;
mod json;

pub use cli::{print_audit_table, print_disclosure_detail, print_disclosure_table};
pub use json::{print_audits_json, print_view_json};

use crate::audits::AuditEntry;
use crate::view::DisclosureView;
use anyhow::Result;

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'table' or 'json'", s)),
        }
    }
}

pub fn print_view(view: &DisclosureView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_disclosure_table(view),
        OutputFormat::Json => print_view_json(view),
    }
}

pub fn print_audits(entries: &[AuditEntry], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_audit_table(entries),
        OutputFormat::Json => print_audits_json(entries),
    }
}

/// Format the view to a string for file output
pub fn format_view_to_string(view: &DisclosureView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::view_to_string(view),
        OutputFormat::Table => {
            // For table format, just use JSON as the file output
            json::view_to_string(view)
        }
    }
}
