//! Audit report listing, published next to the disclosure feed as a
//! four-column CSV: firm, project, date, url. Dates are day-first
//! (`29/04/2023`); listings show newest reports first.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FeedError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub firm: String,
    pub project: String,
    /// Date exactly as published, day-first (`dd/mm/yyyy`).
    pub date: String,
    pub url: String,
}

impl AuditEntry {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%d/%m/%Y").ok()
    }

    /// Date for display ("Apr 29, 2023"), falling back to the raw
    /// string when it does not parse.
    pub fn display_date(&self) -> String {
        match self.parsed_date() {
            Some(date) => date.format("%b %-d, %Y").to_string(),
            None => self.date.clone(),
        }
    }
}

/// Fetches and parses the audit CSV. A timestamp query parameter is
/// appended so intermediate caches cannot serve a stale copy.
pub async fn fetch_audits(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<AuditEntry>, FeedError> {
    let url = format!("{}?v={}", url, Utc::now().timestamp_millis());
    debug!(url = %url, "fetching audit reports");

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(FeedError::Http {
            status: response.status().as_u16(),
            url,
        });
    }

    let body = response.text().await?;
    let mut entries = parse_audits_csv(&body);
    sort_newest_first(&mut entries);
    Ok(entries)
}

/// Parses the audit CSV body. The first non-empty line is the header
/// and is dropped; empty lines are skipped; rows with fewer than four
/// columns are skipped with a warning; extra columns are ignored.
pub fn parse_audits_csv(body: &str) -> Vec<AuditEntry> {
    let mut entries = Vec::new();
    let mut header_seen = false;

    for line in body.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }

        let fields = split_csv_line(line);
        if fields.len() < 4 {
            warn!(line = %line, "skipping audit row with fewer than 4 columns");
            continue;
        }

        let mut fields = fields.into_iter();
        entries.push(AuditEntry {
            firm: fields.next().unwrap_or_default(),
            project: fields.next().unwrap_or_default(),
            date: fields.next().unwrap_or_default(),
            url: fields.next().unwrap_or_default(),
        });
    }

    entries
}

/// Date descending; rows with unparseable dates sink to the end.
pub fn sort_newest_first(entries: &mut [AuditEntry]) {
    entries.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
}

/// Splits one CSV line, honoring double-quoted fields and doubled
/// quotes inside them.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
