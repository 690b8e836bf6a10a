//! Turns raw feed records into display-ready rows and merges collections
//! from multiple sources into one ordered, de-duplicated sequence.

use std::collections::HashMap;

use crate::model::{Affected, DisclosureRow, Severity, VulnerabilityRecord};

/// Shown when neither the affected entry nor the record carries
/// mitigation details.
pub const NO_MITIGATION: &str = "no mitigation details available.";

/// Anything mergeable by a string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for VulnerabilityRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for DisclosureRow {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Merges `secondary` on top of `primary`, keyed by id.
///
/// Entries from `secondary` replace same-id entries from `primary` in
/// place, keeping `primary`'s ordering; ids only in `secondary` are
/// appended in `secondary`'s order. Not commutative: the second argument
/// always wins a conflict, which is how the authenticated feed overrides
/// the public one.
pub fn merge_collections<T: Keyed>(primary: Vec<T>, secondary: Vec<T>) -> Vec<T> {
    let mut merged = primary;
    let mut index: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.key().to_string(), i))
        .collect();

    for entry in secondary {
        match index.get(entry.key()).copied() {
            Some(i) => merged[i] = entry,
            None => {
                index.insert(entry.key().to_string(), merged.len());
                merged.push(entry);
            }
        }
    }

    merged
}

/// First element of an optional slice. The one traversal primitive behind
/// every "first affected / first range / first event" lookup; callers
/// supply their own fallback at the edge.
fn head<T>(items: Option<&[T]>) -> Option<&T> {
    items?.first()
}

fn first_affected(record: &VulnerabilityRecord) -> Option<&Affected> {
    head(record.affected.as_deref())
}

/// Severity score of the first affected entry's first severity item,
/// or `""` when absent at any level.
pub fn severity_score(record: &VulnerabilityRecord) -> String {
    first_affected(record)
        .and_then(|affected| head(affected.severity.as_deref()))
        .and_then(|entry| entry.score.clone())
        .unwrap_or_default()
}

/// Version named by the first truthy `fixed` event in the first range of
/// the first affected entry. `None` when absent at any level; an
/// empty-string marker does not count as a fix.
pub fn fixed_version(record: &VulnerabilityRecord) -> Option<String> {
    let range = head(first_affected(record)?.ranges.as_deref())?;
    range
        .events
        .as_deref()?
        .iter()
        .find_map(|event| match event.fixed.as_deref() {
            Some(version) if !version.is_empty() => Some(version.to_string()),
            _ => None,
        })
}

/// The first affected entry's versions list, verbatim. Empty when the
/// entry (or the list) is missing.
pub fn affected_versions(record: &VulnerabilityRecord) -> Vec<String> {
    first_affected(record)
        .and_then(|affected| affected.versions.clone())
        .unwrap_or_default()
}

/// Mitigation guidance for a record.
///
/// Prefers the first affected entry's mitigation, with the ETA appended
/// on its own line when present; falls back to the record-level
/// mitigation, then to [`NO_MITIGATION`].
pub fn mitigation_text(record: &VulnerabilityRecord) -> String {
    if let Some(db) = first_affected(record).and_then(|affected| affected.database_specific.as_ref()) {
        if let Some(mitigation) = db.mitigation.as_deref() {
            return match db.eta.as_deref() {
                Some(eta) => format!("{}\nETA: {}", mitigation, eta),
                None => mitigation.to_string(),
            };
        }
    }

    record
        .database_specific
        .as_ref()
        .and_then(|db| db.mitigation.clone())
        .unwrap_or_else(|| NO_MITIGATION.to_string())
}

/// URL of the first reference typed `FIX`, when one exists.
pub fn fix_reference(record: &VulnerabilityRecord) -> Option<String> {
    record
        .references
        .as_deref()?
        .iter()
        .find(|reference| reference.kind.as_deref() == Some("FIX"))
        .and_then(|reference| reference.url.clone())
}

/// Flattens one raw record into a display row, resolving severity once.
pub fn normalize(record: &VulnerabilityRecord) -> DisclosureRow {
    let score = severity_score(record);
    let severity = Severity::from_score(&score);
    let db = record.database_specific.as_ref();

    DisclosureRow {
        id: record.id.clone(),
        title: db
            .and_then(|d| d.title.clone())
            .or_else(|| record.summary.clone())
            .unwrap_or_default(),
        severity_score: score,
        severity,
        affected_system: db.and_then(|d| d.affected_system.clone()).unwrap_or_default(),
        disclosure_type: db.and_then(|d| d.kind.clone()).unwrap_or_default(),
        discovery_method: db.and_then(|d| d.discovery_method.clone()).unwrap_or_default(),
        discovery_date: db.and_then(|d| d.discovery_date.clone()).unwrap_or_default(),
        fixed_in: fixed_version(record),
        affected_versions: affected_versions(record),
        mitigation: mitigation_text(record),
        fix_url: fix_reference(record),
        summary: record.summary.clone().unwrap_or_default(),
        details: record.details.clone().unwrap_or_default(),
        published: record.published.clone().unwrap_or_default(),
        modified: record.modified.clone().unwrap_or_default(),
    }
}

/// Flattens a whole collection, preserving its order.
pub fn normalize_all(records: &[VulnerabilityRecord]) -> Vec<DisclosureRow> {
    records.iter().map(normalize).collect()
}
