//! In-memory view over normalized disclosures.
//!
//! The view starts out loading, becomes loaded on the first successful
//! public fetch, and becomes an error only if that first fetch fails.
//! Hub data merges into whatever is already shown; a hub failure is
//! recorded on the side and never degrades the view.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::model::{DisclosureRow, Severity, SeverityTier};
use crate::normalize::merge_collections;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Loaded,
    Error,
}

/// Column a disclosure listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Severity,
    Id,
    Title,
    System,
    Published,
    Modified,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "severity" => Ok(SortKey::Severity),
            "id" => Ok(SortKey::Id),
            "title" => Ok(SortKey::Title),
            "system" => Ok(SortKey::System),
            "published" => Ok(SortKey::Published),
            "modified" => Ok(SortKey::Modified),
            _ => Err(format!(
                "Unknown sort key: {}. Supported keys: severity, id, title, system, published, modified",
                s
            )),
        }
    }
}

pub struct DisclosureView {
    state: ViewState,
    rows: Vec<DisclosureRow>,
    auth_failed: bool,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Default for DisclosureView {
    fn default() -> Self {
        Self::new()
    }
}

impl DisclosureView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            rows: Vec::new(),
            auth_failed: false,
            refreshed_at: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn rows(&self) -> &[DisclosureRow] {
        &self.rows
    }

    pub fn auth_failed(&self) -> bool {
        self.auth_failed
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Replaces the rows with a fresh public snapshot.
    pub fn load(&mut self, rows: Vec<DisclosureRow>) {
        self.rows = rows;
        self.state = ViewState::Loaded;
        self.refreshed_at = Some(Utc::now());
    }

    /// Folds hub rows into the current rows. Rows sharing an id are
    /// replaced by the incoming copy; unseen ids are appended. Arriving
    /// data always leaves the view loaded, even after an earlier error.
    pub fn merge(&mut self, incoming: Vec<DisclosureRow>) {
        self.rows = merge_collections(std::mem::take(&mut self.rows), incoming);
        self.state = ViewState::Loaded;
        self.refreshed_at = Some(Utc::now());
    }

    /// Records a failed public fetch. Only an initial load can fail into
    /// the error state; once data is shown it stays shown.
    pub fn fail(&mut self) {
        if self.state == ViewState::Loading {
            self.state = ViewState::Error;
        }
    }

    /// Records that the hub feed could not be fetched. The public rows
    /// stay up; output layers surface the flag as a side note.
    pub fn mark_auth_failed(&mut self) {
        self.auth_failed = true;
    }

    pub fn sort_by(&mut self, key: SortKey, reverse: bool) {
        match key {
            SortKey::Severity => {
                self.rows.sort_by(severity_order);
            }
            SortKey::Id => {
                self.rows
                    .sort_by(|a, b| a.id.to_lowercase().cmp(&b.id.to_lowercase()));
            }
            SortKey::Title => {
                self.rows
                    .sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
            }
            SortKey::System => {
                self.rows.sort_by(|a, b| {
                    a.affected_system
                        .to_lowercase()
                        .cmp(&b.affected_system.to_lowercase())
                });
            }
            SortKey::Published => {
                // Newest first; rows without a parseable timestamp sink to the end.
                self.rows
                    .sort_by(|a, b| parse_timestamp(&b.published).cmp(&parse_timestamp(&a.published)));
            }
            SortKey::Modified => {
                self.rows
                    .sort_by(|a, b| parse_timestamp(&b.modified).cmp(&parse_timestamp(&a.modified)));
            }
        }
        if reverse {
            self.rows.reverse();
        }
    }

    /// Keeps only rows matching the needle, case-insensitively, across
    /// id, title, summary, details, affected system, and type.
    pub fn apply_filter(&mut self, needle: &str) {
        if needle.is_empty() {
            return;
        }
        let needle = needle.to_lowercase();
        self.rows.retain(|row| {
            row.id.to_lowercase().contains(&needle)
                || row.title.to_lowercase().contains(&needle)
                || row.summary.to_lowercase().contains(&needle)
                || row.details.to_lowercase().contains(&needle)
                || row.affected_system.to_lowercase().contains(&needle)
                || row.disclosure_type.to_lowercase().contains(&needle)
        });
    }

    /// Keeps only rows in the given severity tier.
    pub fn filter_by_tier(&mut self, tier: SeverityTier) {
        self.rows.retain(|row| row.severity.tier() == tier);
    }
}

/// Most severe first: tier rank, then numeric score descending inside a
/// tier. Non-numeric severities sort after scored ones of the same tier.
fn severity_order(a: &DisclosureRow, b: &DisclosureRow) -> Ordering {
    let by_tier = a.severity.tier().rank().cmp(&b.severity.tier().rank());
    if by_tier != Ordering::Equal {
        return by_tier;
    }
    numeric_score(&b.severity)
        .partial_cmp(&numeric_score(&a.severity))
        .unwrap_or(Ordering::Equal)
}

fn numeric_score(severity: &Severity) -> Option<f32> {
    match severity {
        Severity::Numeric(score) => Some(*score),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, score: &str) -> DisclosureRow {
        DisclosureRow {
            id: id.to_string(),
            title: format!("{} title", id),
            severity_score: score.to_string(),
            severity: Severity::from_score(score),
            affected_system: String::new(),
            disclosure_type: String::new(),
            discovery_method: String::new(),
            discovery_date: String::new(),
            fixed_in: None,
            affected_versions: Vec::new(),
            mitigation: String::new(),
            fix_url: None,
            summary: String::new(),
            details: String::new(),
            published: String::new(),
            modified: String::new(),
        }
    }

    fn ids(view: &DisclosureView) -> Vec<&str> {
        view.rows().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_new_view_is_loading_and_empty() {
        let view = DisclosureView::new();
        assert_eq!(view.state(), ViewState::Loading);
        assert!(view.is_empty());
        assert!(!view.auth_failed());
        assert!(view.refreshed_at().is_none());
    }

    #[test]
    fn test_load_replaces_rows() {
        let mut view = DisclosureView::new();
        view.load(vec![row("A-1", "5.0")]);
        view.load(vec![row("B-1", "7.0"), row("B-2", "3.0")]);

        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(ids(&view), vec!["B-1", "B-2"]);
        assert!(view.refreshed_at().is_some());
    }

    #[test]
    fn test_fail_while_loading() {
        let mut view = DisclosureView::new();
        view.fail();
        assert_eq!(view.state(), ViewState::Error);
    }

    #[test]
    fn test_fail_after_load_keeps_data() {
        let mut view = DisclosureView::new();
        view.load(vec![row("A-1", "5.0")]);
        view.fail();

        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_merge_overrides_and_appends() {
        let mut view = DisclosureView::new();
        view.load(vec![row("A-1", "5.0"), row("A-2", "3.0")]);

        let mut replacement = row("A-1", "9.8");
        replacement.title = "escalated".to_string();
        view.merge(vec![replacement, row("A-3", "2.0")]);

        assert_eq!(ids(&view), vec!["A-1", "A-2", "A-3"]);
        assert_eq!(view.rows()[0].title, "escalated");
        assert_eq!(view.rows()[0].severity_score, "9.8");
    }

    #[test]
    fn test_merge_recovers_from_error() {
        let mut view = DisclosureView::new();
        view.fail();
        assert_eq!(view.state(), ViewState::Error);

        view.merge(vec![row("A-1", "5.0")]);
        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_merge_from_loading() {
        let mut view = DisclosureView::new();
        view.merge(vec![row("A-1", "5.0")]);
        assert_eq!(view.state(), ViewState::Loaded);
    }

    #[test]
    fn test_mark_auth_failed_leaves_state() {
        let mut view = DisclosureView::new();
        view.load(vec![row("A-1", "5.0")]);
        view.mark_auth_failed();

        assert!(view.auth_failed());
        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_sort_severity_most_severe_first() {
        let mut view = DisclosureView::new();
        view.load(vec![
            row("LOW", "2.0"),
            row("NEUTRAL", ""),
            row("CRIT-LABEL", "Critical"),
            row("HIGH", "7.5"),
            row("CRIT-NUM", "9.8"),
        ]);
        view.sort_by(SortKey::Severity, false);

        assert_eq!(ids(&view), vec!["CRIT-NUM", "CRIT-LABEL", "HIGH", "LOW", "NEUTRAL"]);
    }

    #[test]
    fn test_sort_severity_score_descends_within_tier() {
        let mut view = DisclosureView::new();
        view.load(vec![row("H1", "7.1"), row("H2", "8.9"), row("H3", "7.5")]);
        view.sort_by(SortKey::Severity, false);

        assert_eq!(ids(&view), vec!["H2", "H3", "H1"]);
    }

    #[test]
    fn test_sort_severity_reversed() {
        let mut view = DisclosureView::new();
        view.load(vec![row("LOW", "2.0"), row("CRIT", "9.8")]);
        view.sort_by(SortKey::Severity, true);

        assert_eq!(ids(&view), vec!["LOW", "CRIT"]);
    }

    #[test]
    fn test_sort_id_case_insensitive() {
        let mut view = DisclosureView::new();
        view.load(vec![row("b-2", ""), row("A-10", ""), row("B-1", "")]);
        view.sort_by(SortKey::Id, false);

        assert_eq!(ids(&view), vec!["A-10", "B-1", "b-2"]);
    }

    #[test]
    fn test_sort_published_newest_first() {
        let mut view = DisclosureView::new();
        let mut old = row("OLD", "");
        old.published = "2023-01-10T00:00:00Z".to_string();
        let mut new = row("NEW", "");
        new.published = "2024-06-01T12:30:00Z".to_string();
        let blank = row("BLANK", "");

        view.load(vec![blank, old, new]);
        view.sort_by(SortKey::Published, false);

        assert_eq!(ids(&view), vec!["NEW", "OLD", "BLANK"]);
    }

    #[test]
    fn test_sort_modified() {
        let mut view = DisclosureView::new();
        let mut a = row("A", "");
        a.modified = "2024-01-01T00:00:00Z".to_string();
        let mut b = row("B", "");
        b.modified = "2024-02-01T00:00:00Z".to_string();

        view.load(vec![a, b]);
        view.sort_by(SortKey::Modified, false);

        assert_eq!(ids(&view), vec!["B", "A"]);
    }

    #[test]
    fn test_filter_matches_across_fields() {
        let mut view = DisclosureView::new();
        let mut by_system = row("A-1", "");
        by_system.affected_system = "Runtime Node".to_string();
        let mut by_summary = row("A-2", "");
        by_summary.summary = "Panic in block import".to_string();
        let other = row("A-3", "");

        view.load(vec![by_system, by_summary, other]);
        view.apply_filter("RUNTIME");

        assert_eq!(ids(&view), vec!["A-1"]);
    }

    #[test]
    fn test_filter_by_id_substring() {
        let mut view = DisclosureView::new();
        view.load(vec![row("CVE-2024-001", ""), row("GHSA-xyz", "")]);
        view.apply_filter("cve");

        assert_eq!(ids(&view), vec!["CVE-2024-001"]);
    }

    #[test]
    fn test_filter_empty_needle_keeps_everything() {
        let mut view = DisclosureView::new();
        view.load(vec![row("A-1", ""), row("A-2", "")]);
        view.apply_filter("");

        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_filter_without_match_clears_rows() {
        let mut view = DisclosureView::new();
        view.load(vec![row("A-1", "")]);
        view.apply_filter("zzz");

        assert!(view.is_empty());
    }

    #[test]
    fn test_filter_by_tier_keeps_exact_tier() {
        let mut view = DisclosureView::new();
        view.load(vec![row("CRIT", "9.8"), row("MED", "5.0"), row("NONE", "")]);
        view.filter_by_tier(SeverityTier::Critical);

        assert_eq!(ids(&view), vec!["CRIT"]);
    }

    #[test]
    fn test_filter_by_tier_neutral_catches_unscored() {
        let mut view = DisclosureView::new();
        view.load(vec![row("CRIT", "9.8"), row("NONE", "")]);
        view.filter_by_tier(SeverityTier::Neutral);

        assert_eq!(ids(&view), vec!["NONE"]);
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("severity".parse::<SortKey>().unwrap(), SortKey::Severity);
        assert_eq!("Published".parse::<SortKey>().unwrap(), SortKey::Published);
        assert!("danger".parse::<SortKey>().is_err());
    }
}
