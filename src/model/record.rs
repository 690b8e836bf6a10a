use serde::Deserialize;

/// A raw vulnerability disclosure as published by a hub feed.
///
/// The shape follows the OSV schema with the hub's `database_specific`
/// extensions. Every nested level is optional: feeds in the wild omit
/// whole subtrees, and a partial record must still deserialize.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VulnerabilityRecord {
    pub id: String,
    pub summary: Option<String>,
    pub details: Option<String>,
    pub published: Option<String>,
    pub modified: Option<String>,
    pub affected: Option<Vec<Affected>>,
    pub references: Option<Vec<Reference>>,
    pub database_specific: Option<DatabaseSpecific>,
}

/// One entry in a record's `affected` collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Affected {
    pub severity: Option<Vec<SeverityEntry>>,
    pub versions: Option<Vec<String>>,
    pub ranges: Option<Vec<VersionRange>>,
    pub database_specific: Option<DatabaseSpecific>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeverityEntry {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub score: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VersionRange {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub events: Option<Vec<RangeEvent>>,
}

/// A version event inside a range. `fixed` carries the version that
/// resolves the disclosure when one exists.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RangeEvent {
    pub introduced: Option<String>,
    pub fixed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
}

/// Hub-specific metadata attached to records and to individual affected
/// entries. Unknown fields are ignored so feed additions don't break us.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DatabaseSpecific {
    pub title: Option<String>,
    pub affected_system: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub discovery_method: Option<String>,
    pub discovery_date: Option<String>,
    pub mitigation: Option<String>,
    pub eta: Option<String>,
}
