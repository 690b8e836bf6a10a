use serde::{Deserialize, Serialize};

/// Severity of a disclosure, resolved once from the raw score string.
///
/// Hub feeds carry severity either as a categorical label (`"Critical"`),
/// as a numeric CVSS base score in string form (`"7.5"`), or not at all.
/// Resolving the union here keeps tier derivation, sorting, and display
/// from re-parsing the same string in three places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Categorical(String),
    Numeric(f32),
    Unknown,
}

impl Severity {
    /// Classifies a raw score string. Total: every input maps to a variant.
    pub fn from_score(score: &str) -> Self {
        if score.is_empty() {
            return Severity::Unknown;
        }
        if score == "Critical" {
            return Severity::Categorical(score.to_string());
        }
        match score.parse::<f32>() {
            Ok(value) => Severity::Numeric(value),
            Err(_) => Severity::Unknown,
        }
    }

    /// Maps the severity onto a display tier. Total by construction:
    /// unclassifiable input lands on [`SeverityTier::Neutral`] rather
    /// than erroring.
    pub fn tier(&self) -> SeverityTier {
        match self {
            Severity::Categorical(label) if label == "Critical" => SeverityTier::Critical,
            Severity::Categorical(_) => SeverityTier::Neutral,
            Severity::Numeric(score) => match score {
                s if *s >= 9.0 => SeverityTier::Critical,
                s if *s >= 7.0 => SeverityTier::High,
                s if *s >= 4.0 => SeverityTier::Medium,
                _ => SeverityTier::Low,
            },
            Severity::Unknown => SeverityTier::Neutral,
        }
    }
}

/// Display tier for a severity. `Neutral` means "could not classify",
/// not "harmless".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Critical,
    High,
    Medium,
    Low,
    Neutral,
}

impl SeverityTier {
    /// Sort rank, most severe first.
    pub fn rank(&self) -> u8 {
        match self {
            SeverityTier::Critical => 0,
            SeverityTier::High => 1,
            SeverityTier::Medium => 2,
            SeverityTier::Low => 3,
            SeverityTier::Neutral => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Critical => "critical",
            SeverityTier::High => "high",
            SeverityTier::Medium => "medium",
            SeverityTier::Low => "low",
            SeverityTier::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A disclosure flattened into display-ready attributes.
///
/// Built once per raw record by [`crate::normalize::normalize`]; consumers
/// never reach back into the nested feed shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisclosureRow {
    pub id: String,
    pub title: String,
    /// Raw score string exactly as the feed carried it ("" when absent).
    pub severity_score: String,
    pub severity: Severity,
    pub affected_system: String,
    pub disclosure_type: String,
    pub discovery_method: String,
    pub discovery_date: String,
    /// Version that fixes the disclosure, when one is recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_in: Option<String>,
    pub affected_versions: Vec<String>,
    pub mitigation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_url: Option<String>,
    pub summary: String,
    pub details: String,
    pub published: String,
    pub modified: String,
}

impl DisclosureRow {
    /// True when a fix version is recorded for this disclosure.
    pub fn has_fix(&self) -> bool {
        self.fixed_in.is_some()
    }

    /// Affected versions joined for plain-text rendering.
    pub fn versions_text(&self) -> String {
        self.affected_versions.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_score_empty() {
        assert_eq!(Severity::from_score(""), Severity::Unknown);
    }

    #[test]
    fn test_from_score_categorical() {
        assert_eq!(
            Severity::from_score("Critical"),
            Severity::Categorical("Critical".to_string())
        );
        // Only the exact label is categorical; near-misses stay unknown.
        assert_eq!(Severity::from_score("critical"), Severity::Unknown);
        assert_eq!(Severity::from_score("CRITICAL"), Severity::Unknown);
    }

    #[test]
    fn test_from_score_numeric() {
        assert_eq!(Severity::from_score("9.8"), Severity::Numeric(9.8));
        assert_eq!(Severity::from_score("0"), Severity::Numeric(0.0));
    }

    #[test]
    fn test_from_score_garbage() {
        assert_eq!(Severity::from_score("abc"), Severity::Unknown);
        assert_eq!(Severity::from_score("high-ish"), Severity::Unknown);
    }

    #[test]
    fn test_tier_critical() {
        assert_eq!(Severity::from_score("Critical").tier(), SeverityTier::Critical);
        assert_eq!(Severity::from_score("9.0").tier(), SeverityTier::Critical);
        assert_eq!(Severity::from_score("10.0").tier(), SeverityTier::Critical);
    }

    #[test]
    fn test_tier_high() {
        assert_eq!(Severity::from_score("7.0").tier(), SeverityTier::High);
        assert_eq!(Severity::from_score("8.9").tier(), SeverityTier::High);
    }

    #[test]
    fn test_tier_medium_boundary() {
        // 6.5 sits below the high boundary at 7.
        assert_eq!(Severity::from_score("6.5").tier(), SeverityTier::Medium);
        assert_eq!(Severity::from_score("4.0").tier(), SeverityTier::Medium);
    }

    #[test]
    fn test_tier_low() {
        assert_eq!(Severity::from_score("3.0").tier(), SeverityTier::Low);
        assert_eq!(Severity::from_score("0.0").tier(), SeverityTier::Low);
    }

    #[test]
    fn test_tier_total_over_garbage() {
        assert_eq!(Severity::from_score("").tier(), SeverityTier::Neutral);
        assert_eq!(Severity::from_score("abc").tier(), SeverityTier::Neutral);
    }

    #[test]
    fn test_tier_rank_ordering() {
        assert!(SeverityTier::Critical.rank() < SeverityTier::High.rank());
        assert!(SeverityTier::High.rank() < SeverityTier::Medium.rank());
        assert!(SeverityTier::Medium.rank() < SeverityTier::Low.rank());
        assert!(SeverityTier::Low.rank() < SeverityTier::Neutral.rank());
    }
}
