use crate::audits::AuditEntry;
use crate::model::{DisclosureRow, Severity, SeverityTier};
use crate::view::DisclosureView;
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct ListingRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "System")]
    system: String,
    #[tabled(rename = "Type")]
    disclosure_type: String,
    #[tabled(rename = "Fixed In")]
    fixed_in: String,
}

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "Firm")]
    firm: String,
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "URL")]
    url: String,
}

pub fn print_disclosure_table(view: &DisclosureView) -> Result<()> {
    println!();
    if let Some(at) = view.refreshed_at() {
        println!("Fetched at: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!();
    }

    if view.is_empty() {
        println!("No disclosures available yet! Check again soon...");
    } else {
        println!("Found {} disclosures:", view.len());
        println!();

        let rows: Vec<ListingRow> = view
            .rows()
            .iter()
            .map(|d| ListingRow {
                severity: format_severity(d),
                id: truncate(&d.id, 30),
                title: truncate(&d.title, 50),
                system: truncate(&d.affected_system, 25),
                disclosure_type: truncate(&d.disclosure_type, 20),
                fixed_in: d.fixed_in.clone().unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    if view.auth_failed() {
        println!();
        println!("Note: the authenticated feed could not be fetched. Showing public data only.");
    }

    println!();
    print_summary(view);

    Ok(())
}

/// Full record for a single disclosure, for the `show` command.
pub fn print_disclosure_detail(row: &DisclosureRow) -> Result<()> {
    println!();
    println!("ID:        {}", row.id);
    println!("Title:     {}", row.title);
    println!("Severity:  {}", format_severity(row));
    if !row.affected_system.is_empty() {
        println!("System:    {}", row.affected_system);
    }
    if !row.disclosure_type.is_empty() {
        println!("Type:      {}", row.disclosure_type);
    }
    if !row.discovery_method.is_empty() {
        println!("Found by:  {}", row.discovery_method);
    }
    if !row.discovery_date.is_empty() {
        println!("Found on:  {}", row.discovery_date);
    }
    if !row.published.is_empty() {
        println!("Published: {}", row.published);
    }
    if !row.modified.is_empty() {
        println!("Modified:  {}", row.modified);
    }

    match &row.fixed_in {
        Some(version) => println!("Status:    fixed in {}", version),
        None => println!("Status:    no fix recorded"),
    }
    if let Some(url) = &row.fix_url {
        println!("Fix:       {}", url);
    }

    if !row.affected_versions.is_empty() {
        println!();
        println!("Affected versions:");
        for version in &row.affected_versions {
            println!("  - {}", version);
        }
    }

    println!();
    println!("Mitigation:");
    for line in row.mitigation.lines() {
        println!("  {}", line);
    }

    if !row.summary.is_empty() {
        println!();
        println!("{}", row.summary);
    }
    if !row.details.is_empty() {
        println!();
        println!("{}", row.details);
    }

    Ok(())
}

pub fn print_audit_table(entries: &[AuditEntry]) -> Result<()> {
    println!();

    if entries.is_empty() {
        println!("No audit reports available yet! Check again soon...");
        return Ok(());
    }

    println!("Found {} audit reports:", entries.len());
    println!();

    let rows: Vec<AuditRow> = entries
        .iter()
        .map(|e| AuditRow {
            firm: truncate(&e.firm, 30),
            project: truncate(&e.project, 40),
            date: e.display_date(),
            url: e.url.clone(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    Ok(())
}

fn format_severity(row: &DisclosureRow) -> String {
    let label = match row.severity.tier() {
        SeverityTier::Critical => "\x1b[31mCRITICAL\x1b[0m",
        SeverityTier::High => "\x1b[91mHIGH\x1b[0m",
        SeverityTier::Medium => "\x1b[33mMEDIUM\x1b[0m",
        SeverityTier::Low => "\x1b[32mLOW\x1b[0m",
        SeverityTier::Neutral => "-",
    };

    match &row.severity {
        Severity::Numeric(_) => format!("{} ({})", label, row.severity_score),
        _ => label.to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        // The cut may land inside a multi-byte char; back up to a boundary
        let mut end = max_len - 3;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

fn print_summary(view: &DisclosureView) {
    let critical = count_tier(view, SeverityTier::Critical);
    let high = count_tier(view, SeverityTier::High);
    let medium = count_tier(view, SeverityTier::Medium);
    let low = count_tier(view, SeverityTier::Low);
    let unclassified = count_tier(view, SeverityTier::Neutral);
    let fixed = view.rows().iter().filter(|r| r.has_fix()).count();

    println!("Summary:");
    println!("  Total disclosures: {}", view.len());
    if !view.is_empty() {
        println!(
            "  Severity: {} critical, {} high, {} medium, {} low, {} unclassified",
            critical, high, medium, low, unclassified
        );
        println!("  With a recorded fix: {}", fixed);
    }
}

fn count_tier(view: &DisclosureView, tier: SeverityTier) -> usize {
    view.rows()
        .iter()
        .filter(|r| r.severity.tier() == tier)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_titled(title: &str) -> DisclosureRow {
        DisclosureRow {
            id: "HUB-2024-001".to_string(),
            title: title.to_string(),
            severity_score: "9.8".to_string(),
            severity: Severity::from_score("9.8"),
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

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("short", 30), "short");
    }

    #[test]
    fn test_truncate_long_ascii() {
        let long = "x".repeat(40);
        assert_eq!(truncate(&long, 30), format!("{}...", "x".repeat(27)));
    }

    #[test]
    fn test_truncate_backs_up_to_char_boundary() {
        // 'é' spans bytes 46..48, so the cut at 47 falls inside it.
        let title = format!("{}é and more text after", "a".repeat(46));
        assert_eq!(truncate(&title, 50), format!("{}...", "a".repeat(46)));
    }

    #[test]
    fn test_table_renders_multibyte_title() {
        let mut view = DisclosureView::new();
        view.load(vec![row_titled(&format!(
            "{}é overflowing the title column",
            "a".repeat(46)
        ))]);

        assert!(print_disclosure_table(&view).is_ok());
    }

    #[test]
    fn test_audit_table_renders_multibyte_firm() {
        let entries = vec![AuditEntry {
            firm: format!("{}ü Security Research Gruppe", "f".repeat(26)),
            project: "Runtime".to_string(),
            date: "29/04/2023".to_string(),
            url: "https://example.com/report.pdf".to_string(),
        }];

        assert!(print_audit_table(&entries).is_ok());
    }
}
