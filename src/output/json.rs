use crate::audits::AuditEntry;
use crate::model::DisclosureRow;
use crate::view::DisclosureView;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct ViewReport<'a> {
    fetched_at: Option<DateTime<Utc>>,
    auth_failed: bool,
    disclosures: &'a [DisclosureRow],
}

impl<'a> ViewReport<'a> {
    fn new(view: &'a DisclosureView) -> Self {
        Self {
            fetched_at: view.refreshed_at(),
            auth_failed: view.auth_failed(),
            disclosures: view.rows(),
        }
    }
}

pub(crate) fn view_to_string(view: &DisclosureView) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ViewReport::new(view))?)
}

pub fn print_view_json(view: &DisclosureView) -> Result<()> {
    println!("{}", view_to_string(view)?);
    Ok(())
}

pub fn print_audits_json(entries: &[AuditEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    println!("{}", json);
    Ok(())
}
