//! Vulnerability feed sources.
//!
//! This module provides the [`FeedSource`] trait and the two sources a
//! hub deployment exposes:
//!
//! | Source | Endpoint | Credentials |
//! |--------|----------|-------------|
//! | [`PublicFeed`] | fixed feed URL | none |
//! | [`HubFeed`] | `{server_url}/detect/vulnerabilities` | optional bearer token |
//!
//! Fetches are sequenced, never concurrent: the public feed is always
//! attempted first, then the hub feed (when configured) merges on top of
//! whatever the public fetch produced. A failed fetch is logged and the
//! cycle continues with partial data; there are no retries within a cycle.

mod hub;
mod public;

pub use hub::HubFeed;
pub use public::PublicFeed;

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::error::FeedError;
use crate::model::VulnerabilityRecord;
use crate::normalize::normalize_all;
use crate::view::DisclosureView;

/// A named source of vulnerability records.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable name, used in logs and error reporting.
    fn name(&self) -> &'static str;

    /// Fetches the source's current record collection. One attempt, no
    /// retries; transport, status, and body-shape failures all surface
    /// as [`FeedError`].
    async fn fetch(&self) -> Result<Vec<VulnerabilityRecord>, FeedError>;
}

/// Builds the shared HTTP client. The timeout configured here is the
/// only one applied to feed calls.
pub fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, FeedError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("osvhub/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

#[derive(Deserialize)]
struct FeedBody {
    vulns: Vec<VulnerabilityRecord>,
}

/// Parses a feed response body. A body without a well-formed `vulns`
/// array (missing, null, or not an array) is malformed.
pub(crate) fn parse_feed_body(body: &str) -> Result<Vec<VulnerabilityRecord>, FeedError> {
    let feed: FeedBody = serde_json::from_str(body)?;
    Ok(feed.vulns)
}

/// Runs one fetch cycle against the view.
///
/// The public fetch always runs first; its failure only moves the view to
/// the error state when no data has been set yet. The hub fetch runs
/// afterwards when a hub is configured, merging on top of the public rows
/// without ever replacing them wholesale. Hub failure flags the view but
/// leaves public data on display.
pub async fn refresh(view: &mut DisclosureView, public: &PublicFeed, hub: Option<&HubFeed>) {
    match public.fetch().await {
        Ok(records) => view.load(normalize_all(&records)),
        Err(e) => {
            warn!(source = public.name(), error = %e, "feed fetch failed");
            view.fail();
        }
    }

    if let Some(hub) = hub {
        match hub.fetch().await {
            Ok(records) => view.merge(normalize_all(&records)),
            Err(e) => {
                warn!(source = hub.name(), error = %e, "feed fetch failed");
                view.mark_auth_failed();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_body_well_formed() {
        let records = parse_feed_body(r#"{"vulns": [{"id": "OSV-1"}, {"id": "OSV-2"}]}"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "OSV-1");
    }

    #[test]
    fn test_parse_feed_body_empty_collection() {
        let records = parse_feed_body(r#"{"vulns": []}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_feed_body_missing_vulns() {
        assert!(parse_feed_body(r#"{"message": "nope"}"#).is_err());
    }

    #[test]
    fn test_parse_feed_body_null_vulns() {
        assert!(parse_feed_body(r#"{"vulns": null}"#).is_err());
    }

    #[test]
    fn test_parse_feed_body_non_array_vulns() {
        assert!(parse_feed_body(r#"{"vulns": {"OSV-1": {}}}"#).is_err());
    }

    #[test]
    fn test_parse_feed_body_not_json() {
        assert!(parse_feed_body("<html>503</html>").is_err());
    }
}
