//! Core data types for disclosures and display rows.
//!
//! This module contains the fundamental types used throughout osvhub:
//!
//! - [`VulnerabilityRecord`] - A raw OSV-shaped disclosure from a feed
//! - [`DisclosureRow`] - The same disclosure flattened for display
//! - [`Severity`] - Severity resolved from the feed's score string
//! - [`SeverityTier`] - The total severity-to-tier mapping
//!
//! # Example
//!
//! ```
//! use osvhub::model::{Severity, SeverityTier};
//!
//! let severity = Severity::from_score("9.8");
//! assert_eq!(severity.tier(), SeverityTier::Critical);
//!
//! // Unclassifiable input never errors.
//! assert_eq!(Severity::from_score("n/a").tier(), SeverityTier::Neutral);
//! ```

mod record;
mod row;

pub use record::*;
pub use row::*;
