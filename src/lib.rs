pub mod audits;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod output;
pub mod view;

pub use audits::AuditEntry;
pub use config::Config;
pub use error::FeedError;
pub use feed::{FeedSource, HubFeed, PublicFeed};
pub use model::{DisclosureRow, Severity, SeverityTier, VulnerabilityRecord};
pub use view::{DisclosureView, ViewState};
