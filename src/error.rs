//! Error types for the feed layer.
//!
//! Feed errors are recoverable by policy: callers log them and degrade to
//! an empty or partial collection instead of propagating a crash into the
//! rendering path.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Transport-level failure (DNS, TLS, connection, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body did not contain a well-formed `vulns` collection.
    #[error("malformed feed body: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The login endpoint answered without a redirect URL.
    #[error("login response did not include a redirect URL")]
    MissingRedirect,
}

impl FeedError {
    /// True for failures of the authentication handshake rather than of
    /// data retrieval.
    pub fn is_auth(&self) -> bool {
        matches!(self, FeedError::MissingRedirect)
    }
}
