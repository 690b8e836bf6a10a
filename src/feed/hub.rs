use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::FeedError;
use crate::model::VulnerabilityRecord;

/// The authenticated feed of a hub server.
///
/// Constructed only when a server URL is configured; without one the
/// application runs in public-only mode and this type never exists.
pub struct HubFeed {
    client: reqwest::Client,
    server_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct LoginResponse {
    url: Option<String>,
}

impl HubFeed {
    pub fn new(client: reqwest::Client, server_url: impl Into<String>, token: Option<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            server_url,
            token,
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn vulnerabilities_url(&self) -> String {
        format!("{}/detect/vulnerabilities", self.server_url)
    }

    fn login_url(&self) -> String {
        format!("{}/login", self.server_url)
    }

    /// Starts the login handshake and returns the redirect URL the hub
    /// wants the user sent to. Completing the login happens outside this
    /// process; the resulting credential comes back via configuration.
    pub async fn login(&self) -> Result<String, FeedError> {
        let url = self.login_url();
        debug!(url = %url, "requesting login redirect");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Http {
                status: response.status().as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let login: LoginResponse = serde_json::from_str(&body)?;
        login
            .url
            .filter(|redirect| !redirect.is_empty())
            .ok_or(FeedError::MissingRedirect)
    }
}

#[async_trait]
impl super::FeedSource for HubFeed {
    fn name(&self) -> &'static str {
        "hub feed"
    }

    async fn fetch(&self) -> Result<Vec<VulnerabilityRecord>, FeedError> {
        let url = self.vulnerabilities_url();
        debug!(url = %url, "fetching hub feed");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Http {
                status: response.status().as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        super::parse_feed_body(&body)
    }
}
