use async_trait::async_trait;
use tracing::debug;

use crate::error::FeedError;
use crate::model::VulnerabilityRecord;

/// The unauthenticated feed every hub publishes.
pub struct PublicFeed {
    client: reqwest::Client,
    url: String,
}

impl PublicFeed {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl super::FeedSource for PublicFeed {
    fn name(&self) -> &'static str {
        "public feed"
    }

    async fn fetch(&self) -> Result<Vec<VulnerabilityRecord>, FeedError> {
        debug!(url = %self.url, "fetching public feed");

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Http {
                status: response.status().as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await?;
        super::parse_feed_body(&body)
    }
}
