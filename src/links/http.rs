use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BotConfig;
use crate::links::{LinkCheck, LinkError, LinkValidator};

/// Reachability check by `HEAD` request. Needs no bot credential, so it
/// stays available when issuing is disabled.
#[derive(Debug, Clone)]
pub struct HttpLinkValidator {
    client: Client,
}

impl HttpLinkValidator {
    pub fn new(timeout: Duration) -> Result<Self, LinkError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    pub fn from_config(config: &BotConfig) -> Result<Self, LinkError> {
        Self::new(config.http_timeout())
    }

    /// Share an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkValidator for HttpLinkValidator {
    async fn check(&self, url: &str) -> LinkCheck {
        match self.client.head(url).send().await {
            Ok(response) if response.status().is_success() => {
                let headers = response.headers();
                let content_length = headers
                    .get(CONTENT_LENGTH)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());
                let content_type = headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                LinkCheck::reachable(response.status().as_u16(), content_length, content_type)
            }
            Ok(response) => {
                debug!("Link check returned {}", response.status());
                LinkCheck::unreachable(Some(response.status().as_u16()), "Link not reachable")
            }
            Err(e) => {
                warn!("Link check failed: {}", e);
                LinkCheck::unreachable(None, e.to_string())
            }
        }
    }
}
