use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::BotConfig;
use crate::links::{HttpLinkValidator, IssuedLink, LinkCheck, LinkError, LinkIssuer, LinkValidator};

/// `getFile` response envelope
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<FileInfo>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    file_path: String,
    #[serde(default)]
    file_size: Option<u64>,
}

/// Client for the bot file API (Telegram-style)
///
/// `GET {base}/bot{token}/getFile?file_id=...` resolves a handle to a file
/// path; the file is then served from `{base}/file/bot{token}/{path}`.
#[derive(Clone)]
pub struct BotFileApi {
    client: Client,
    api_base: String,
    token: String,
    link_ttl: Duration,
    validator: HttpLinkValidator,
}

impl BotFileApi {
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
        link_ttl: Duration,
    ) -> Result<Self, LinkError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(LinkError::Config("bot token must not be empty".to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            validator: HttpLinkValidator::with_client(client.clone()),
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
            link_ttl,
        })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self, LinkError> {
        let token = config
            .token
            .as_deref()
            .ok_or_else(|| LinkError::Config("BOT_TOKEN is not set".to_string()))?;
        Self::new(&config.api_base, token, config.http_timeout(), config.link_ttl())
    }

    fn download_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_base, self.token, file_path)
    }

    async fn file_info(&self, handle: &str) -> Result<FileInfo, LinkError> {
        let endpoint = format!("{}/bot{}/getFile", self.api_base, self.token);
        let envelope: ApiEnvelope = self
            .client
            .get(&endpoint)
            .query(&[("file_id", handle)])
            .send()
            .await?
            .json()
            .await?;

        match envelope {
            ApiEnvelope { ok: true, result: Some(info), .. } => Ok(info),
            ApiEnvelope { description, .. } => {
                let description = description.unwrap_or_else(|| "Failed to get file info".to_string());
                error!("getFile failed for handle {}: {}", handle, description);
                Err(LinkError::Api { description })
            }
        }
    }

    /// Fetch the file behind a handle
    pub async fn download(&self, handle: &str) -> Result<Vec<u8>, LinkError> {
        let info = self.file_info(handle).await?;
        let response = self.client.get(self.download_url(&info.file_path)).send().await?;
        if !response.status().is_success() {
            return Err(LinkError::Api {
                description: format!("download failed with status {}", response.status()),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl LinkIssuer for BotFileApi {
    async fn issue(&self, handle: &str) -> Result<IssuedLink, LinkError> {
        let info = self.file_info(handle).await?;
        let ttl = ChronoDuration::from_std(self.link_ttl)
            .map_err(|e| LinkError::Config(format!("invalid link TTL: {}", e)))?;
        debug!("Issued download link for handle {}", handle);
        Ok(IssuedLink {
            url: self.download_url(&info.file_path),
            expires_at: Utc::now() + ttl,
            file_size: info.file_size,
            file_path: info.file_path,
        })
    }
}

#[async_trait]
impl LinkValidator for BotFileApi {
    async fn check(&self, url: &str) -> LinkCheck {
        self.validator.check(url).await
    }
}
