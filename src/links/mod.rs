// File Link Issuer and Link Validator
//
// Lesson documents are hosted by a messaging-bot file API. A stored file
// handle can be exchanged for a download URL at any time; the URL itself
// dies after roughly an hour, and the service gives no way to ask when.

pub mod bot;
pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub use bot::BotFileApi;
pub use http::HttpLinkValidator;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API error: {description}")]
    Api { description: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A freshly issued download link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuedLink {
    pub url: String,
    /// Issue time plus the configured TTL. Advisory only: the link may stop
    /// working earlier.
    pub expires_at: DateTime<Utc>,
    pub file_size: Option<u64>,
    pub file_path: String,
}

/// Outcome of a reachability check
///
/// Any 2xx counts as valid. The bot service has been seen answering 2xx
/// for expired links, so `valid` can be a false positive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkCheck {
    pub valid: bool,
    pub status: Option<u16>,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub error: Option<String>,
}

impl LinkCheck {
    pub fn reachable(status: u16, content_length: Option<u64>, content_type: Option<String>) -> Self {
        Self {
            valid: true,
            status: Some(status),
            content_length,
            content_type,
            error: None,
        }
    }

    pub fn unreachable(status: Option<u16>, error: impl Into<String>) -> Self {
        Self {
            valid: false,
            status,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait LinkIssuer: Send + Sync {
    /// Exchange a file handle for a time-limited download URL
    async fn issue(&self, handle: &str) -> Result<IssuedLink, LinkError>;
}

#[async_trait]
pub trait LinkValidator: Send + Sync {
    /// Never fails: network errors are reported as an invalid link
    async fn check(&self, url: &str) -> LinkCheck;
}

/// Issuer used when no bot token is configured: every request fails with
/// `LinkError::Config`. Validation does not need the token and is served by
/// `HttpLinkValidator` instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLinks;

#[async_trait]
impl LinkIssuer for DisabledLinks {
    async fn issue(&self, _handle: &str) -> Result<IssuedLink, LinkError> {
        Err(LinkError::Config("BOT_TOKEN is not set".to_string()))
    }
}
