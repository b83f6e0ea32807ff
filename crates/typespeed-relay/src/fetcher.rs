//! Upstream typing-speed API client.
//!
//! One authenticated GET per call. The response status is not inspected;
//! the body alone decides between a value, `DecodeError`, and
//! `MissingField`. No retry and no timeout beyond the transport default.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, instrument};

use typespeed_core::error::{Result, TypeSpeedError};
use typespeed_core::extract_wpm;

use crate::config::UpstreamSection;

/// Anything that can produce the next metric value.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn fetch(&self) -> Result<String>;
}

pub struct ApiFetcher {
    url: String,
    authorization: String,
    http: reqwest::Client,
}

impl ApiFetcher {
    pub fn new(cfg: &UpstreamSection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("typespeed-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TypeSpeedError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            url: cfg.url.clone(),
            authorization: cfg.authorization(),
            http,
        })
    }
}

#[async_trait]
impl MetricSource for ApiFetcher {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<String> {
        let response = self
            .http
            .get(&self.url)
            .header(AUTHORIZATION, &self.authorization)
            .send()
            .await
            .map_err(|e| TypeSpeedError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TypeSpeedError::RequestFailed(format!("reading body: {e}")))?;
        debug!(%status, len = body.len(), "upstream responded");

        extract_wpm(&body)
    }
}
