use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppResult, SourceError, SourceResult};
use crate::utils::{DecompressionService, UrlUtils};

/// Fetches a URL as text, transparently decompressing the body
///
/// Implemented by the reqwest client below and by test doubles.
#[async_trait]
pub trait TextFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> SourceResult<String>;
}

/// reqwest-backed fetcher with a whole-request timeout and fixed User-Agent
#[derive(Clone)]
pub struct StandardHttpClient {
    client: Client,
}

impl StandardHttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TextFetcher for StandardHttpClient {
    async fn fetch_text(&self, url: &str) -> SourceResult<String> {
        let safe_url = UrlUtils::obfuscate_credentials(url);
        debug!("Fetching text content from: {}", safe_url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SourceError::from_reqwest(&safe_url, &e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::from_reqwest(&safe_url, &e))?;
        debug!("Fetched {} bytes of raw content", bytes.len());

        let decompressed = DecompressionService::decompress(bytes, &safe_url)?;

        // Subscriptions in the wild are not always clean UTF-8
        let content = String::from_utf8_lossy(&decompressed).into_owned();
        debug!("Successfully fetched {} characters of text content", content.len());
        Ok(content)
    }
}
