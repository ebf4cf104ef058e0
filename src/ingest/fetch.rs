// src/ingest/fetch.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use std::time::Duration;

use crate::config::HarvestSettings;
use crate::ingest::types::PageFetcher;

pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/124.0 Safari/537.36 JobSearchBot/1.0";

/// reqwest-backed fetcher with a bounded retry loop.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    retries: u32,
    backoff: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, retries: u32, backoff: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            retries: retries.max(1),
            backoff,
        })
    }

    pub fn from_settings(s: &HarvestSettings) -> Result<Self> {
        Self::new(s.http_timeout, s.http_retries, s.http_backoff)
    }

    async fn get_once(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("http get")?
            .error_for_status()
            .context("http status")?;
        resp.text().await.context("http .text()")
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::warn!(
                        error = %format!("{e:#}"),
                        attempt,
                        retries = self.retries,
                        %url,
                        "request failed"
                    );
                    counter!("harvest_http_errors_total").increment(1);
                    if attempt >= self.retries {
                        return Err(e).with_context(|| format!("fetching {url}"));
                    }
                    tokio::time::sleep(self.backoff * attempt).await;
                    attempt += 1;
                }
            }
        }
    }
}
