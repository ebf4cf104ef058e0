// src/ingest/types.rs
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::SourceConfig;
use crate::model::Job;

/// Anything that can turn a URL into page text.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// One parser per site family. Errors are caught by the run loop and the
/// source then yields zero candidates.
#[async_trait::async_trait]
pub trait SourceParser: Send + Sync {
    async fn parse(&self, source: &SourceConfig, fetcher: &dyn PageFetcher) -> Result<Vec<Job>>;
    fn name(&self) -> &'static str;
}

// --- Test helper ---
/// In-memory fetcher: serves canned HTML by exact URL and records every request.
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl PageFetcher for FixtureFetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("no fixture for {url}"))
    }
}
