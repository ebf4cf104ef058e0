// src/ingest/providers/page_only.rs
use anyhow::Result;
use async_trait::async_trait;

use super::base_job;
use crate::config::SourceConfig;
use crate::ingest::types::{PageFetcher, SourceParser};
use crate::model::Job;

/// No fetch: the careers page itself becomes one untitled placeholder.
pub struct PageOnlyParser;

pub fn placeholder(source: &SourceConfig) -> Job {
    Job {
        url: source.url.clone(),
        ..base_job(source)
    }
}

#[async_trait]
impl SourceParser for PageOnlyParser {
    async fn parse(&self, source: &SourceConfig, _fetcher: &dyn PageFetcher) -> Result<Vec<Job>> {
        Ok(vec![placeholder(source)])
    }

    fn name(&self) -> &'static str {
        "page_only"
    }
}
