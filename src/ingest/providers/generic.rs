// src/ingest/providers/generic.rs
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{absolute_url, anchor_parts, base_job, extract_job_type};
use crate::config::SourceConfig;
use crate::ingest::types::{PageFetcher, SourceParser};
use crate::model::Job;

static ANCHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Every titled link on the page is a candidate; the filters sort them out.
pub fn parse_html(source: &SourceConfig, html: &str) -> Vec<Job> {
    let doc = Html::parse_document(html);
    doc.select(&ANCHORS)
        .filter_map(|a| anchor_parts(&a))
        .map(|(title, href)| Job {
            job_type: extract_job_type(&title).to_string(),
            url: absolute_url(&source.url, &href),
            title,
            ..base_job(source)
        })
        .collect()
}

pub struct GenericParser;

#[async_trait]
impl SourceParser for GenericParser {
    async fn parse(&self, source: &SourceConfig, fetcher: &dyn PageFetcher) -> Result<Vec<Job>> {
        let html = fetcher.get_text(&source.url).await?;
        let jobs = parse_html(source, &html);
        tracing::info!(source = %source.id, count = jobs.len(), "generic parser extracted candidates");
        Ok(jobs)
    }

    fn name(&self) -> &'static str {
        "generic"
    }
}
