// src/ingest/providers/workday.rs
//! Best-effort Workday parser for the static HTML snapshot. Most Workday
//! boards render client-side, so an empty result is normal; configure such
//! sources as `page_only` instead.

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{absolute_url, anchor_parts, base_job, extract_job_type};
use crate::config::SourceConfig;
use crate::ingest::types::{PageFetcher, SourceParser};
use crate::model::Job;

static JOB_LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href*='job']").unwrap());
static CAREER_LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href*='careers']").unwrap());

pub fn parse_html(source: &SourceConfig, html: &str) -> Vec<Job> {
    let doc = Html::parse_document(html);
    doc.select(&JOB_LINKS)
        .chain(doc.select(&CAREER_LINKS))
        .filter_map(|a| anchor_parts(&a))
        .map(|(title, href)| Job {
            job_type: extract_job_type(&title).to_string(),
            url: absolute_url(&source.url, &href),
            title,
            ..base_job(source)
        })
        .collect()
}

pub struct WorkdayParser;

#[async_trait]
impl SourceParser for WorkdayParser {
    async fn parse(&self, source: &SourceConfig, fetcher: &dyn PageFetcher) -> Result<Vec<Job>> {
        let html = fetcher.get_text(&source.url).await?;
        let jobs = parse_html(source, &html);
        tracing::info!(source = %source.id, count = jobs.len(), "workday parser extracted candidates");
        Ok(jobs)
    }

    fn name(&self) -> &'static str {
        "workday"
    }
}
