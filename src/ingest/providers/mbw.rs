// src/ingest/providers/mbw.rs
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{absolute_url, anchor_parts, base_job, element_text};
use crate::config::SourceConfig;
use crate::ingest::types::{PageFetcher, SourceParser};
use crate::model::Job;

static CARDS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["article", ".job", "li"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());

/// Card-based listing: first link in each card, posting date from `<time>`.
pub fn parse_html(source: &SourceConfig, html: &str) -> Vec<Job> {
    let doc = Html::parse_document(html);
    let mut jobs = Vec::new();

    for sel in CARDS.iter() {
        for card in doc.select(sel) {
            let Some(a) = card.select(&ANCHOR).next() else {
                continue;
            };
            let Some((title, href)) = anchor_parts(&a) else {
                continue;
            };
            let posting_date = card
                .select(&TIME)
                .next()
                .map(|t| element_text(&t))
                .unwrap_or_default();
            jobs.push(Job {
                posting_date,
                url: absolute_url(&source.url, &href),
                title,
                ..base_job(source)
            });
        }
    }
    jobs
}

pub struct MbwParser;

#[async_trait]
impl SourceParser for MbwParser {
    async fn parse(&self, source: &SourceConfig, fetcher: &dyn PageFetcher) -> Result<Vec<Job>> {
        let html = fetcher.get_text(&source.url).await?;
        let jobs = parse_html(source, &html);
        tracing::info!(source = %source.id, count = jobs.len(), "mbw parser extracted candidates");
        Ok(jobs)
    }

    fn name(&self) -> &'static str {
        "mbw"
    }
}
