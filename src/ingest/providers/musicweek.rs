// src/ingest/providers/musicweek.rs
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{absolute_url, anchor_parts, base_job};
use crate::config::SourceConfig;
use crate::ingest::types::{PageFetcher, SourceParser};
use crate::model::Job;

static LISTING_LINKS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [".jobs-listing a[href]", "article a[href]", "a[href*='job']"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

/// Listing selectors are tried in order; overlaps are left to the identity dedup.
pub fn parse_html(source: &SourceConfig, html: &str) -> Vec<Job> {
    let doc = Html::parse_document(html);
    let mut jobs = Vec::new();
    for sel in LISTING_LINKS.iter() {
        for a in doc.select(sel) {
            let Some((title, href)) = anchor_parts(&a) else {
                continue;
            };
            jobs.push(Job {
                url: absolute_url(&source.url, &href),
                title,
                ..base_job(source)
            });
        }
    }
    jobs
}

pub struct MusicWeekParser;

#[async_trait]
impl SourceParser for MusicWeekParser {
    async fn parse(&self, source: &SourceConfig, fetcher: &dyn PageFetcher) -> Result<Vec<Job>> {
        let html = fetcher.get_text(&source.url).await?;
        let jobs = parse_html(source, &html);
        tracing::info!(source = %source.id, count = jobs.len(), "musicweek parser extracted candidates");
        Ok(jobs)
    }

    fn name(&self) -> &'static str {
        "musicweek"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserKind;

    #[test]
    fn overlapping_selectors_yield_repeats() {
        let src = SourceConfig::new("musicweek_jobs", "Music Week", ParserKind::MusicWeek, "https://mw.test/jobs");
        let html = r#"
            <div class="jobs-listing"><a href="/job/1">Licensing Coordinator</a></div>
            <a href="/about">About</a>
        "#;
        let jobs = parse_html(&src, html);
        // matched by `.jobs-listing a` and by `a[href*='job']`
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.url == "https://mw.test/job/1"));
    }
}
