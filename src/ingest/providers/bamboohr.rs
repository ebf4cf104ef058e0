// src/ingest/providers/bamboohr.rs
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use super::{absolute_url, anchor_parts, base_job, element_text, extract_job_type};
use crate::config::SourceConfig;
use crate::ingest::normalize_text;
use crate::ingest::types::{PageFetcher, SourceParser};
use crate::model::Job;

static CAREER_LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href*='careers']").unwrap());
static JOB_LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href*='job']").unwrap());
static OPENING_BLOB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)opening\s*:\s*(\{.*?\})\s*,\s*departments").unwrap());

#[derive(Debug, Deserialize)]
struct Opening {
    #[serde(default, rename = "jobOpeningName")]
    job_opening_name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    location: String,
}

fn parent_mentions_remote(a: &ElementRef<'_>) -> bool {
    a.parent()
        .and_then(ElementRef::wrap)
        .map(|p| element_text(&p).to_lowercase().contains("remote"))
        .unwrap_or(false)
}

/// Rendered anchors first, then any embedded `opening: {...}, departments` JSON blobs.
pub fn parse_html(source: &SourceConfig, html: &str) -> Vec<Job> {
    let mut jobs = Vec::new();

    let doc = Html::parse_document(html);
    for a in doc.select(&CAREER_LINKS).chain(doc.select(&JOB_LINKS)) {
        let Some((title, href)) = anchor_parts(&a) else {
            continue;
        };
        let city = if parent_mentions_remote(&a) { "Remote" } else { "" };
        jobs.push(Job {
            base_city: city.to_string(),
            job_type: extract_job_type(&title).to_string(),
            url: absolute_url(&source.url, &href),
            title,
            ..base_job(source)
        });
    }

    for caps in OPENING_BLOB.captures_iter(html) {
        let Ok(opening) = serde_json::from_str::<Opening>(&caps[1]) else {
            continue;
        };
        let title = normalize_text(&opening.job_opening_name);
        let href = normalize_text(&opening.url);
        if title.is_empty() || href.is_empty() {
            continue;
        }
        jobs.push(Job {
            base_city: normalize_text(&opening.location),
            job_type: extract_job_type(&title).to_string(),
            url: absolute_url(&source.url, &href),
            title,
            ..base_job(source)
        });
    }

    jobs
}

pub struct BambooHrParser;

#[async_trait]
impl SourceParser for BambooHrParser {
    async fn parse(&self, source: &SourceConfig, fetcher: &dyn PageFetcher) -> Result<Vec<Job>> {
        let html = fetcher.get_text(&source.url).await?;
        let jobs = parse_html(source, &html);
        tracing::info!(source = %source.id, count = jobs.len(), "bamboohr parser extracted candidates");
        Ok(jobs)
    }

    fn name(&self) -> &'static str {
        "bamboohr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserKind;

    fn src() -> SourceConfig {
        SourceConfig::new("acme", "Acme", ParserKind::BambooHr, "https://acme.bamboohr.test/careers")
    }

    #[test]
    fn remote_parent_sets_city() {
        let html = r#"<ul>
            <li><a href="/careers/12">Rights Coordinator</a> <span>Remote, UK</span></li>
            <li><a href="/careers/13">Label Assistant</a> <span>London</span></li>
        </ul>"#;
        let jobs = parse_html(&src(), html);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].base_city, "Remote");
        assert_eq!(jobs[0].url, "https://acme.bamboohr.test/careers/12");
        assert_eq!(jobs[1].base_city, "");
    }

    #[test]
    fn embedded_opening_blob() {
        let html = r#"<script>
            var data = { opening: {"jobOpeningName": "Royalty Intern", "url": "/careers/99", "location": " Leeds "}, departments: [] };
        </script>"#;
        let jobs = parse_html(&src(), html);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Royalty Intern");
        assert_eq!(jobs[0].base_city, "Leeds");
        assert_eq!(jobs[0].job_type, "internship");
    }
}
