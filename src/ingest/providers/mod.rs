// src/ingest/providers/mod.rs
//! Site-family parsers. Each one exposes a pure `parse_html` plus a
//! `SourceParser` impl that fetches the listing page first.

pub mod bamboohr;
pub mod generic;
pub mod mbw;
pub mod musicweek;
pub mod page_only;
pub mod workday;

use scraper::ElementRef;
use std::collections::HashMap;

use crate::config::{ParserKind, SourceConfig};
use crate::ingest::normalize_text;
use crate::ingest::types::SourceParser;
use crate::model::Job;

/// Lookup table from parser kind to implementation.
pub struct ParserRegistry {
    parsers: HashMap<ParserKind, Box<dyn SourceParser>>,
}

impl ParserRegistry {
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// All parsers shipped with the crate.
    pub fn builtin() -> Self {
        Self::empty()
            .with(ParserKind::Generic, generic::GenericParser)
            .with(ParserKind::BambooHr, bamboohr::BambooHrParser)
            .with(ParserKind::Mbw, mbw::MbwParser)
            .with(ParserKind::MusicWeek, musicweek::MusicWeekParser)
            .with(ParserKind::Workday, workday::WorkdayParser)
            .with(ParserKind::PageOnly, page_only::PageOnlyParser)
    }

    pub fn with<P: SourceParser + 'static>(mut self, kind: ParserKind, parser: P) -> Self {
        self.parsers.insert(kind, Box::new(parser));
        self
    }

    pub fn get(&self, kind: ParserKind) -> Option<&dyn SourceParser> {
        self.parsers.get(&kind).map(|p| p.as_ref())
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Listing-level fields every parser copies from the source.
pub(crate) fn base_job(source: &SourceConfig) -> Job {
    Job {
        base_country: source.default_country.clone(),
        company: source.name.clone(),
        channel: source.channel.clone(),
        ..Default::default()
    }
}

/// Resolve `href` against the page URL. Unresolvable links come back as-is.
pub(crate) fn absolute_url(base: &str, href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }
    url::Url::parse(base)
        .and_then(|b| b.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    normalize_text(&el.text().collect::<Vec<_>>().join(" "))
}

/// `(title, href)` of an anchor, or `None` if either is blank.
pub(crate) fn anchor_parts(a: &ElementRef<'_>) -> Option<(String, String)> {
    let title = element_text(a);
    let href = normalize_text(a.value().attr("href").unwrap_or_default());
    if title.is_empty() || href.is_empty() {
        return None;
    }
    Some((title, href))
}

pub fn extract_job_type(text: &str) -> &'static str {
    let t = text.to_lowercase();
    if t.contains("intern") {
        "internship"
    } else if t.contains("part-time") || t.contains("part time") {
        "part-time"
    } else if t.contains("full-time") || t.contains("full time") {
        "full-time"
    } else if t.contains("contract") {
        "contract"
    } else {
        ""
    }
}
