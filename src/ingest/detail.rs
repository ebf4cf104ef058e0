// src/ingest/detail.rs
//! Detail-page enrichment: location, responsibilities, skills and contact.
//!
//! Extraction is best-effort and never fails the candidate. The result is a
//! `DetailPatch`; the caller decides how it is applied.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::{BTreeSet, HashSet};

use crate::config::SourceConfig;
use crate::filter::{looks_like_non_job, KeywordSets};
use crate::ingest::normalize_text;
use crate::ingest::providers::element_text;
use crate::ingest::types::PageFetcher;
use crate::model::{DetailPatch, Job};

const RESPONSIBILITY_HEADINGS: &[&str] = &[
    "responsibilities",
    "what you'll do",
    "what you will do",
    "duties",
    "the role",
    "key responsibilities",
];

const REQUIREMENT_HEADINGS: &[&str] = &[
    "requirements",
    "skills",
    "experience",
    "essential",
    "desirable",
    "qualifications",
    "what you'll need",
    "what you will need",
];

const LOCATION_LABELS: &[&str] = &["location", "job location", "based in", "office", "city"];

const HARD_SKILL_KEYWORDS: &[&str] = &[
    "excel",
    "spreadsheet",
    "crm",
    "database",
    "sql",
    "python",
    "analytics",
    "reporting",
    "royalties",
    "royalty",
    "rights",
    "copyright",
    "licensing",
    "distribution",
    "metadata",
    "contracts",
    "invoices",
    "budgeting",
    "finance",
];

const SOFT_SKILL_KEYWORDS: &[&str] = &[
    "communication",
    "stakeholder",
    "detail-oriented",
    "organisation",
    "organized",
    "teamwork",
    "proactive",
    "time management",
    "problem solving",
    "adaptability",
];

/// Page chrome that never carries posting content.
const CHROME_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

const MAX_SIBLINGS: usize = 5;
const MAX_LOCATION_LINES: usize = 220;
const MAX_LOCATION_CHARS: usize = 80;
const MAX_RESPONSIBILITY_CHARS: usize = 1200;
const MAX_FALLBACK_RESPONSIBILITY_CHARS: usize = 800;
const MAX_SKILL_CHARS: usize = 800;
const FALLBACK_BULLETS: usize = 6;

static JSON_LD: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
static LIST_ITEMS: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4, strong, b").unwrap());
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static LOCATION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(location|job location|based in|office|city)\s*[:\-]?\s*").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailOutcome {
    /// The page was downloaded.
    pub fetched: bool,
    /// False only when the downloaded page looks like a non-job page.
    pub is_job_page: bool,
    pub patch: DetailPatch,
}

impl DetailOutcome {
    fn not_fetched() -> Self {
        Self {
            fetched: false,
            is_job_page: true,
            patch: DetailPatch::default(),
        }
    }
}

/// Fetch and extract. A failed fetch keeps the candidate unenriched.
pub async fn enrich(
    job: &Job,
    fetcher: &dyn PageFetcher,
    source: &SourceConfig,
    keywords: &KeywordSets,
) -> DetailOutcome {
    let url = job.url.trim();
    if url.is_empty() {
        return DetailOutcome::not_fetched();
    }
    match fetcher.get_text(url).await {
        Ok(html) => extract_details(job, &html, source, keywords),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), %url, "detail fetch failed");
            DetailOutcome::not_fetched()
        }
    }
}

/// Pure extraction over an already-downloaded page.
pub fn extract_details(
    job: &Job,
    html: &str,
    source: &SourceConfig,
    keywords: &KeywordSets,
) -> DetailOutcome {
    let doc = Html::parse_document(html);
    let lines = visible_lines(&doc);
    let full_text = lines.join("\n");
    let bullets = list_items(&doc);

    if looks_like_non_job(&job.title, &full_text, &bullets, keywords) {
        return DetailOutcome {
            fetched: true,
            is_job_page: false,
            patch: DetailPatch::default(),
        };
    }

    let mut patch = DetailPatch::default();

    let location = location_from_json_ld(&doc)
        .or_else(|| location_from_lines(&lines, &source.location_hints));
    patch.base_city = location;

    let mut resp_lines = heading_block_lines(&doc, RESPONSIBILITY_HEADINGS);
    if resp_lines.is_empty() {
        resp_lines = bullets.iter().take(FALLBACK_BULLETS).cloned().collect();
    }
    if !resp_lines.is_empty() {
        patch.responsibilities = non_empty(join_limited(
            &dedupe_lines(&resp_lines),
            MAX_RESPONSIBILITY_CHARS,
        ));
    } else if !lines.is_empty() {
        patch.responsibilities = non_empty(truncate_chars(
            &normalize_text(&lines.join(" ")),
            MAX_FALLBACK_RESPONSIBILITY_CHARS,
        ));
    }

    let req_lines = heading_block_lines(&doc, REQUIREMENT_HEADINGS);
    let skill_source = if !req_lines.is_empty() {
        &req_lines
    } else if !bullets.is_empty() {
        &bullets
    } else {
        &lines
    };
    let (hard, soft) = split_hard_soft(skill_source);
    let hard = dedupe_lines(&hard);
    let soft = dedupe_lines(&remove_overlap(&soft, &hard));
    patch.hard_skills = non_empty(join_limited(&hard, MAX_SKILL_CHARS));
    patch.soft_skills = non_empty(join_limited(&soft, MAX_SKILL_CHARS));

    let emails: BTreeSet<&str> = EMAIL.find_iter(&full_text).map(|m| m.as_str()).collect();
    if !emails.is_empty() {
        patch.contact = Some(emails.into_iter().collect::<Vec<_>>().join(";"));
    }

    DetailOutcome {
        fetched: true,
        is_job_page: true,
        patch,
    }
}

fn is_chrome(name: &str) -> bool {
    CHROME_TAGS.contains(&name)
}

fn inside_chrome(el: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| is_chrome(a.value().name()))
}

/// Normalized, non-empty text nodes outside page chrome, in document order.
fn visible_lines(doc: &Html) -> Vec<String> {
    fn walk(el: ElementRef<'_>, out: &mut Vec<String>) {
        for child in el.children() {
            match child.value() {
                Node::Text(t) => {
                    let line = normalize_text(t);
                    if !line.is_empty() {
                        out.push(line);
                    }
                }
                Node::Element(e) if is_chrome(e.name()) => {}
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        walk(child_el, out);
                    }
                }
                _ => {}
            }
        }
    }
    let mut out = Vec::new();
    walk(doc.root_element(), &mut out);
    out
}

fn list_items(doc: &Html) -> Vec<String> {
    doc.select(&LIST_ITEMS)
        .filter(|li| !inside_chrome(li))
        .map(|li| element_text(&li))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Lines following the first heading that matches `heading_keywords`.
fn heading_block_lines(doc: &Html, heading_keywords: &[&str]) -> Vec<String> {
    for heading in doc.select(&HEADINGS) {
        if inside_chrome(&heading) {
            continue;
        }
        let heading_text = element_text(&heading).to_lowercase();
        if !heading_keywords.iter().any(|k| heading_text.contains(k)) {
            continue;
        }

        let mut collected = Vec::new();
        for sibling in heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take(MAX_SIBLINGS)
        {
            let name = sibling.value().name();
            if matches!(name, "h1" | "h2" | "h3" | "h4") {
                break;
            }
            for li in sibling.select(&LIST_ITEMS) {
                let line = element_text(&li);
                if !line.is_empty() {
                    collected.push(line);
                }
            }
            if matches!(name, "p" | "div" | "span") {
                let line = element_text(&sibling);
                if !line.is_empty() {
                    collected.push(line);
                }
            }
        }
        if !collected.is_empty() {
            return collected;
        }
    }
    Vec::new()
}

fn location_from_json_ld(doc: &Html) -> Option<String> {
    for node in doc.select(&JSON_LD) {
        let raw = node.text().collect::<String>();
        let Ok(payload) = serde_json::from_str::<serde_json::Value>(raw.trim()) else {
            continue;
        };
        let items = match payload {
            serde_json::Value::Array(v) => v,
            other => vec![other],
        };
        for item in &items {
            let locations = match item.get("jobLocation") {
                Some(serde_json::Value::Array(v)) => v.iter().collect::<Vec<_>>(),
                Some(obj @ serde_json::Value::Object(_)) => vec![obj],
                _ => continue,
            };
            for loc in locations {
                let Some(address) = loc.get("address") else {
                    continue;
                };
                let place = ["addressLocality", "addressRegion"]
                    .iter()
                    .filter_map(|k| address.get(*k).and_then(|v| v.as_str()))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                if !place.is_empty() {
                    return Some(truncate_chars(&place, MAX_LOCATION_CHARS));
                }
            }
        }
    }
    None
}

fn location_from_lines(lines: &[String], hints: &[String]) -> Option<String> {
    let head = &lines[..lines.len().min(MAX_LOCATION_LINES)];
    for (i, line) in head.iter().enumerate() {
        let lowered = line.to_lowercase();
        if lowered.contains("remote") {
            return Some("Remote".to_string());
        }
        if lowered.contains("hybrid") {
            return Some("Hybrid".to_string());
        }
        if LOCATION_LABELS.iter().any(|l| lowered.contains(l)) {
            let cleaned = normalize_text(&LOCATION_PREFIX.replace(line, ""));
            // "Location:" alone in a label cell; the value is the next line.
            let value = if cleaned.is_empty() {
                head.get(i + 1).cloned().unwrap_or_default()
            } else {
                cleaned
            };
            if !value.is_empty() && value.chars().count() <= MAX_LOCATION_CHARS {
                return Some(value);
            }
        }
    }

    for hint in hints {
        let h = hint.to_lowercase();
        if head.iter().any(|l| l.to_lowercase().contains(&h)) {
            return Some(truncate_chars(hint, MAX_LOCATION_CHARS));
        }
    }
    None
}

fn split_hard_soft(lines: &[String]) -> (Vec<String>, Vec<String>) {
    let mut hard = Vec::new();
    let mut soft = Vec::new();
    for line in lines {
        let lowered = line.to_lowercase();
        if HARD_SKILL_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            hard.push(line.clone());
        }
        if SOFT_SKILL_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            soft.push(line.clone());
        }
    }
    (hard, soft)
}

fn dedupe_lines(lines: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for line in lines {
        let norm = normalize_text(line);
        if norm.is_empty() || !seen.insert(norm.to_lowercase()) {
            continue;
        }
        out.push(norm);
    }
    out
}

fn remove_overlap(primary: &[String], secondary: &[String]) -> Vec<String> {
    let keys: HashSet<String> = secondary
        .iter()
        .map(|s| normalize_text(s).to_lowercase())
        .collect();
    primary
        .iter()
        .filter(|p| !keys.contains(&normalize_text(p).to_lowercase()))
        .cloned()
        .collect()
}

fn join_limited(items: &[String], max_chars: usize) -> String {
    truncate_chars(&items.join("\n"), max_chars)
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserKind;

    fn src() -> SourceConfig {
        SourceConfig::new("acme", "Acme", ParserKind::Generic, "https://acme.test")
    }

    fn job(title: &str) -> Job {
        Job {
            title: title.into(),
            url: "https://acme.test/jobs/1".into(),
            ..Default::default()
        }
    }

    const POSTING: &str = r#"<html><head>
        <script type="application/ld+json">
          {"@type": "JobPosting", "jobLocation": {"address": {"addressLocality": "London", "addressRegion": "England"}}}
        </script></head>
        <body>
          <nav><a href="/privacy">Privacy</a> <a href="/terms">Terms</a> <a href="/cookies">Cookies</a></nav>
          <h1>Royalties Assistant</h1>
          <h2>Key Responsibilities</h2>
          <ul>
            <li>Process royalty statements</li>
            <li>Maintain metadata in the rights database</li>
            <li>Process royalty statements</li>
          </ul>
          <h2>Requirements</h2>
          <ul>
            <li>Confident with Excel and reporting</li>
            <li>Strong communication with stakeholders</li>
            <li>Excel reporting with great communication</li>
          </ul>
          <p>To apply, email jobs@acme.test or hr@acme.test.</p>
          <footer>Blog Press Newsletter</footer>
        </body></html>"#;

    #[test]
    fn extracts_fields_from_a_posting() {
        let out = extract_details(&job("Royalties Assistant"), POSTING, &src(), &KeywordSets::v1());
        assert!(out.fetched);
        assert!(out.is_job_page);

        let p = out.patch;
        assert_eq!(p.base_city.as_deref(), Some("London, England"));
        assert_eq!(
            p.responsibilities.as_deref(),
            Some("Process royalty statements\nMaintain metadata in the rights database")
        );
        assert_eq!(
            p.hard_skills.as_deref(),
            Some("Confident with Excel and reporting\nExcel reporting with great communication")
        );
        // the mixed line already went to hard skills
        assert_eq!(p.soft_skills.as_deref(), Some("Strong communication with stakeholders"));
        assert_eq!(p.contact.as_deref(), Some("hr@acme.test;jobs@acme.test"));
    }

    #[test]
    fn boilerplate_page_is_rejected() {
        let html = r#"<body><main>
            <p>Privacy notice</p><p>We use cookies</p><p>Terms of service</p>
            <ul><li>One</li></ul></main></body>"#;
        let out = extract_details(&job("Royalties Assistant"), html, &src(), &KeywordSets::v1());
        assert!(out.fetched);
        assert!(!out.is_job_page);
        assert!(out.patch.is_empty());
    }

    #[test]
    fn location_label_and_hint_fallbacks() {
        let lines: Vec<String> = ["Rights Intern", "Location:", "Manchester"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(location_from_lines(&lines, &[]).as_deref(), Some("Manchester"));

        let lines: Vec<String> = vec!["Work from our Bristol studio".into()];
        let hints = vec!["Bristol".to_string()];
        assert_eq!(location_from_lines(&lines, &hints).as_deref(), Some("Bristol"));

        let lines: Vec<String> = vec!["This role is hybrid".into()];
        assert_eq!(location_from_lines(&lines, &[]).as_deref(), Some("Hybrid"));
    }

    #[test]
    fn bullets_stand_in_for_missing_headings() {
        let html = r#"<body><p>Join our job family</p>
            <ul><li>Prepare licensing contracts</li><li>Be proactive</li></ul></body>"#;
        let out = extract_details(&job("Licensing Coordinator"), html, &src(), &KeywordSets::v1());
        assert_eq!(
            out.patch.responsibilities.as_deref(),
            Some("Prepare licensing contracts\nBe proactive")
        );
        assert_eq!(out.patch.hard_skills.as_deref(), Some("Prepare licensing contracts"));
        assert_eq!(out.patch.soft_skills.as_deref(), Some("Be proactive"));
        assert_eq!(out.patch.base_city, None);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_candidate() {
        let fetcher = crate::ingest::types::FixtureFetcher::new();
        let out = enrich(&job("Royalties Assistant"), &fetcher, &src(), &KeywordSets::v1()).await;
        assert!(!out.fetched);
        assert!(out.is_job_page);
        assert_eq!(fetcher.requested(), vec!["https://acme.test/jobs/1".to_string()]);
    }
}
