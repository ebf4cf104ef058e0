// src/ingest/mod.rs
pub mod detail;
pub mod fetch;
pub mod providers;
pub mod types;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::time::Duration;

use crate::config::{ParserKind, SourceConfig};
use crate::filter::{assess, is_allowed, matches_keywords, KeywordSets, Verdict};
use crate::ingest::providers::ParserRegistry;
use crate::ingest::types::PageFetcher;
use crate::model::Job;
use crate::state::DiscoveryState;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("harvest_candidates_total", "Candidates returned by source parsers.");
        describe_counter!("harvest_kept_total", "Candidates kept after all filters.");
        describe_counter!(
            "harvest_dropped_non_job_total",
            "Candidates dropped by pattern, keyword or detail-page gates."
        );
        describe_counter!(
            "harvest_dropped_too_senior_total",
            "Candidates dropped by the seniority classifier."
        );
        describe_counter!("harvest_new_total", "Kept candidates not seen in earlier runs.");
        describe_counter!(
            "harvest_source_errors_total",
            "Sources whose parser failed or whose parser type is unknown."
        );
        describe_counter!("harvest_http_errors_total", "Failed HTTP attempts, retries included.");
    });
}

/// Normalize text: decode entities, unify curly quotes, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    let unified = decoded
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");
    unified.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep the first job per identity key (URL, else fingerprint).
pub fn dedupe_by_identity(jobs: Vec<Job>) -> Vec<Job> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|j| {
            let key = j.identity_key();
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

/// Per-source counters; also the fields of the per-source log line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub source: String,
    pub fetched_candidates: usize,
    pub kept_after_filter: usize,
    pub dropped_as_non_job: usize,
    pub dropped_as_too_senior: usize,
    pub details_fetched_count: usize,
    pub location_extracted_count: usize,
    pub new_count: usize,
    pub failed: bool,
}

impl SourceStats {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..Default::default()
        }
    }

    fn log(&self) {
        tracing::info!(
            target: "harvest",
            source = %self.source,
            fetched_candidates = self.fetched_candidates,
            kept_after_filter = self.kept_after_filter,
            dropped_as_non_job = self.dropped_as_non_job,
            dropped_as_too_senior = self.dropped_as_too_senior,
            details_fetched_count = self.details_fetched_count,
            location_extracted_count = self.location_extracted_count,
            new_count = self.new_count,
            "source done"
        );
    }
}

/// Synchronous filter chain: patterns → keywords → seniority.
/// Returns survivors in input order and updates the drop counters.
pub fn filter_candidates(
    candidates: Vec<Job>,
    source: &SourceConfig,
    parser: ParserKind,
    keywords: &KeywordSets,
    stats: &mut SourceStats,
) -> Vec<Job> {
    let mut kept = Vec::with_capacity(candidates.len());
    for job in candidates {
        if !is_allowed(&job, source, keywords) || !matches_keywords(&job, parser, keywords) {
            stats.dropped_as_non_job += 1;
            continue;
        }
        let a = assess(&job, source, keywords);
        match a.verdict {
            Verdict::Kept => kept.push(job),
            Verdict::TooSenior => {
                tracing::debug!(title = %job.title, domain = a.domain_matches, strong = a.strong_domain_matches, "too senior");
                stats.dropped_as_too_senior += 1;
            }
            Verdict::NonJob => stats.dropped_as_non_job += 1,
        }
    }
    kept
}

/// Result of one harvest over all sources.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub started_at: DateTime<Utc>,
    /// Every kept posting, deduplicated by identity.
    pub all: Vec<Job>,
    /// Kept postings not seen in any earlier run, deduplicated by identity.
    pub new: Vec<Job>,
    pub stats: Vec<SourceStats>,
}

/// Everything a run needs besides the sources and the state.
pub struct Harvester<'a> {
    pub registry: &'a ParserRegistry,
    pub fetcher: &'a dyn PageFetcher,
    pub keywords: &'a KeywordSets,
    /// Politeness delay before each detail-page fetch.
    pub detail_delay: Duration,
}

impl<'a> Harvester<'a> {
    /// Process sources one at a time, in configured order. A failing source
    /// yields zero candidates and never aborts the run.
    pub async fn run_once(
        &self,
        sources: &[SourceConfig],
        state: &mut DiscoveryState,
    ) -> HarvestReport {
        ensure_metrics_described();
        let started_at = Utc::now();

        let mut all = Vec::new();
        let mut new = Vec::new();
        let mut stats = Vec::with_capacity(sources.len());

        for source in sources {
            let Some(kind) = source.parser_kind() else {
                tracing::warn!(source = %source.id, parser_type = %source.parser_type, "unknown parser_type, skipping source");
                counter!("harvest_source_errors_total").increment(1);
                continue;
            };
            let (kept, fresh, s) = self.process_source(source, kind, state).await;
            all.extend(kept);
            new.extend(fresh);
            stats.push(s);
        }

        let all = dedupe_by_identity(all);
        let new = dedupe_by_identity(new);
        tracing::info!(target: "harvest", latest = all.len(), new = new.len(), "harvest finished");

        HarvestReport {
            started_at,
            all,
            new,
            stats,
        }
    }

    async fn process_source(
        &self,
        source: &SourceConfig,
        kind: ParserKind,
        state: &mut DiscoveryState,
    ) -> (Vec<Job>, Vec<Job>, SourceStats) {
        let mut stats = SourceStats::new(&source.id);

        let parsed = match self.registry.get(kind) {
            Some(parser) => match parser.parse(source, self.fetcher).await {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(source = %source.id, parser = parser.name(), error = %format!("{e:#}"), "source failed");
                    counter!("harvest_source_errors_total").increment(1);
                    stats.failed = true;
                    Vec::new()
                }
            },
            None => {
                tracing::warn!(source = %source.id, parser_type = %kind, "no parser registered, skipping source");
                counter!("harvest_source_errors_total").increment(1);
                stats.failed = true;
                Vec::new()
            }
        };
        stats.fetched_candidates = parsed.len();

        let mut kept = filter_candidates(parsed, source, kind, self.keywords, &mut stats);

        if source.should_fetch_details() {
            kept = self.enrich_all(kept, source, &mut stats).await;
        }

        stats.kept_after_filter = kept.len();

        let fresh: Vec<Job> = kept.iter().filter(|j| state.is_new(j)).cloned().collect();
        stats.new_count = fresh.len();

        counter!("harvest_candidates_total").increment(stats.fetched_candidates as u64);
        counter!("harvest_kept_total").increment(stats.kept_after_filter as u64);
        counter!("harvest_dropped_non_job_total").increment(stats.dropped_as_non_job as u64);
        counter!("harvest_dropped_too_senior_total").increment(stats.dropped_as_too_senior as u64);
        counter!("harvest_new_total").increment(stats.new_count as u64);
        stats.log();

        (kept, fresh, stats)
    }

    /// Detail enrichment + non-job page gate. URL-less candidates pass through.
    /// A location counts as extracted only when the detail page filled an empty city.
    async fn enrich_all(
        &self,
        jobs: Vec<Job>,
        source: &SourceConfig,
        stats: &mut SourceStats,
    ) -> Vec<Job> {
        let mut out = Vec::with_capacity(jobs.len());
        for mut job in jobs {
            if job.url.trim().is_empty() {
                out.push(job);
                continue;
            }
            if !self.detail_delay.is_zero() {
                tokio::time::sleep(self.detail_delay).await;
            }
            let outcome = detail::enrich(&job, self.fetcher, source, self.keywords).await;
            if outcome.fetched {
                stats.details_fetched_count += 1;
            }
            if !outcome.is_job_page {
                stats.dropped_as_non_job += 1;
                continue;
            }
            if job.apply_patch(outcome.patch) {
                stats.location_extracted_count += 1;
            }
            out.push(job);
        }
        out
    }
}
