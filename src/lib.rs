// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod state;

// ---- Re-exports for stable public API ----
pub use crate::config::{HarvestSettings, SourceConfig};
pub use crate::filter::KeywordSets;
pub use crate::ingest::providers::ParserRegistry;
pub use crate::ingest::{HarvestReport, Harvester, SourceStats};
pub use crate::model::Job;
pub use crate::state::DiscoveryState;

use anyhow::{Context, Result};
use tracing::info;

/// One complete harvest: load sources and state, run, write both CSVs, save state.
///
/// State is saved last, so a crash mid-run leaves the previous state untouched
/// and the affected postings are reported as new again next time.
pub async fn run(settings: &HarvestSettings) -> Result<HarvestReport> {
    let sources = config::load_sources_from(&settings.sources_path)?;
    let mut state = DiscoveryState::load(&settings.state_path)?;
    info!(
        sources = sources.len(),
        seen = state.len(),
        "loaded sources and discovery state"
    );

    let fetcher = ingest::fetch::HttpFetcher::from_settings(settings)?;
    let registry = ParserRegistry::builtin();
    let keywords = KeywordSets::v1();
    let harvester = Harvester {
        registry: &registry,
        fetcher: &fetcher,
        keywords: &keywords,
        detail_delay: settings.detail_delay,
    };

    let report = harvester.run_once(&sources, &mut state).await;

    export::write_jobs_csv(&settings.latest_csv_path(), &report.all)
        .context("writing latest report")?;
    export::write_jobs_csv(&settings.new_csv_path(), &report.new)
        .context("writing new-postings report")?;
    state.save(&settings.state_path)?;

    info!(
        latest = report.all.len(),
        new = report.new.len(),
        started_at = %report.started_at,
        "Done"
    );
    Ok(report)
}
