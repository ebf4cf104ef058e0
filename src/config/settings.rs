// src/config/settings.rs
use std::path::PathBuf;
use std::time::Duration;

// --- env names & defaults ---
pub const ENV_SOURCES_PATH: &str = "HARVEST_SOURCES_PATH";
pub const ENV_STATE_PATH: &str = "HARVEST_STATE_PATH";
pub const ENV_OUTPUT_DIR: &str = "HARVEST_OUTPUT_DIR";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HARVEST_HTTP_TIMEOUT_SECS";
pub const ENV_HTTP_RETRIES: &str = "HARVEST_HTTP_RETRIES";
pub const ENV_HTTP_BACKOFF_MS: &str = "HARVEST_HTTP_BACKOFF_MS";
pub const ENV_DETAIL_DELAY_MS: &str = "HARVEST_DETAIL_DELAY_MS";

pub const DEFAULT_SOURCES_PATH: &str = "config/sources.yaml";
pub const DEFAULT_STATE_PATH: &str = "data/state.json";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

pub const LATEST_CSV: &str = "jobs_latest.csv";
pub const NEW_CSV: &str = "jobs_new.csv";

/// Run-wide settings. Everything here is read once at startup.
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub sources_path: PathBuf,
    pub state_path: PathBuf,
    pub output_dir: PathBuf,
    pub http_timeout: Duration,
    pub http_retries: u32,
    /// Multiplied by the attempt number between retries.
    pub http_backoff: Duration,
    /// Politeness delay before each detail-page fetch.
    pub detail_delay: Duration,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            sources_path: PathBuf::from(DEFAULT_SOURCES_PATH),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            http_timeout: Duration::from_secs(20),
            http_retries: 3,
            http_backoff: Duration::from_millis(1500),
            detail_delay: Duration::from_millis(500),
        }
    }
}

impl HarvestSettings {
    /// Defaults overridden by `HARVEST_*` env vars. Unparsable numbers keep the default.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            sources_path: env_path(ENV_SOURCES_PATH).unwrap_or(d.sources_path),
            state_path: env_path(ENV_STATE_PATH).unwrap_or(d.state_path),
            output_dir: env_path(ENV_OUTPUT_DIR).unwrap_or(d.output_dir),
            http_timeout: env_u64(ENV_HTTP_TIMEOUT_SECS)
                .map(Duration::from_secs)
                .unwrap_or(d.http_timeout),
            http_retries: env_u64(ENV_HTTP_RETRIES)
                .and_then(|v| u32::try_from(v).ok())
                .map(|v| v.max(1))
                .unwrap_or(d.http_retries),
            http_backoff: env_u64(ENV_HTTP_BACKOFF_MS)
                .map(Duration::from_millis)
                .unwrap_or(d.http_backoff),
            detail_delay: env_u64(ENV_DETAIL_DELAY_MS)
                .map(Duration::from_millis)
                .unwrap_or(d.detail_delay),
        }
    }

    pub fn latest_csv_path(&self) -> PathBuf {
        self.output_dir.join(LATEST_CSV)
    }

    pub fn new_csv_path(&self) -> PathBuf {
        self.output_dir.join(NEW_CSV)
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
