//! Job harvester binary entrypoint.
//! One run over all configured sources, then exit.

use job_harvester::HarvestSettings;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` filters (default `info`); `HARVEST_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("HARVEST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = HarvestSettings::from_env();
    job_harvester::run(&settings).await?;
    Ok(())
}
