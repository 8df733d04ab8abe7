//! Video Game Sales Dashboard - development entry point
//!
//! Same flow as `dashboard`, reading a local CSV export instead of the
//! remote worksheet. The file is read twice through the cache to show the
//! second request being served without I/O.
//!
//! Usage:
//! ```bash
//! RUST_LOG=debug cargo run --bin dev -- --csv vgsales.csv --out site
//! ```

use anyhow::{bail, Context};
use std::time::Instant;
use vgsales_dashboard::cli::{help_text, init_tracing, CliArgs};
use vgsales_dashboard::config::DashboardConfig;
use vgsales_dashboard::pages::{render_site, DataState, SiteContext};
use vgsales_dashboard::sales::{CsvFileSource, DatasetCache};

fn log_phase(start: Instant, phase: &str) {
    tracing::info!("[PHASE @{:.3}s] {}", start.elapsed().as_secs_f64(), phase);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let start = Instant::now();
    log_phase(start, "START: Development run");

    let args: Vec<String> = std::env::args().collect();
    let cli = CliArgs::parse(&args)?;
    if cli.help {
        println!("{}", help_text());
        return Ok(());
    }
    let Some(csv) = cli.csv_path() else {
        bail!("--csv <path> is required");
    };
    let config = DashboardConfig::from_properties(&cli.properties()?);

    log_phase(start, "PHASE 1: Loading CSV");
    let source = CsvFileSource::new(csv);
    let cache = DatasetCache::new();
    let data = DataState::from_fetch(cache.get_or_fetch(&source).await)?;
    if let DataState::Loaded(table) = &data {
        tracing::info!(rows = table.height(), columns = table.column_names().len(), "Dataset ready");
        // Cache hit, no second read
        cache.get_or_fetch(&source).await?;
    }

    log_phase(start, "PHASE 2: Rendering pages");
    let out_dir = config.output_dir.clone();
    let ctx = SiteContext {
        config,
        data,
        selection: cli.selection(),
    };
    let written = render_site(&ctx, &out_dir)
        .with_context(|| format!("Failed to write dashboard to {}", out_dir.display()))?;
    for path in &written {
        println!("✓ Wrote {}", path.display());
    }

    log_phase(start, "COMPLETE");
    Ok(())
}
