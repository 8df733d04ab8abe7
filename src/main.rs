//! Video Game Sales Dashboard - main entry point
//!
//! Reads the sales worksheet from Google Sheets, runs the analyses and
//! writes the dashboard as static HTML pages.
//!
//! Usage:
//! ```bash
//! export VGSALES_SPREADSHEET=<spreadsheet id or URL>
//! export VGSALES_WORKSHEET=<worksheet name>
//! dashboard --out site --publisher Nintendo --genres Sports,Racing --years 2000-2010 --region EU
//! ```

use anyhow::Context;
use vgsales_dashboard::cli::{help_text, init_tracing, CliArgs};
use vgsales_dashboard::config::DashboardConfig;
use vgsales_dashboard::pages::{render_site, DataState, SiteContext};
use vgsales_dashboard::sales::DatasetCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    tracing::info!("Video Game Sales Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = std::env::args().collect();
    let cli = CliArgs::parse(&args)?;
    if cli.help {
        println!("{}", help_text());
        return Ok(());
    }
    let config = DashboardConfig::from_properties(&cli.properties()?);

    let source = config
        .sheet_source()
        .context("No spreadsheet configured")?;

    let cache = DatasetCache::new();
    let data = DataState::from_fetch(cache.get_or_fetch(&source).await)?;

    let out_dir = config.output_dir.clone();
    let ctx = SiteContext {
        config,
        data,
        selection: cli.selection(),
    };
    let written = render_site(&ctx, &out_dir)
        .with_context(|| format!("Failed to write dashboard to {}", out_dir.display()))?;

    println!(
        "Dashboard written to {} ({} pages)",
        out_dir.join("index.html").display(),
        written.len()
    );
    Ok(())
}
