use background_service::{BackgroundService, Pipeline};
use clap::Parser;
use jobscout_core::{AppConfig, ConfigSource, CoreError, RunMode, SetupReport};
use listing_source::{CardParser, ScraperApiClient};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_LOG_FILTER: &str =
    "jobscout=info,jobscout_core=info,listing_source=info,database=info,background_service=info";

#[derive(Debug, Parser)]
#[command(name = "jobscout", about = "Scrape, score and store job listings")]
struct Cli {
    /// TOML file with settings; environment variables take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stay resident and repeat the search on the daily schedule.
    #[arg(long)]
    schedule: bool,

    /// Report which settings are present and exit without scraping.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let cli = Cli::parse();
    if dotenv_loaded {
        tracing::debug!("Loaded .env file");
    }

    let source = match &cli.config {
        Some(path) => ConfigSource::env_with_file(path)?,
        None => ConfigSource::env(),
    };

    if cli.check {
        print_setup_report(&SetupReport::inspect(&source));
        return Ok(());
    }

    let mut config = AppConfig::load(&source)?;
    if cli.schedule {
        config = config.with_run_mode(RunMode::Scheduled);
    }

    tracing::info!("Job Search Agent starting...");

    let page_source = Arc::new(ScraperApiClient::from_config(&config)?);
    tracing::info!(
        "Pausing {:?} after each gateway request",
        page_source.delay_after_request()
    );
    let parser = Arc::new(CardParser::linkedin(config.primary_location())?);
    let store = database::open_store(&config.storage).await?;
    tracing::info!("Saving listings to {}", config.storage.backend_name());

    let pipeline = Pipeline::new(&config, page_source, parser, store);
    let service = BackgroundService::new(&config, pipeline)?;

    if let Some(report) = service.run_now().await {
        tracing::info!(
            "Run finished: {} queries ({} failed), {} found, {} qualified, persist {:?}",
            report.queries_attempted,
            report.fetch_failures,
            report.listings_found,
            report.qualified,
            report.persist
        );
    }

    if config.run_mode == RunMode::Scheduled {
        service.start().await?;
        tracing::info!(
            "Scheduled daily with '{}' ({})",
            service.schedule().cron,
            service.schedule().timezone
        );

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutting down");
        service.stop().await?;
    }

    Ok(())
}

fn print_setup_report(report: &SetupReport) {
    let yes_no = |present: bool| if present { "YES" } else { "NO" };

    println!("Testing setup...");
    println!("Scraper key loaded: {}", yes_no(report.scraper_key_loaded));
    println!(
        "Storage configured: {}",
        report.storage_backend.unwrap_or("NO")
    );
    println!("Targets: {}", report.target_roles.join(", "));
    println!("Locations: {}", report.target_locations.join(", "));
    if report.is_ready() {
        println!("Setup complete - ready to deploy!");
    } else {
        println!("Setup incomplete - see missing settings above.");
    }
}
