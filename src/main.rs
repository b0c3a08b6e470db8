use clap::Parser;
use recipe_harvest::{MemoryAccessor, ScraperConfig, TargetList, WebDriverAccessor, run_to_stdout};
use std::error::Error;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    };
    let config = args.apply(config.with_env_overrides());

    // The whole list is loaded before anything is scraped
    let targets = TargetList::from_file(&args.targets)?;
    ::log::info!(
        "Loaded {} targets from {}",
        targets.len(),
        args.targets.display()
    );

    let start_time = std::time::Instant::now();
    let summary = match &args.offline {
        Some(dir) => {
            ::log::info!("Reading page snapshots from {}", dir.display());
            run_to_stdout(&MemoryAccessor::from_dir(dir), &config, &targets).await
        }
        None => {
            ::log::info!("Using WebDriver at {}", config.webdriver_url);
            run_to_stdout(&WebDriverAccessor::new(&config), &config, &targets).await
        }
    };

    let summary = match summary {
        Ok(summary) => summary,
        Err(e) => {
            ::log::error!("Aborting: {}", e);
            return Err(e.into());
        }
    };

    ::log::info!(
        "Scraping complete - {} recipes, {} failures in {:.2} seconds",
        summary.scraped,
        summary.failed,
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
