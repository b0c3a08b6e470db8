pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod output;
pub mod recipe;

// Re-export commonly used types for convenience
pub use batch::{Batch, BatchSummary, ScrapeReport};
pub use config::{FailureMode, ScraperConfig, TargetList};
pub use document::{Document, DocumentAccessor, MemoryAccessor, WebDriverAccessor};
pub use error::{BatchError, ConfigError, ScrapeError};
pub use extract::scrape;
pub use output::JsonWriter;
pub use recipe::Recipe;

/// Scrape every target with `accessor`, writing each report to stdout as it completes
pub async fn run_to_stdout<A: DocumentAccessor>(
    accessor: &A,
    config: &ScraperConfig,
    targets: &TargetList,
) -> Result<BatchSummary, BatchError> {
    let stdout = std::io::stdout();
    let mut writer = JsonWriter::new(stdout.lock());

    Batch::new(accessor)
        .with_concurrency(config.concurrency)
        .with_failure_mode(config.failure_mode)
        .run(&targets.targets, |report| writer.write(report))
        .await
}
