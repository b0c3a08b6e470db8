use clap::{Parser, ValueEnum};
use recipe_harvest::{FailureMode, ScraperConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recipe-harvest")]
#[command(about = "Scrapes recipes from rendered web pages")]
#[command(version)]
pub struct Args {
    /// JSON file listing the pages to scrape ({"targets": [...]})
    #[arg(short, long, default_value = "targets.json")]
    pub targets: PathBuf,

    /// Scraper configuration file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// WebDriver server to open browser sessions on
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Number of pages scraped at once
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// What to do when a page fails
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Page load timeout in seconds
    #[arg(long)]
    pub page_load_timeout: Option<u64>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// Read saved page snapshots from this directory instead of using a browser
    #[arg(long)]
    pub offline: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Stop at the first failing page
    Strict,
    /// Record failures and keep going
    Isolated,
}

impl From<ModeArg> for FailureMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strict => FailureMode::Strict,
            ModeArg::Isolated => FailureMode::Isolated,
        }
    }
}

impl Args {
    /// Apply command-line overrides on top of `config`
    pub fn apply(&self, mut config: ScraperConfig) -> ScraperConfig {
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(mode) = self.mode {
            config.failure_mode = mode.into();
        }
        if let Some(timeout) = self.page_load_timeout {
            config.page_load_timeout_secs = Some(timeout);
        }
        if self.headed {
            config.headless = false;
        }
        config
    }
}
