use thiserror::Error;

/// Errors that can occur while scraping a single target
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Navigation failed, timed out, or no browser session could be opened
    #[error("Failed to load {url}: {reason}")]
    Load { url: String, reason: String },

    /// Reading text or an attribute from a node failed
    #[error("Failed to read {what}: {reason}")]
    Read { what: String, reason: String },

    /// A required Open Graph property is absent or has no content
    #[error("Missing required metadata: {property}")]
    MissingMetadata { property: String },

    /// A matched section heading has no parent to search for list items
    #[error("Section heading {heading:?} has no parent element")]
    Extraction { heading: String },

    /// A selector query could not be run against the document
    #[error("Query {selector:?} failed: {reason}")]
    Query { selector: String, reason: String },
}

impl ScrapeError {
    pub(crate) fn load(url: &str, reason: impl ToString) -> Self {
        Self::Load {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn read(what: &str, reason: impl ToString) -> Self {
        Self::Read {
            what: what.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn query(selector: &str, reason: impl ToString) -> Self {
        Self::Query {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors raised while loading configuration or the target list
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The target list parsed but is not usable
    #[error("Invalid target list: {0}")]
    InvalidTargets(String),
}

/// Errors that stop a batch run
#[derive(Error, Debug)]
pub enum BatchError {
    /// A target failed while running in strict mode
    #[error("Scraping {target} failed: {source}")]
    Scrape {
        target: String,
        #[source]
        source: ScrapeError,
    },

    /// Writing a result failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
