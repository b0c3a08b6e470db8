use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// What the batch does when a target fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Stop at the first failing target
    #[default]
    Strict,
    /// Record the failure and continue with the next target
    Isolated,
}

/// Configuration for the scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Maximum number of targets scraped at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub failure_mode: FailureMode,

    /// Page load timeout; the WebDriver default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_load_timeout_secs: Option<u64>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            concurrency: default_concurrency(),
            failure_mode: FailureMode::default(),
            page_load_timeout_secs: None,
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = read_file(path.as_ref())?;
        Self::from_json(&contents).map_err(|e| with_path(e, path.as_ref()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Json {
            path: "<string>".to_string(),
            source,
        })
    }

    /// Apply the `WEBDRIVER_URL` environment override, if set and non-empty
    pub fn with_env_overrides(self) -> Self {
        self.with_webdriver_override(std::env::var("WEBDRIVER_URL").ok())
    }

    fn with_webdriver_override(mut self, webdriver_url: Option<String>) -> Self {
        match webdriver_url {
            Some(url) if !url.is_empty() => self.webdriver_url = url,
            _ => {}
        }
        self
    }
}

/// Ordered list of pages to scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetList {
    pub targets: Vec<String>,
}

impl TargetList {
    /// Load the target list from a JSON file of the form `{"targets": [...]}`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = read_file(path.as_ref())?;
        Self::from_json(&contents).map_err(|e| with_path(e, path.as_ref()))
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let list: Self = serde_json::from_str(json).map_err(|source| ConfigError::Json {
            path: "<string>".to_string(),
            source,
        })?;

        if let Some(position) = list.targets.iter().position(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidTargets(format!(
                "target #{} is empty",
                position + 1
            )));
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut file = File::open(path).map_err(io_error)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(io_error)?;
    Ok(contents)
}

fn with_path(error: ConfigError, path: &Path) -> ConfigError {
    match error {
        ConfigError::Json { source, .. } => ConfigError::Json {
            path: path.display().to_string(),
            source,
        },
        other => other,
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

/// Targets are scraped one at a time unless configured otherwise
fn default_concurrency() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_defaults() {
        let config = ScraperConfig::from_json("{}").unwrap();
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert!(config.headless);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.failure_mode, FailureMode::Strict);
        assert_eq!(config.page_load_timeout_secs, None);
    }

    #[test]
    fn test_config_overrides() {
        let config = ScraperConfig::from_json(
            r#"{"webdriver_url": "http://driver:9515", "headless": false,
                "concurrency": 3, "failure_mode": "isolated", "page_load_timeout_secs": 30}"#,
        )
        .unwrap();
        assert_eq!(config.webdriver_url, "http://driver:9515");
        assert!(!config.headless);
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.failure_mode, FailureMode::Isolated);
        assert_eq!(config.page_load_timeout_secs, Some(30));
    }

    #[test]
    fn test_webdriver_url_override() {
        let file_config =
            ScraperConfig::from_json(r#"{"webdriver_url": "http://file:4444"}"#).unwrap();

        let config = file_config
            .clone()
            .with_webdriver_override(Some("http://env:9515".into()));
        assert_eq!(config.webdriver_url, "http://env:9515");

        let config = file_config.clone().with_webdriver_override(Some(String::new()));
        assert_eq!(config.webdriver_url, "http://file:4444");

        let config = file_config.with_webdriver_override(None);
        assert_eq!(config.webdriver_url, "http://file:4444");
    }

    #[test]
    fn test_unknown_failure_mode_is_rejected() {
        let err = ScraperConfig::from_json(r#"{"failure_mode": "lenient"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_target_list_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"targets": ["https://a.example/1", "https://b.example/2"]}}"#
        )
        .unwrap();

        let list = TargetList::from_file(file.path()).unwrap();
        assert_eq!(
            list.targets,
            vec!["https://a.example/1", "https://b.example/2"]
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_target_list_missing_file() {
        let err = TargetList::from_file("/nonexistent/targets.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_target_list_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"urls": []}}"#).unwrap();

        let err = TargetList::from_file(file.path()).unwrap_err();
        match err {
            ConfigError::Json { path, .. } => {
                assert_eq!(path, file.path().display().to_string())
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_target_list_rejects_blank_targets() {
        let err = TargetList::from_json(r#"{"targets": ["https://a.example", "  "]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTargets(_)));
    }
}
