use crate::config::ScraperConfig;
use crate::document::{Document, DocumentAccessor};
use crate::error::ScrapeError;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::wd::{Capabilities, TimeoutConfiguration};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Local ports WebDriver servers commonly listen on
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Opens each target in its own WebDriver session
pub struct WebDriverAccessor {
    webdriver_url: String,
    headless: bool,
    page_load_timeout: Option<Duration>,
    // Last URL that accepted a session, tried first on the next load
    connected_url: Mutex<Option<String>>,
}

impl WebDriverAccessor {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            headless: config.headless,
            page_load_timeout: config.page_load_timeout_secs.map(Duration::from_secs),
            connected_url: Mutex::new(None),
        }
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::new();
        if self.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new", "--disable-gpu"] }),
            );
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }
        caps
    }

    fn remembered_url(&self) -> Option<String> {
        self.connected_url.lock().ok().and_then(|url| url.clone())
    }

    fn remember_url(&self, url: &str) {
        if let Ok(mut connected) = self.connected_url.lock() {
            *connected = Some(url.to_string());
        }
    }

    async fn try_connect(&self, webdriver_url: &str) -> Option<Client> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());

        match builder.connect(webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                self.remember_url(webdriver_url);
                Some(client)
            }
            Err(e) => {
                ::log::debug!("WebDriver at {} refused a session: {}", webdriver_url, e);
                None
            }
        }
    }

    /// Opens a session on the configured WebDriver, falling back to common local ports
    async fn connect(&self, target: &str) -> Result<Client, ScrapeError> {
        if let Some(url) = self.remembered_url() {
            if let Some(client) = self.try_connect(&url).await {
                return Ok(client);
            }
        }

        if let Some(client) = self.try_connect(&self.webdriver_url).await {
            return Ok(client);
        }
        ::log::warn!(
            "Failed to connect to WebDriver at {}, trying fallbacks",
            self.webdriver_url
        );

        for url in FALLBACK_WEBDRIVER_URLS {
            if url == self.webdriver_url {
                continue;
            }
            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Some(client) = self.try_connect(url).await {
                return Ok(client);
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(ScrapeError::load(
            target,
            format!(
                "no WebDriver server accepted a session (tried {} and fallbacks)",
                self.webdriver_url
            ),
        ))
    }

    async fn navigate(&self, client: &Client, target: &str) -> Result<(), CmdError> {
        if let Some(timeout) = self.page_load_timeout {
            client
                .update_timeouts(TimeoutConfiguration::new(None, Some(timeout), None))
                .await?;
        }
        client.goto(target).await
    }
}

#[async_trait(?Send)]
impl DocumentAccessor for WebDriverAccessor {
    type Document = WebDriverDocument;

    async fn load(&self, url: &str) -> Result<WebDriverDocument, ScrapeError> {
        Url::parse(url).map_err(|e| ScrapeError::load(url, format!("invalid URL: {}", e)))?;

        let client = self.connect(url).await?;
        let started = std::time::Instant::now();

        if let Err(e) = self.navigate(&client, url).await {
            if let Err(close_err) = client.close().await {
                ::log::warn!("Failed to close session after failed load: {}", close_err);
            }
            return Err(ScrapeError::load(url, e));
        }

        ::log::debug!(
            "Loaded {} in {:.2} seconds",
            url,
            started.elapsed().as_secs_f64()
        );
        Ok(WebDriverDocument {
            url: url.to_string(),
            client,
        })
    }
}

/// A page rendered in a live browser session
pub struct WebDriverDocument {
    url: String,
    client: Client,
}

impl WebDriverDocument {
    fn read_error(&self, what: &str, error: CmdError) -> ScrapeError {
        ScrapeError::read(&format!("{} on {}", what, self.url), error)
    }
}

#[async_trait(?Send)]
impl Document for WebDriverDocument {
    type Element = Element;

    async fn query_all(&self, selector: &str) -> Result<Vec<Element>, ScrapeError> {
        self.client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| ScrapeError::query(selector, e))
    }

    async fn query_all_within(
        &self,
        element: &Element,
        selector: &str,
    ) -> Result<Vec<Element>, ScrapeError> {
        element
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| ScrapeError::query(selector, e))
    }

    async fn text(&self, element: &Element) -> Result<String, ScrapeError> {
        element
            .text()
            .await
            .map_err(|e| self.read_error("element text", e))
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>, ScrapeError> {
        element
            .attr(name)
            .await
            .map_err(|e| self.read_error(&format!("attribute {:?}", name), e))
    }

    async fn parent(&self, element: &Element) -> Result<Option<Element>, ScrapeError> {
        let found = element.find(Locator::XPath("parent::*")).await;
        missing_as_none(found).map_err(|e| self.read_error("parent element", e))
    }

    async fn close(self) -> Result<(), ScrapeError> {
        ::log::trace!("Closing session for {}", self.url);
        self.client
            .close()
            .await
            .map_err(|e| ScrapeError::read(&format!("session for {}", self.url), e))
    }
}

/// Treat a "no such element" reply as an absent result, e.g. the parent of `<html>`
fn missing_as_none<T>(found: Result<T, CmdError>) -> Result<Option<T>, CmdError> {
    match found {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_no_such_element() => Ok(None),
        Err(e) => Err(e),
    }
}
