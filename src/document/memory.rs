use crate::document::{Document, DocumentAccessor};
use crate::error::ScrapeError;
use async_trait::async_trait;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Elements whose text never shows up in the rendered page
const UNRENDERED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Handle to an element of a [`StaticDocument`]: its node in the parsed tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticElement(NodeId);

/// A document parsed from static HTML
///
/// Nothing is rendered and no scripts run, so this only sees what the markup
/// already contains.
pub struct StaticDocument {
    url: String,
    html: Html,
    released: Option<Arc<AtomicUsize>>,
}

impl StaticDocument {
    /// Parse `html` as the document served at `url`
    pub fn parse(url: &str, html: &str) -> Self {
        Self {
            url: url.to_string(),
            html: Html::parse_document(html),
            released: None,
        }
    }

    fn resolve(&self, element: &StaticElement) -> Result<ElementRef<'_>, ScrapeError> {
        self.html
            .tree
            .get(element.0)
            .and_then(ElementRef::wrap)
            .ok_or_else(|| {
                ScrapeError::read(
                    &format!("element {:?} of {}", element.0, self.url),
                    "element is not part of this document",
                )
            })
    }
}

fn handles<'a>(found: impl Iterator<Item = ElementRef<'a>>) -> Vec<StaticElement> {
    found.map(|element| StaticElement(element.id())).collect()
}

fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::query(selector, format!("{:?}", e)))
}

fn is_rendered(node: ego_tree::NodeRef<'_, Node>) -> bool {
    !node
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| UNRENDERED_ELEMENTS.contains(&ancestor.value().name()))
}

/// Visible text content with whitespace runs collapsed, approximating rendered text
fn rendered_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        if let Node::Text(chunk) = node.value() {
            if is_rendered(node) {
                text.push_str(chunk);
            }
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait(?Send)]
impl Document for StaticDocument {
    type Element = StaticElement;

    async fn query_all(&self, selector: &str) -> Result<Vec<StaticElement>, ScrapeError> {
        let selector_parsed = parse_selector(selector)?;
        Ok(handles(self.html.select(&selector_parsed)))
    }

    async fn query_all_within(
        &self,
        element: &StaticElement,
        selector: &str,
    ) -> Result<Vec<StaticElement>, ScrapeError> {
        let selector_parsed = parse_selector(selector)?;
        let scope = self.resolve(element)?;
        Ok(handles(scope.select(&selector_parsed)))
    }

    async fn text(&self, element: &StaticElement) -> Result<String, ScrapeError> {
        self.resolve(element).map(rendered_text)
    }

    async fn attribute(
        &self,
        element: &StaticElement,
        name: &str,
    ) -> Result<Option<String>, ScrapeError> {
        let element = self.resolve(element)?;
        Ok(element.value().attr(name).map(|value| value.to_string()))
    }

    async fn parent(&self, element: &StaticElement) -> Result<Option<StaticElement>, ScrapeError> {
        let element = self.resolve(element)?;
        Ok(element
            .parent()
            .and_then(ElementRef::wrap)
            .map(|parent| StaticElement(parent.id())))
    }

    async fn close(self) -> Result<(), ScrapeError> {
        if let Some(released) = &self.released {
            released.fetch_add(1, Ordering::SeqCst);
        }
        ::log::trace!("Released static document for {}", self.url);
        Ok(())
    }
}

/// Serves documents from HTML held in memory or saved to a directory
///
/// Pages registered with [`MemoryAccessor::with_page`] take precedence; any
/// other URL is looked up as a snapshot file when a snapshot directory is set.
#[derive(Default)]
pub struct MemoryAccessor {
    pages: HashMap<String, String>,
    failures: HashMap<String, String>,
    snapshot_dir: Option<PathBuf>,
    loaded: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl MemoryAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve snapshot files from `dir`, named by [`snapshot_file_name`]
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            snapshot_dir: Some(dir.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Serve `html` for `url`
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Fail every load of `url` with `reason`
    pub fn with_failure(mut self, url: &str, reason: &str) -> Self {
        self.failures.insert(url.to_string(), reason.to_string());
        self
    }

    /// Number of documents successfully loaded so far
    pub fn loaded(&self) -> usize {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Number of loaded documents that have not been closed
    pub fn open_documents(&self) -> usize {
        self.loaded() - self.released.load(Ordering::SeqCst)
    }

    async fn source_for(&self, url: &str) -> Result<String, ScrapeError> {
        if let Some(reason) = self.failures.get(url) {
            return Err(ScrapeError::load(url, reason));
        }

        if let Some(html) = self.pages.get(url) {
            return Ok(html.clone());
        }

        match &self.snapshot_dir {
            Some(dir) => {
                let path = dir.join(snapshot_file_name(url));
                ::log::debug!("Reading snapshot {} for {}", path.display(), url);
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| ScrapeError::load(url, format!("{}: {}", path.display(), e)))
            }
            None => Err(ScrapeError::load(url, "no page registered for this URL")),
        }
    }
}

#[async_trait(?Send)]
impl DocumentAccessor for MemoryAccessor {
    type Document = StaticDocument;

    async fn load(&self, url: &str) -> Result<StaticDocument, ScrapeError> {
        let source = self.source_for(url).await?;
        let mut document = StaticDocument::parse(url, &source);
        document.released = Some(Arc::clone(&self.released));
        self.loaded.fetch_add(1, Ordering::SeqCst);
        Ok(document)
    }
}

/// File name a page snapshot for `url` is saved under
///
/// A readable prefix of the URL followed by a hash of the whole URL, so
/// targets that only differ past the prefix or in scheme get their own file.
pub fn snapshot_file_name(url: &str) -> String {
    let stripped = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let prefix: String = stripped
        .chars()
        .map(|c| match c {
            '/' | ':' | '?' | '&' | '=' | '#' | '%' => '_',
            other => other,
        })
        .take(100)
        .collect();
    format!("{}-{:016x}.html", prefix, fnv1a(url.as_bytes()))
}

/// 64-bit FNV-1a, fixed across runs and toolchains
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><meta property="og:title" content="Soup"></head>
        <body><section><h2>Ingredients</h2><ul><li> Salt </li><li>Wa<b>ter</b></li></ul></section></body></html>"#;

    #[tokio::test]
    async fn test_query_and_text() {
        let doc = StaticDocument::parse("https://example.com", PAGE);

        let headings = doc.query_all("h1, h2, h3").await.unwrap();
        assert_eq!(headings.len(), 1);
        assert_eq!(doc.text(&headings[0]).await.unwrap(), "Ingredients");

        let items = doc.query_all("li").await.unwrap();
        let texts = vec![
            doc.text(&items[0]).await.unwrap(),
            doc.text(&items[1]).await.unwrap(),
        ];
        assert_eq!(texts, vec!["Salt", "Water"]);
    }

    #[tokio::test]
    async fn test_parent_and_scoped_query() {
        let doc = StaticDocument::parse("https://example.com", PAGE);
        let heading = doc.query_all("h2").await.unwrap()[0];

        let section = doc.parent(&heading).await.unwrap().unwrap();
        assert_eq!(doc.query_all_within(&section, "li").await.unwrap().len(), 2);

        let root = doc.query_all("html").await.unwrap()[0];
        assert!(doc.parent(&root).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_attribute() {
        let doc = StaticDocument::parse("https://example.com", PAGE);
        let meta = doc.query_all("[property='og:title']").await.unwrap()[0];

        assert_eq!(
            doc.attribute(&meta, "content").await.unwrap().as_deref(),
            Some("Soup")
        );
        assert_eq!(doc.attribute(&meta, "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_selector_is_query_error() {
        let doc = StaticDocument::parse("https://example.com", PAGE);
        let err = doc.query_all("h1[").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Query { .. }));
    }

    #[tokio::test]
    async fn test_foreign_handle_is_read_error() {
        let long_list = format!("<ul>{}</ul>", "<li>item</li>".repeat(50));
        let other = StaticDocument::parse("https://other.example", &long_list);
        let last_item = *other.query_all("li").await.unwrap().last().unwrap();

        let doc = StaticDocument::parse("https://example.com", "<p>short</p>");
        let err = doc.text(&last_item).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Read { .. }));
    }

    #[tokio::test]
    async fn test_handles_survive_many_lookups() {
        let list = format!(
            "<section><h2>Steps</h2><ol>{}</ol></section>",
            "<li> step </li>".repeat(500)
        );
        let doc = StaticDocument::parse("https://example.com", &list);

        let items = doc.query_all("li").await.unwrap();
        assert_eq!(items.len(), 500);
        let heading = doc.query_all("h2").await.unwrap()[0];
        let section = doc.parent(&heading).await.unwrap().unwrap();
        assert_eq!(doc.query_all_within(&section, "li").await.unwrap(), items);
        assert_eq!(doc.text(&items[499]).await.unwrap(), "step");
    }

    #[tokio::test]
    async fn test_text_skips_scripts_and_styles() {
        let doc = StaticDocument::parse(
            "https://example.com",
            r#"<div id="card">Flour<script>window.track("flour")</script>
                <style>.x { color: red }</style><noscript>Enable JS</noscript> and sugar</div>"#,
        );

        let card = doc.query_all("#card").await.unwrap()[0];
        assert_eq!(doc.text(&card).await.unwrap(), "Flour and sugar");
    }

    #[tokio::test]
    async fn test_accessor_tracks_release() {
        let accessor = MemoryAccessor::new().with_page("https://example.com", PAGE);

        let doc = accessor.load("https://example.com").await.unwrap();
        assert_eq!(accessor.open_documents(), 1);
        doc.close().await.unwrap();
        assert_eq!(accessor.open_documents(), 0);
        assert_eq!(accessor.loaded(), 1);
    }

    #[tokio::test]
    async fn test_accessor_unknown_and_failing_urls() {
        let accessor = MemoryAccessor::new().with_failure("https://down.example", "timeout");

        let err = accessor.load("https://down.example").await.err().unwrap();
        assert!(matches!(err, ScrapeError::Load { .. }));
        assert!(err.to_string().contains("timeout"));

        let err = accessor.load("https://unknown.example").await.err().unwrap();
        assert!(matches!(err, ScrapeError::Load { .. }));
        assert_eq!(accessor.loaded(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = "https://example.com/soup?id=1";
        std::fs::write(dir.path().join(snapshot_file_name(url)), PAGE).unwrap();

        let accessor = MemoryAccessor::from_dir(dir.path());
        let doc = accessor.load(url).await.unwrap();
        assert_eq!(doc.query_all("li").await.unwrap().len(), 2);
    }

    #[test]
    fn test_snapshot_file_name() {
        let name = snapshot_file_name("https://example.com/a/b?x=1#top");
        assert!(name.starts_with("example.com_a_b_x_1_top-"));
        assert!(name.ends_with(".html"));
        assert_eq!(name, snapshot_file_name("https://example.com/a/b?x=1#top"));

        // 100 prefix chars, a dash, 16 hex digits and ".html"
        let long = format!("https://example.com/{}", "é".repeat(200));
        assert_eq!(snapshot_file_name(&long).chars().count(), 122);
    }

    #[test]
    fn test_snapshot_file_names_do_not_collide() {
        let base = format!("https://example.com/recipes/{}", "a".repeat(90));
        let pancakes = format!("{}/pancakes", base);
        let shortbread = format!("{}/shortbread", base);
        assert_ne!(snapshot_file_name(&pancakes), snapshot_file_name(&shortbread));

        assert_ne!(
            snapshot_file_name("http://example.com/soup"),
            snapshot_file_name("https://example.com/soup")
        );
    }

    #[tokio::test]
    async fn test_snapshot_dir_serves_each_long_url_its_own_page() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = format!("https://example.com/recipes/{}", "a".repeat(90));
        let pancakes = format!("{}/pancakes", base);
        let shortbread = format!("{}/shortbread", base);
        let page = |title: &str| format!(r#"<meta property="og:title" content="{}">"#, title);
        for (url, title) in [(&pancakes, "Pancakes"), (&shortbread, "Shortbread")] {
            std::fs::write(dir.path().join(snapshot_file_name(url)), page(title)).unwrap();
        }

        let accessor = MemoryAccessor::from_dir(dir.path());
        let doc = accessor.load(&shortbread).await.unwrap();
        let meta = doc.query_all("[property='og:title']").await.unwrap()[0];
        assert_eq!(
            doc.attribute(&meta, "content").await.unwrap().as_deref(),
            Some("Shortbread")
        );
    }
}
