pub mod memory;
pub mod webdriver;

pub use memory::{MemoryAccessor, StaticDocument};
pub use webdriver::{WebDriverAccessor, WebDriverDocument};

use crate::error::ScrapeError;
use async_trait::async_trait;

/// A rendered page that can be queried like a DOM
///
/// Elements are opaque handles owned by the document that produced them; they
/// are only meaningful when passed back to the same document.
#[async_trait(?Send)]
pub trait Document {
    type Element;

    /// All elements matching `selector`, in document order
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, ScrapeError>;

    /// All descendants of `element` matching `selector`, in document order
    async fn query_all_within(
        &self,
        element: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, ScrapeError>;

    /// Rendered text of `element`
    async fn text(&self, element: &Self::Element) -> Result<String, ScrapeError>;

    /// Value of attribute `name`, or `None` when unset
    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, ScrapeError>;

    /// Parent element, or `None` when `element` is the document root
    async fn parent(&self, element: &Self::Element) -> Result<Option<Self::Element>, ScrapeError>;

    /// Release the page
    async fn close(self) -> Result<(), ScrapeError>;
}

/// Opens rendered documents for target URLs
#[async_trait(?Send)]
pub trait DocumentAccessor {
    type Document: Document;

    /// Load `url` and wait until the page reports load completion
    async fn load(&self, url: &str) -> Result<Self::Document, ScrapeError>;
}
