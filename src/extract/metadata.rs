use crate::document::Document;
use crate::error::ScrapeError;
use crate::recipe::Metadata;

/// Reads the Open Graph title, description and image of a page
///
/// All three are required; there is no fallback to other metadata schemes.
pub async fn extract_metadata<D: Document>(document: &D) -> Result<Metadata, ScrapeError> {
    Ok(Metadata {
        title: og_property(document, "og:title").await?,
        description: og_property(document, "og:description").await?,
        preview_image: og_property(document, "og:image").await?,
    })
}

async fn og_property<D: Document>(document: &D, property: &str) -> Result<String, ScrapeError> {
    let selector = format!("[property='{}']", property);
    let missing = || ScrapeError::MissingMetadata {
        property: property.to_string(),
    };

    let elements = document.query_all(&selector).await?;
    let element = elements.first().ok_or_else(missing)?;
    document
        .attribute(element, "content")
        .await?
        .ok_or_else(missing)
}
