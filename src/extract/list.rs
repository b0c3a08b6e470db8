use crate::document::Document;
use crate::error::ScrapeError;

/// Collects the list items that belong to a section heading
///
/// The items are every `li` under the heading's parent, in document order.
/// Lists nested outside that parent are not found.
pub async fn extract_list_items<D: Document>(
    document: &D,
    heading: &D::Element,
) -> Result<Vec<String>, ScrapeError> {
    let Some(parent) = document.parent(heading).await? else {
        let heading_text = document.text(heading).await.unwrap_or_default();
        return Err(ScrapeError::Extraction {
            heading: heading_text.trim().to_string(),
        });
    };

    let items = document.query_all_within(&parent, "li").await?;
    let mut texts = Vec::with_capacity(items.len());
    for item in &items {
        texts.push(document.text(item).await?.trim().to_string());
    }

    Ok(texts)
}
