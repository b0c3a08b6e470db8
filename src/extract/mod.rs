pub mod classify;
pub mod list;
pub mod metadata;

#[cfg(test)]
mod tests;

pub use classify::{SectionMatch, classify};
pub use list::extract_list_items;
pub use metadata::extract_metadata;

use crate::document::{Document, DocumentAccessor};
use crate::error::ScrapeError;
use crate::recipe::Recipe;

/// Headings tested against the section keywords
pub const SECTION_HEADINGS: &str = "h1, h2, h3";

/// Scrapes one target into a [`Recipe`]
///
/// The document is closed before returning on every path. A failure to close
/// is logged and never replaces the result of the extraction.
pub async fn scrape<A: DocumentAccessor>(accessor: &A, target: &str) -> Result<Recipe, ScrapeError> {
    ::log::debug!("SCRAPE: {}", target);
    let document = accessor.load(target).await?;

    let result = extract_recipe(&document, target).await;

    if let Err(e) = document.close().await {
        ::log::warn!("Failed to release document for {}: {}", target, e);
    }

    result
}

/// Extracts a recipe from an already loaded document
pub async fn extract_recipe<D: Document>(document: &D, target: &str) -> Result<Recipe, ScrapeError> {
    let mut ingredients = Vec::new();
    let mut instructions = Vec::new();

    for heading in document.query_all(SECTION_HEADINGS).await? {
        let text = document.text(&heading).await?;
        let section = classify(&text);
        if section.is_none() {
            continue;
        }

        let matched_sections = usize::from(section.ingredients) + usize::from(section.instructions);
        if section.keyword_hits > matched_sections {
            ::log::debug!(
                "Heading {:?} matched {} keywords, extracting once per section",
                text.trim(),
                section.keyword_hits
            );
        }

        let items = extract_list_items(document, &heading).await?;
        ::log::debug!(
            "Heading {:?} on {} has {} list items",
            text.trim(),
            target,
            items.len()
        );

        if section.ingredients {
            ingredients.extend(items.iter().cloned());
        }
        if section.instructions {
            instructions.extend(items);
        }
    }

    let metadata = extract_metadata(document).await?;

    ::log::info!(
        "Scraped {:?} from {}: {} ingredients, {} instructions",
        metadata.title,
        target,
        ingredients.len(),
        instructions.len()
    );

    Ok(Recipe::new(metadata, ingredients, instructions, target))
}
