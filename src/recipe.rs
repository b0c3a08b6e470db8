use serde::{Deserialize, Serialize};

/// A recipe scraped from one target page
///
/// Field names serialize in PascalCase so the output matches the records
/// consumers of the old scraper already parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Recipe {
    title: String,
    description: String,
    preview_image: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,

    // Reserved: nothing populates these yet
    prep_time: String,
    cook_time: String,
    categories: Option<Vec<String>>,
    cuisine: String,
    servings: String,
    notes: Option<Vec<String>>,

    source: String,
}

/// Page-level Open Graph metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub preview_image: String,
}

impl Recipe {
    /// Create a recipe from page metadata, the collected sections and the target it came from
    pub fn new(
        metadata: Metadata,
        ingredients: Vec<String>,
        instructions: Vec<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: metadata.title,
            description: metadata.description,
            preview_image: metadata.preview_image,
            ingredients,
            instructions,
            prep_time: String::new(),
            cook_time: String::new(),
            categories: None,
            cuisine: String::new(),
            servings: String::new(),
            notes: None,
            source: source.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn preview_image(&self) -> &str {
        &self.preview_image
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn prep_time(&self) -> &str {
        &self.prep_time
    }

    pub fn cook_time(&self) -> &str {
        &self.cook_time
    }

    pub fn categories(&self) -> Option<&[String]> {
        self.categories.as_deref()
    }

    pub fn cuisine(&self) -> &str {
        &self.cuisine
    }

    pub fn servings(&self) -> &str {
        &self.servings
    }

    pub fn notes(&self) -> Option<&[String]> {
        self.notes.as_deref()
    }

    /// The target URL this recipe was scraped from
    pub fn source(&self) -> &str {
        &self.source
    }
}
