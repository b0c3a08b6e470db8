/// Heading keywords that mark an ingredients section
pub const INGREDIENTS_KEYWORDS: [&str; 2] = ["ingredients", "ingredient"];

/// Heading keywords that mark an instructions section
pub const INSTRUCTIONS_KEYWORDS: [&str; 5] = [
    "instructions",
    "instruction",
    "direction",
    "directions",
    "steps",
];

/// Which recipe sections a heading introduces
///
/// Both flags can be set at once: a heading such as "Ingredients & Steps"
/// feeds the same list items into both sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionMatch {
    pub ingredients: bool,
    pub instructions: bool,
    /// Number of individual keywords found in the heading
    pub keyword_hits: usize,
}

impl SectionMatch {
    /// True when the heading introduces neither section
    pub fn is_none(&self) -> bool {
        !self.ingredients && !self.instructions
    }
}

/// Classifies a heading by substring match against the section keywords
///
/// Matching is case-insensitive and ignores surrounding whitespace. It is not
/// whole-word: "Ingredients list" and "Step-by-steps" both match.
pub fn classify(heading_text: &str) -> SectionMatch {
    let normalized = heading_text.trim().to_lowercase();

    let ingredient_hits = count_hits(&normalized, &INGREDIENTS_KEYWORDS);
    let instruction_hits = count_hits(&normalized, &INSTRUCTIONS_KEYWORDS);

    SectionMatch {
        ingredients: ingredient_hits > 0,
        instructions: instruction_hits > 0,
        keyword_hits: ingredient_hits + instruction_hits,
    }
}

fn count_hits(text: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .count()
}
