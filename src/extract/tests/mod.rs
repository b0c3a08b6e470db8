
pub(super) const PANCAKES_URL: &str = "https://example.com/pancakes";

/// Markup for a page with the given heading blocks and Open Graph tags
pub(super) fn recipe_page(og_tags: &str, body: &str) -> String {
    format!("<html><head>{og_tags}</head><body>{body}</body></html>")
}

pub(super) fn pancake_og_tags() -> &'static str {
    r#"<meta property="og:title" content="Pancakes">
       <meta property="og:description" content="Easy pancakes">
       <meta property="og:image" content="http://x/img.png">"#
}
