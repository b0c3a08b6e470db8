use recipe_harvest::{Batch, FailureMode, JsonWriter, MemoryAccessor};
use std::error::Error;

const SHORTBREAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta property="og:title" content="Shortbread">
    <meta property="og:description" content="Three ingredients, one bowl">
    <meta property="og:image" content="https://example.com/shortbread.jpg">
</head>
<body>
    <article>
        <h1>Shortbread</h1>
        <div class="recipe-block">
            <h2>Ingredients</h2>
            <ul>
                <li>225g butter</li>
                <li>110g caster sugar</li>
                <li>330g plain flour</li>
            </ul>
        </div>
        <div class="recipe-block">
            <h2>Directions</h2>
            <ol>
                <li>Cream the butter and sugar.</li>
                <li>Work in the flour and press into a tin.</li>
                <li>Bake at 160C for 40 minutes.</li>
            </ol>
        </div>
    </article>
</body>
</html>"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    let accessor = MemoryAccessor::new()
        .with_page("https://example.com/shortbread", SHORTBREAD)
        .with_failure("https://example.com/gone", "HTTP 404");

    let targets = vec![
        "https://example.com/shortbread".to_string(),
        "https://example.com/gone".to_string(),
    ];

    let mut writer = JsonWriter::new(std::io::stdout());
    let summary = Batch::new(&accessor)
        .with_failure_mode(FailureMode::Isolated)
        .run(&targets, |report| writer.write(report))
        .await?;

    eprintln!(
        "Scraped {} recipes, {} failures",
        summary.scraped, summary.failed
    );
    Ok(())
}
