use std::path::Path;

use job_scraper::theprotocol::parser::extract_cards;
use job_scraper::Html;

/// Run the card extractor over a saved results page, returning the listings as JSON.
pub fn parse_file(path: &Path) -> Result<String, crate::Error> {
    let markup = std::fs::read_to_string(path)?;
    let doc = Html::parse_document(&markup);
    let listings = extract_cards(Some(&doc));
    log::info!("parsed {} offers from {}", listings.len(), path.display());
    Ok(serde_json::to_string_pretty(&listings)?)
}
