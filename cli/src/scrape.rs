use std::path::Path;

use job_scraper::theprotocol::fetcher::PageFetcher;
use job_scraper::theprotocol::job_search_url;
use job_scraper::theprotocol::parser::extract_cards;
use job_scraper::{add_level, Level, Listing};

pub const OUTPUT_FILE: &str = "works_offers.csv";

/// Fetch and parse every level filter in turn, stamping listings with their level.
pub async fn collect_listings<F: PageFetcher + ?Sized>(fetcher: &F) -> Vec<Listing> {
    let mut listings = Vec::new();
    for level in Level::ALL {
        log::info!("scraping {} offers", level);
        let doc = fetcher.fetch(&job_search_url(level)).await;
        let found = add_level(extract_cards(doc.as_ref()), level);
        log::info!("found {}: {}", level, found.len());
        listings.extend(found);
    }
    listings
}

pub async fn scrape<F: PageFetcher + ?Sized>(fetcher: &F, output: &Path) -> persistence::Result<usize> {
    log::info!("starting to scrape python offers from theprotocol.it");
    let listings = collect_listings(fetcher).await;
    let rows = persistence::to_rows(listings);
    let written = persistence::save_csv(output, &rows)?;
    log::info!("saved {} rows to {}", written, output.display());
    Ok(written)
}
