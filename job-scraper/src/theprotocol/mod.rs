pub mod fetcher;
pub mod parser;

use thiserror::Error;

use crate::types::Level;

pub(crate) type Result<T> = std::result::Result<T, Error>;

pub const ORIGIN: &str = "https://theprotocol.it";

/// Marker shared by the fetcher's wait and the parser's card lookup.
pub const CARD_SELECTOR: &str = r#"a[data-test="list-item-offer"],a[class="a4pzt2q"]"#;

#[derive(Debug, Error)]
pub enum Error {
    #[error("WebDriver error: '{0}'")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),
    #[error("Page did not go idle within {seconds}s: '{url}'")]
    NavigationTimeout { url: String, seconds: u64 },
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::WebDriver(_) => "WebDriverError",
            Error::NavigationTimeout { .. } => "NavigationTimeout",
        }
    }
}

pub fn job_search_url(level: Level) -> String {
    format!("{}/filtry/python;t/{};p?sort=date", ORIGIN, level.slug())
}
