pub mod theprotocol;
pub mod types;

pub use scraper::Html;
pub use types::{add_level, Level, Listing, Location};
