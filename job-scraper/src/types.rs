use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Experience level filter a listing was found under.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Junior,
    Trainee,
    Assistant,
}

impl Level {
    /// Fixed scrape order.
    pub const ALL: [Level; 3] = [Level::Junior, Level::Trainee, Level::Assistant];

    pub fn label(&self) -> &'static str {
        match self {
            Level::Junior => "Junior",
            Level::Trainee => "Trainee",
            Level::Assistant => "Assistant",
        }
    }

    /// Path segment used by the site's filter urls.
    pub fn slug(&self) -> &'static str {
        match self {
            Level::Junior => "junior",
            Level::Trainee => "trainee",
            Level::Assistant => "assistant",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Location {
    Single(String),
    Multiple(Vec<String>),
}

impl Default for Location {
    fn default() -> Self {
        Location::Single(String::new())
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Single(location) => f.write_str(location),
            Location::Multiple(locations) => f.write_str(&locations.join(", ")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub company: Option<String>,
    pub location: Location,
    pub salary: Option<String>,
    #[serde(rename = "Work Mode")]
    pub work_mode: Option<String>,
    pub link: Option<String>,
    pub technologies: Vec<String>,
    pub level: Option<Level>,
}

impl Listing {
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }
}

/// Stamp every listing with the filter level it was scraped under.
pub fn add_level(listings: Vec<Listing>, level: Level) -> Vec<Listing> {
    listings
        .into_iter()
        .map(|listing| listing.with_level(level))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn listing(title: &str) -> Listing {
        Listing {
            title: title.to_owned(),
            company: None,
            location: Location::default(),
            salary: None,
            work_mode: None,
            link: None,
            technologies: vec![],
            level: None,
        }
    }

    #[test]
    fn test_add_level_stamps_every_listing() {
        let listings = add_level(vec![listing("a"), listing("b")], Level::Trainee);
        assert!(listings.iter().all(|l| l.level == Some(Level::Trainee)));
    }

    #[test]
    fn test_multiple_locations_display_joined() {
        let location = Location::Multiple(vec!["Warszawa".to_owned(), "Kraków".to_owned()]);
        assert_eq!(location.to_string(), "Warszawa, Kraków");
        assert_eq!(Location::default().to_string(), "");
    }

    #[test]
    fn test_listing_serializes_work_mode_key() {
        let mut l = listing("Python Developer");
        l.work_mode = Some("zdalna".to_owned());
        let json = serde_json::to_value(&l).unwrap();
        assert_eq!(json["Work Mode"], "zdalna");
        assert_eq!(json["location"], "");
    }
}
