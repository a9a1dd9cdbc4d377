use std::convert::Infallible;
use std::fmt::Display;

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use crate::theprotocol::{CARD_SELECTOR, ORIGIN};
use crate::types::{Listing, Location};

const MULTIPLE_LOCATIONS_PL: &str = "Oferta w wielu lokalizacjach";
const MULTIPLE_LOCATIONS_EN: &str = "Multiple locations offer";

lazy_static! {
    static ref CARD: Selector = Selector::parse(CARD_SELECTOR).unwrap();
    static ref TITLE: Selector = Selector::parse(r#"h2[data-test="text-jobTitle"]"#).unwrap();
    static ref EMPLOYER: Selector =
        Selector::parse(r#"div[data-test="text-employerName"]"#).unwrap();
    static ref WORKPLACES: Selector =
        Selector::parse(r#"div[data-test="text-workplaces"]"#).unwrap();
    static ref LOCATION_CHIP: Selector =
        Selector::parse(r#"div[data-test="chip-location"]"#).unwrap();
    static ref SALARY: Selector = Selector::parse(r#"div[data-test="text-salary"]"#).unwrap();
    static ref WORK_MODES: Selector =
        Selector::parse(r#"div[data-test="text-workModes"]"#).unwrap();
    static ref TECHNOLOGY_CHIP: Selector =
        Selector::parse(r#"div[data-test="chip-expectedTechnology"]"#).unwrap();
    static ref PAGE_TITLE: Selector = Selector::parse("title").unwrap();
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_owned()
}

/// Text of the first element under `card` matching `selector`, if there is one.
fn select_text(card: ElementRef, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(text_of)
}

fn select_all_text(card: ElementRef, selector: &Selector) -> Vec<String> {
    card.select(selector).map(text_of).collect()
}

/// Offer hrefs are usually site-relative; anything not starting with `http` gets the origin prepended.
fn resolve_link(href: Option<&str>) -> Option<String> {
    match href.map(str::trim) {
        Some(href) if href.starts_with("http") => Some(href.to_owned()),
        Some(href) if !href.is_empty() => Some(format!("{}{}", ORIGIN, href)),
        _ => None,
    }
}

fn parse_location(card: ElementRef) -> Location {
    let location = select_text(card, &WORKPLACES).unwrap_or_default();
    if location.contains(MULTIPLE_LOCATIONS_PL) || location.contains(MULTIPLE_LOCATIONS_EN) {
        Location::Multiple(select_all_text(card, &LOCATION_CHIP))
    } else {
        Location::Single(location)
    }
}

/// Parse one offer card. `None` means the card has no title and should be dropped.
pub fn parse_card(card: ElementRef) -> Option<Listing> {
    let title = select_text(card, &TITLE).filter(|title| !title.is_empty())?;
    Some(Listing {
        title,
        company: select_text(card, &EMPLOYER),
        location: parse_location(card),
        salary: select_text(card, &SALARY),
        work_mode: select_text(card, &WORK_MODES),
        link: resolve_link(card.value().attr("href")),
        technologies: select_all_text(card, &TECHNOLOGY_CHIP),
        level: None,
    })
}

/// Extract every offer card on a rendered results page, in document order.
/// A missing page yields no listings.
pub fn extract_cards(doc: Option<&Html>) -> Vec<Listing> {
    extract_cards_with(doc, |card| Ok::<_, Infallible>(parse_card(card)))
}

/// Runs `parse` over every card; a card that fails is logged and skipped.
pub fn extract_cards_with<F, E>(doc: Option<&Html>, parse: F) -> Vec<Listing>
where
    F: Fn(ElementRef) -> Result<Option<Listing>, E>,
    E: Display,
{
    let doc = match doc {
        Some(doc) => doc,
        None => return Vec::new(),
    };
    let cards = doc.select(&CARD).collect::<Vec<_>>();
    log::info!("cards found on page: {}", cards.len());
    cards
        .into_iter()
        .filter_map(|card| match parse(card) {
            Ok(listing) => listing,
            Err(e) => {
                log::warn!("skipping offer card: {}", e);
                None
            }
        })
        .collect()
}

pub fn page_title(doc: &Html) -> Option<String> {
    doc.select(&PAGE_TITLE)
        .next()
        .map(text_of)
        .filter(|title| !title.is_empty())
}
