use std::fs::File;
use std::io::Write;
use std::path::Path;

use job_scraper::Listing;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("CSV error: '{0}'")]
    Csv(#[from] csv::Error),
    #[error("File error: '{0}'")]
    IoError(#[from] std::io::Error),
}

pub const HEADER: [&str; 8] = [
    "title",
    "company",
    "location",
    "salary",
    "Work Mode",
    "link",
    "technologies",
    "level",
];

/// Spreadsheet applications need the BOM to pick up UTF-8.
const UTF8_BOM: &[u8] = "\u{feff}".as_bytes();

/// Flat, all-text form of a listing as it lands in the output file.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    #[serde(rename = "Work Mode")]
    pub work_mode: String,
    pub link: String,
    pub technologies: String,
    pub level: String,
}

pub fn join_technologies(technologies: &[String]) -> String {
    technologies.join(", ")
}

impl From<Listing> for Row {
    fn from(listing: Listing) -> Self {
        Self {
            title: listing.title,
            company: listing.company.unwrap_or_default(),
            location: listing.location.to_string(),
            salary: listing.salary.unwrap_or_default(),
            work_mode: listing.work_mode.unwrap_or_default(),
            link: listing.link.unwrap_or_default(),
            technologies: join_technologies(&listing.technologies),
            level: listing
                .level
                .map(|level| level.label().to_owned())
                .unwrap_or_else(|| "Unknown".to_owned()),
        }
    }
}

/// Rows ordered by level, then title.
pub fn to_rows(listings: Vec<Listing>) -> Vec<Row> {
    let mut rows = listings.into_iter().map(Row::from).collect::<Vec<_>>();
    rows.sort_by(|a, b| (&a.level, &a.title).cmp(&(&b.level, &b.title)));
    rows
}

/// Overwrites `path` with a header line followed by `rows`.
pub fn save_csv(path: &Path, rows: &[Row]) -> Result<usize> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);
    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    log::debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_scraper::{Level, Location};

    fn listing(title: &str, level: Option<Level>) -> Listing {
        Listing {
            title: title.to_owned(),
            company: None,
            location: Location::default(),
            salary: None,
            work_mode: None,
            link: None,
            technologies: vec![],
            level,
        }
    }

    #[test]
    fn test_join_technologies() {
        let technologies = vec!["Python".to_owned(), "Django".to_owned()];
        assert_eq!(join_technologies(&technologies), "Python, Django");
        assert_eq!(join_technologies(&[]), "");
    }

    #[test]
    fn test_row_defaults_missing_fields_to_empty() {
        let row = Row::from(listing("Python Developer", Some(Level::Junior)));
        assert_eq!(row.company, "");
        assert_eq!(row.location, "");
        assert_eq!(row.salary, "");
        assert_eq!(row.work_mode, "");
        assert_eq!(row.link, "");
        assert_eq!(row.technologies, "");
        assert_eq!(row.level, "Junior");
    }

    #[test]
    fn test_unstamped_level_is_unknown() {
        assert_eq!(Row::from(listing("x", None)).level, "Unknown");
    }

    #[test]
    fn test_rows_sorted_by_level_then_title() {
        let rows = to_rows(vec![
            listing("Django Dev", Some(Level::Junior)),
            listing("Backend Trainee", Some(Level::Trainee)),
            listing("Analyst", Some(Level::Junior)),
            listing("Support", Some(Level::Assistant)),
        ]);
        let order = rows
            .iter()
            .map(|r| (r.level.as_str(), r.title.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                ("Assistant", "Support"),
                ("Junior", "Analyst"),
                ("Junior", "Django Dev"),
                ("Trainee", "Backend Trainee"),
            ]
        );
    }

    #[test]
    fn test_save_csv_writes_bom_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works_offers.csv");
        let mut full = listing("Python Developer", Some(Level::Junior));
        full.company = Some("Acme, Inc".to_owned());
        full.location = Location::Multiple(vec!["Warszawa".to_owned(), "Gdańsk".to_owned()]);
        full.work_mode = Some("zdalna".to_owned());
        full.link = Some("https://theprotocol.it/oferta/1".to_owned());
        full.technologies = vec!["Python".to_owned(), "Django".to_owned()];

        let written = save_csv(&path, &to_rows(vec![full])).unwrap();
        assert_eq!(written, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let content = content.strip_prefix('\u{feff}').expect("missing BOM");
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "title,company,location,salary,Work Mode,link,technologies,level",
                r#"Python Developer,"Acme, Inc","Warszawa, Gdańsk",,zdalna,https://theprotocol.it/oferta/1,"Python, Django",Junior"#,
            ]
        );
    }

    #[test]
    fn test_save_csv_without_rows_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works_offers.csv");
        assert_eq!(save_csv(&path, &[]).unwrap(), 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "\u{feff}title,company,location,salary,Work Mode,link,technologies,level\n"
        );
    }
}
