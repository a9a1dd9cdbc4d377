mod logging;
mod parse;
mod scrape;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use job_scraper::theprotocol::fetcher::{BrowserConfig, BrowserFetcher};
use thiserror::Error;

use crate::logging::Logging;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Logger setup failed: '{0}'")]
    Logging(#[from] log::SetLoggerError),
    #[error("File error: '{0}'")]
    IoError(#[from] std::io::Error),
    #[error("Output error: '{0}'")]
    Persistence(#[from] persistence::Error),
    #[error("Serialization error: '{0}'")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// WebDriver server driving the browser
    #[clap(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    webdriver_url: String,

    #[clap(long, env = "SCRAPER_LOG_FILE", default_value = "scraper.log")]
    log_file: PathBuf,

    /// Show the browser window instead of running headless
    #[clap(long)]
    headed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape the junior, trainee and assistant python offers into works_offers.csv
    Scrape {},
    /// Extract offers from a saved results page and print them as JSON
    Parse { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();
    let args = Cli::parse();
    let _logging = Logging::init(&args.log_file)?;
    match args.command {
        Commands::Scrape {} => {
            let fetcher = BrowserFetcher::new(BrowserConfig {
                webdriver_url: args.webdriver_url,
                headless: !args.headed,
                ..BrowserConfig::default()
            });
            scrape::scrape(&fetcher, Path::new(scrape::OUTPUT_FILE)).await?;
        }
        Commands::Parse { path } => println!("{}", parse::parse_file(&path)?),
    }
    Ok(())
}
