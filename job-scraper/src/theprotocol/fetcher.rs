use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;
use serde_json::json;
use thirtyfour::extensions::cdp::ChromeDevTools;
use thirtyfour::prelude::*;
use tokio::time::{sleep, Instant};

use crate::theprotocol::parser::page_title;
use crate::theprotocol::{Error, Result, CARD_SELECTOR};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Consecutive polls without new resources before the network counts as idle (~500ms).
const QUIET_POLLS: u32 = 2;

/// Drains the resource timing buffer so each poll sees only entries recorded since the last one.
/// Chrome stops recording once the buffer (250 entries by default) is full.
const ACTIVITY_SCRIPT: &str = r#"
performance.setResourceTimingBufferSize(10000);
const fresh = performance.getEntriesByType('resource').length;
performance.clearResourceTimings();
return {
    ready_state: document.readyState,
    new_resources: fresh
};
"#;

/// Source of rendered result pages.
///
/// Parsed trees are not `Send`, so neither are the returned futures.
#[async_trait(?Send)]
pub trait PageFetcher {
    /// Rendered markup for `url`, or `None` if the page could not be loaded.
    async fn fetch(&self, url: &str) -> Option<Html>;
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    pub window_size: (u32, u32),
    pub locale: String,
    pub timezone: String,
    pub page_load_timeout: Duration,
    pub card_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_owned(),
            headless: true,
            user_agent: USER_AGENT.to_owned(),
            window_size: (1920, 1080),
            locale: "pl-PL".to_owned(),
            timezone: "Europe/Warsaw".to_owned(),
            page_load_timeout: Duration::from_secs(60),
            card_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageActivity {
    ready_state: String,
    new_resources: u64,
}

/// Idle once the document is complete and no resources were fetched for [`QUIET_POLLS`] polls.
#[derive(Debug, Default)]
struct NetworkIdle {
    quiet_polls: u32,
}

impl NetworkIdle {
    fn observe(&mut self, activity: &PageActivity) -> bool {
        if activity.ready_state != "complete" || activity.new_resources > 0 {
            self.quiet_polls = 0;
            return false;
        }
        self.quiet_polls += 1;
        self.quiet_polls >= QUIET_POLLS
    }
}

/// Fetches pages through a WebDriver-controlled Chrome, one session per page.
pub struct BrowserFetcher {
    config: BrowserConfig,
}

impl BrowserFetcher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    async fn open_session(&self) -> Result<WebDriver> {
        let (width, height) = self.config.window_size;
        let mut caps = DesiredCapabilities::chrome();
        if self.config.headless {
            caps.set_headless()?;
        }
        caps.add_chrome_arg(&format!("--window-size={},{}", width, height))?;
        caps.add_chrome_arg(&format!("--user-agent={}", self.config.user_agent))?;
        caps.add_chrome_arg(&format!("--lang={}", self.config.locale))?;
        caps.add_chrome_option(
            "prefs",
            json!({ "intl.accept_languages": self.config.locale }),
        )?;
        let driver = WebDriver::new(&self.config.webdriver_url, caps).await?;
        log::debug!("opened browser session at {}", self.config.webdriver_url);
        Ok(driver)
    }

    async fn wait_for_network_idle(&self, driver: &WebDriver, url: &str, deadline: Instant) -> Result<()> {
        let mut idle = NetworkIdle::default();
        loop {
            let activity: PageActivity = driver.execute(ACTIVITY_SCRIPT, vec![]).await?.convert()?;
            if idle.observe(&activity) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::NavigationTimeout {
                    url: url.to_owned(),
                    seconds: self.config.page_load_timeout.as_secs(),
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn load(&self, driver: &WebDriver, url: &str) -> Result<String> {
        let dev_tools = ChromeDevTools::new(driver.handle.clone());
        dev_tools
            .execute_cdp_with_params(
                "Emulation.setTimezoneOverride",
                json!({ "timezoneId": self.config.timezone }),
            )
            .await?;
        driver.set_page_load_timeout(self.config.page_load_timeout).await?;

        let deadline = Instant::now() + self.config.page_load_timeout;
        log::info!("GET {}", url);
        driver.goto(url).await?;
        self.wait_for_network_idle(driver, url, deadline).await?;

        let cards = driver
            .query(By::Css(CARD_SELECTOR))
            .wait(self.config.card_timeout, POLL_INTERVAL)
            .and_displayed()
            .first()
            .await;
        if let Err(e) = cards {
            log::warn!(
                "no offer cards appeared within {}s on {}, continuing anyway: {}",
                self.config.card_timeout.as_secs(),
                url,
                e
            );
        }
        Ok(driver.source().await?)
    }

    /// Rendered page source; the session is closed on every path once opened.
    async fn render(&self, url: &str) -> Result<String> {
        let driver = self.open_session().await?;
        let rendered = self.load(&driver, url).await;
        if let Err(e) = driver.quit().await {
            log::warn!("failed to close browser session: {}", e);
        }
        rendered
    }
}

#[async_trait(?Send)]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Option<Html> {
        match self.render(url).await {
            Ok(markup) => {
                let doc = Html::parse_document(&markup);
                match page_title(&doc) {
                    Some(title) => log::info!("page title: {}", title),
                    None => log::info!("page title not found"),
                }
                Some(doc)
            }
            Err(e) => {
                log::error!("failed to fetch {}, {}: {}", url, e.kind(), e);
                None
            }
        }
    }
}
